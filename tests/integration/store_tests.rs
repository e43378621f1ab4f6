//! On-disk index store reader tests.

use std::fs;
use std::path::Path;

use swiftsweep::index::{IndexStore, SymbolIndex, SymbolRole, Usr};

fn write_record(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

const RECORD: &str = r#"{
  "file": "/project/Sources/App.swift",
  "occurrences": [
    {
      "usr": "s:3App4mainyyF",
      "name": "main()",
      "kind": "function",
      "location": { "file": "/project/Sources/App.swift", "line": 1, "column": 6 },
      "roles": ["definition", "canonical"],
      "relations": []
    },
    {
      "usr": "s:3App6helperyyF",
      "name": "helper()",
      "kind": "function",
      "location": { "file": "/project/Sources/App.swift", "line": 3, "column": 9 },
      "roles": ["reference"],
      "relations": [
        { "roles": ["calledBy"], "usr": "s:3App4mainyyF" }
      ]
    }
  ]
}"#;

#[test]
fn test_open_and_query_by_usr() {
    let dir = tempfile::tempdir().unwrap();
    write_record(dir.path(), "app.json", RECORD);

    let store = IndexStore::open(dir.path()).unwrap();
    assert_eq!(store.symbol_count(), 2);

    let refs = store
        .occurrences_of_usr(&Usr::from("s:3App6helperyyF"), &[SymbolRole::Reference])
        .unwrap();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].location.line, 3);
    assert!(refs[0]
        .relation_with_role(SymbolRole::CalledBy)
        .is_some());

    let defs = store
        .occurrences_of_usr(&Usr::from("s:3App4mainyyF"), &[SymbolRole::Definition])
        .unwrap();
    assert_eq!(defs.len(), 1);
    assert!(defs[0].is_canonical_definition());
}

#[test]
fn test_query_by_file_uses_normalized_paths() {
    let dir = tempfile::tempdir().unwrap();
    write_record(dir.path(), "app.json", RECORD);

    let store = IndexStore::open(dir.path()).unwrap();
    let occurrences = store
        .occurrences_in_file(Path::new("/project/Sources/App.swift"))
        .unwrap();
    assert_eq!(occurrences.len(), 2);

    let missing = store
        .occurrences_in_file(Path::new("/project/Sources/Other.swift"))
        .unwrap();
    assert!(missing.is_empty());
}

#[test]
fn test_missing_directory_is_fatal() {
    assert!(IndexStore::open(Path::new("/nonexistent/index/store")).is_err());
}

#[test]
fn test_empty_store_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    assert!(IndexStore::open(dir.path()).is_err());
}

#[test]
fn test_malformed_record_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_record(dir.path(), "bad.json", "{ not json");
    assert!(IndexStore::open(dir.path()).is_err());
}

#[test]
fn test_non_json_files_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write_record(dir.path(), "app.json", RECORD);
    write_record(dir.path(), "README.md", "not a record");

    let store = IndexStore::open(dir.path()).unwrap();
    assert_eq!(store.symbol_count(), 2);
}
