use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use colored::Colorize;
use miette::{miette, Result};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{info, warn};

mod analysis;
mod config;
mod discovery;
mod graph;
mod index;
mod report;
mod syntax;

use analysis::ReachabilityAnalyzer;
use config::Config;
use discovery::{normalize_path, FileFinder};
use graph::{Declaration, GraphBuilder, SymbolJoiner};
use index::IndexStore;
use report::{print_symbol_dump, ReportOptions, Reporter};
use syntax::SwiftParser;

/// swiftsweep - Index-backed dead code detection for Swift
#[derive(Parser, Debug)]
#[command(name = "swiftsweep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project directory to analyze
    #[arg(default_value = ".")]
    project_path: PathBuf,

    /// Directory containing the compiler-produced index database
    #[arg(long, value_name = "PATH")]
    index_store_path: Option<PathBuf>,

    /// Directory names to skip during file discovery (comma-separated)
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Path to configuration file (default: .swiftsweep.json in the project)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "terminal")]
    format: OutputFormat,

    /// Output file (for the json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit the cross-view symbol dump and exit before graph building
    #[arg(long)]
    dump_symbols: bool,

    /// Include joiner scoring and fallback detail in the logs
    #[arg(long)]
    debug_usr: bool,

    /// Restrict unused-property pruning to private/fileprivate properties
    #[arg(long)]
    respect_public_api: bool,

    /// Detailed progress logs, including the full reference-mapping log
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle shell completions
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    init_logging(cli.verbose || cli.debug_usr, cli.quiet);

    info!("swiftsweep v{}", env!("CARGO_PKG_VERSION"));

    if !cli.project_path.is_dir() {
        return Err(miette!(
            "project path is not a directory: {}",
            cli.project_path.display()
        ));
    }
    let Some(index_store_path) = &cli.index_store_path else {
        return Err(miette!("--index-store-path is required"));
    };
    if !index_store_path.is_dir() {
        return Err(miette!(
            "index store path is not a directory: {}",
            index_store_path.display()
        ));
    }

    let config = load_config(&cli)?;
    run_analysis(&config, &cli, index_store_path)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&cli.project_path)?
    };

    // Override with CLI arguments
    if !cli.exclude.is_empty() {
        config.exclude.extend(cli.exclude.clone());
    }
    if cli.respect_public_api {
        config.respect_public_api = true;
    }

    Ok(config)
}

fn run_analysis(config: &Config, cli: &Cli, index_store_path: &std::path::Path) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Instant;

    let start_time = Instant::now();

    // Stage 1a: discover files
    info!("Discovering files...");
    let finder = FileFinder::new(config);
    let files = finder.find_files(&cli.project_path)?;

    info!("Found {} files to analyze", files.len());

    if files.is_empty() {
        println!("{}", "No Swift files found.".yellow());
        return Ok(());
    }

    // Stage 1b: parse files in parallel, one task per file. The only shared
    // state is the progress bar; per-task declaration buffers merge at the
    // join below.
    let progress = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        pb
    };

    // Fail early if the grammar itself cannot load; per-file errors below
    // only skip the file.
    drop(SwiftParser::new()?);

    let mut declarations: Vec<Declaration> = files
        .par_iter()
        .map(|file| {
            let parsed = SwiftParser::new().and_then(|mut parser| parser.parse_file(file, config));
            progress.inc(1);
            match parsed {
                Ok(declarations) => declarations,
                Err(error) => {
                    warn!("skipping {}: {error}", file.display());
                    Vec::new()
                }
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();
    progress.finish_and_clear();

    // Deterministic hydration order regardless of parse scheduling.
    declarations.sort_by(|a, b| {
        (&a.location.file, a.location.line, a.location.column).cmp(&(
            &b.location.file,
            b.location.line,
            b.location.column,
        ))
    });

    info!(
        "Parsed {} declarations from {} files in {:.2}s",
        declarations.len(),
        files.len(),
        start_time.elapsed().as_secs_f64()
    );

    // Stage 2: open the index and hydrate declarations with USRs
    let store = IndexStore::open(index_store_path)?;
    info!("Index store: {} distinct symbols", store.symbol_count());

    let joiner =
        SymbolJoiner::new(&store, &config.kind_bridge).with_debug_scoring(cli.debug_usr);
    let join = joiner.hydrate(declarations)?;

    if cli.dump_symbols {
        print_symbol_dump(&join);
        return Ok(());
    }

    // Stage 3: build the reference graph
    info!("Building reference graph...");
    let builder = GraphBuilder::new(&store).with_ascent_budget(config.ascent_budget);
    let (mut graph, mapping_log) = builder.build(join.hydrated)?;

    // Stage 4: reachability sweep and report
    info!("Running reachability analysis...");
    let analyzer =
        ReachabilityAnalyzer::new(&store).with_respect_public_api(config.respect_public_api);
    let outcome = analyzer.analyze(&mut graph)?;

    let format = match cli.format {
        OutputFormat::Terminal => report::ReportFormat::Terminal,
        OutputFormat::Json => report::ReportFormat::Json,
    };
    let options = ReportOptions {
        output_path: cli.output.clone(),
        base_path: Some(normalize_path(&cli.project_path)),
        verbose: cli.verbose,
    };
    Reporter::new(format, options).report(&outcome, &mapping_log)?;

    info!("Analysis completed in {:.2}s", start_time.elapsed().as_secs_f64());
    Ok(())
}
