use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use teraco_reports::config::{self, DEFAULT_LOG_FILE, DEFAULT_WORKERS, RunOptions, STORE_ROOT_ENV};
use teraco_reports::io::fs::list_files;
use teraco_reports::io::store::DirectoryStore;
use teraco_reports::pipeline::{self, ProcessSummary, Prompt};
use teraco_reports::rename::RenameEngine;
use teraco_reports::rules::RuleSet;
use teraco_reports::{Result, ReportError, logging};
use tracing::{error, info};

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_file = (!cli.no_log_file).then(|| cli.log_file.clone());
    if let Err(error) = logging::init(log_file.as_deref()) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }

    if let Err(err) = run(cli) {
        error!(error = %err, "fatal error");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run(args) => execute_run(args),
        Command::Process(args) => execute_process(args),
        Command::Resolve(args) => execute_resolve(args),
    }
}

fn execute_run(args: RunArgs) -> Result<()> {
    let root = config::require_store_root(args.store_root)?;
    let store = DirectoryStore::open(root)?;
    let engine = RenameEngine::new(RuleSet::standard()?);
    let options = RunOptions {
        container: args.container,
        folder: args.folder,
        select: args.select,
        dest: args.dest,
        reporting_month: args.reporting_month,
        workers: args.workers,
    };

    let (dest, summary) = pipeline::run(&store, &engine, &options, &mut ConsolePrompt)?;
    report(&dest, &summary);
    Ok(())
}

fn execute_process(args: ProcessArgs) -> Result<()> {
    if !args.dir.is_dir() {
        return Err(ReportError::MissingInput(args.dir));
    }
    let engine = RenameEngine::new(RuleSet::standard()?);
    let month = args.reporting_month;
    let summary = pipeline::process_folder(&args.dir, &engine, || match month {
        Some(month) => Ok(month),
        None => ConsolePrompt.ask("Enter reporting month (e.g., 'Feb-25')", &[]),
    })?;
    report(&args.dir, &summary);
    Ok(())
}

fn execute_resolve(args: ResolveArgs) -> Result<()> {
    let rules = RuleSet::standard()?;
    if args.json {
        let entries: Vec<serde_json::Value> = args
            .names
            .iter()
            .map(|name| serde_json::json!({ "file": name, "resolution": rules.resolve(name) }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for name in &args.names {
        match rules.resolve(name) {
            Some(resolution) => println!("{name} → {} ({:?})", resolution.target, resolution.matched_by),
            None => println!("{name} → unchanged"),
        }
    }
    Ok(())
}

fn report(dest: &std::path::Path, summary: &ProcessSummary) {
    println!("\nFiles in download folder:");
    for path in list_files(dest) {
        println!("  • {}", path.display());
    }
    info!(
        renamed = summary.renamed,
        trimmed = summary.trimmed,
        water_cells = summary.water.as_ref().map(|fill| fill.cells_zeroed).unwrap_or(0),
        "processing completed successfully"
    );
}

/// Reads answers from standard input.
struct ConsolePrompt;

impl Prompt for ConsolePrompt {
    fn ask(&mut self, question: &str, choices: &[String]) -> Result<String> {
        let mut stdout = io::stdout();
        for (index, choice) in choices.iter().enumerate() {
            writeln!(stdout, "{}: {choice}", index + 1)?;
        }
        write!(stdout, "{question}: ")?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(ReportError::Selection("no input".into()));
        }
        Ok(line.trim().to_string())
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Fetch facility report exports and normalise their names and layout."
)]
struct Cli {
    /// File that receives a copy of the log output.
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Only log to the console.
    #[arg(long, global = true)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download reports from the object store and process them.
    Run(RunArgs),
    /// Process an already-downloaded folder.
    Process(ProcessArgs),
    /// Show the canonical name for each given filename.
    Resolve(ResolveArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Root of the object store; each top-level directory is a container.
    #[arg(long, env = STORE_ROOT_ENV)]
    store_root: Option<PathBuf>,

    /// Container name or 1-based index.
    #[arg(long)]
    container: Option<String>,

    /// Folder name or 1-based index within the container.
    #[arg(long)]
    folder: Option<String>,

    /// `all` or comma-separated 1-based file indices.
    #[arg(long)]
    select: Option<String>,

    /// Download folder.
    #[arg(long)]
    dest: Option<PathBuf>,

    /// Active reporting month, e.g. `Feb-25`.
    #[arg(long)]
    reporting_month: Option<String>,

    /// Concurrent downloads.
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,
}

#[derive(clap::Args)]
struct ProcessArgs {
    /// Folder holding the downloaded files.
    dir: PathBuf,

    /// Active reporting month, e.g. `Feb-25`.
    #[arg(long)]
    reporting_month: Option<String>,
}

#[derive(clap::Args)]
struct ResolveArgs {
    /// Filenames to resolve.
    #[arg(required = true)]
    names: Vec<String>,

    /// Print the resolutions as JSON.
    #[arg(long)]
    json: bool,
}
