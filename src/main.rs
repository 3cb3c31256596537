use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use iocscan::{
    audit::Auditor,
    config::Config,
    ioc::{FeedSource, FileFeed, HttpFeed},
    output::{format_report_to_string, print_report, OutputFormat},
    IocDatabase, ScanReport,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const FINDINGS: u8 = 1;
    pub const USAGE: u8 = 1;
    pub const ERROR: u8 = 1;
}

const USAGE: &str = "Usage: iocscan [scan] /path/to/project [--fail]";

#[derive(Parser)]
#[command(name = "iocscan")]
#[command(
    author,
    version,
    about = "Audit npm projects for known-malicious package versions and campaign artifacts",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// `iocscan PATH` is shorthand for `iocscan scan PATH`
    #[command(flatten)]
    scan: ScanArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a project tree
    Scan(ScanArgs),

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Args, Debug, Default)]
struct ScanArgs {
    /// Project directory to scan
    path: Option<PathBuf>,

    /// Exit with status 1 if anything suspicious is found
    #[arg(long)]
    fail: bool,

    /// Output format (text, json)
    #[arg(short, long)]
    format: Option<String>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Indicator feed URL
    #[arg(long, conflicts_with = "feed_file")]
    feed_url: Option<String>,

    /// Read the indicator feed from a local CSV file
    #[arg(long)]
    feed_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Scan(cli.scan));
    match run(command).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "iocscan=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Commands) -> Result<u8> {
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config file");
        Config::default()
    });

    match command {
        Commands::Scan(args) => run_scan(args, &config).await,
        Commands::Config { init, path } => {
            handle_config(init, path, &config)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

async fn run_scan(args: ScanArgs, config: &Config) -> Result<u8> {
    let Some(root) = args.path else {
        eprintln!("{}", USAGE);
        return Ok(exit_codes::USAGE);
    };

    let format_str = args
        .format
        .unwrap_or_else(|| config.default_format.clone());
    let format = OutputFormat::from_str(&format_str).map_err(|e| anyhow::anyhow!(e))?;
    let is_interactive = format == OutputFormat::Text && args.output.is_none();

    if !root.is_dir() {
        tracing::warn!(path = %root.display(), "scan target is not a readable directory");
    }

    let feed: Box<dyn FeedSource> = match args.feed_file {
        Some(path) => Box::new(FileFeed::new(path)),
        None => Box::new(HttpFeed::new(
            args.feed_url.unwrap_or_else(|| config.feed_url.clone()),
        )),
    };
    let db = load_database(feed.as_ref(), is_interactive).await?;

    let report = Auditor::new(&db)
        .with_ignore(config.ignore.clone())
        .audit(&root);

    if let Some(path) = args.output {
        let content = format_report_to_string(&report, format)?;
        std::fs::write(&path, content)?;
        println!("Report written to: {}", path.display());
    } else {
        print_report(&report, format)?;
    }

    Ok(determine_exit_code(&report, args.fail || config.fail_on_find))
}

/// Fetches and parses the indicator feed. Any fetch failure aborts the run.
async fn load_database(feed: &dyn FeedSource, is_interactive: bool) -> Result<IocDatabase> {
    let progress = is_interactive.then(|| {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Loading suspicious package list from {}...", feed.name()));
        pb
    });

    let text = match feed.fetch().await {
        Ok(text) => text,
        Err(e) => {
            if let Some(pb) = &progress {
                pb.finish_and_clear();
            }
            return Err(e.into());
        }
    };
    let db = IocDatabase::from_csv(&text);
    tracing::info!(source = %feed.name(), packages = db.len(), "indicator feed loaded");

    if let Some(pb) = progress {
        pb.finish_with_message(format!("Loaded {} suspicious packages", db.len()));
    }

    Ok(db)
}

/// Non-zero only in strict mode, and only when something was found.
fn determine_exit_code(report: &ScanReport, strict: bool) -> u8 {
    if strict && report.has_findings() {
        exit_codes::FINDINGS
    } else {
        exit_codes::SUCCESS
    }
}

/// `--path` prints the location, `--init` writes defaults if no file exists,
/// and plain `config` prints the settings a scan would run with.
fn handle_config(init: bool, show_path: bool, config: &Config) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
        } else {
            Config::default().save()?;
            tracing::info!(path = %config_path.display(), "wrote default config");
            println!("Created config file at: {}", config_path.display());
        }
        return Ok(());
    }

    print!("{}", describe_config(config, &config_path));
    Ok(())
}

fn describe_config(config: &Config, config_path: &Path) -> String {
    let source = if config_path.exists() {
        config_path.display().to_string()
    } else {
        format!("{} (not present, using defaults)", config_path.display())
    };
    let ignored = if config.ignore.packages.is_empty() {
        "none".to_string()
    } else {
        config.ignore.packages.join(", ")
    };

    format!(
        "Config file: {}\nIndicator feed: {}\nDefault format: {}\nFail on findings: {}\nIgnored packages: {}\n",
        source, config.feed_url, config.default_format, config.fail_on_find, ignored
    )
}
