//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use projectbook_core::{
    Pipeline, PipelineConfig, PipelineError, ProgressReporter, RunReport, RunState,
};
use projectbook_shared::{
    AppConfig, PageSize, init_config, load_config, load_config_from, resolve_credentials,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// ProjectBook: scrape the project listing into a PDF.
#[derive(Parser)]
#[command(
    name = "projectbook",
    version,
    about = "Log in through SSO, scrape every project title and description, and render them to a PDF.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.projectbook/projectbook.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Log in, scrape all projects, and render the PDF.
    Fetch {
        /// Academic year to fetch (defaults to listing.year).
        #[arg(short, long)]
        year: Option<u16>,

        /// Output PDF path (defaults to output.path).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// SSO username (defaults to $PROJECTBOOK_USERNAME, then credentials.username).
        #[arg(short, long)]
        username: Option<String>,

        /// Page size: letter or a4.
        #[arg(long)]
        page_size: Option<PageSize>,

        /// Also write the scraped projects as JSON.
        #[arg(long, conflicts_with = "dry_run")]
        json: Option<PathBuf>,

        /// Scrape and print the projects as JSON without rendering.
        #[arg(long)]
        dry_run: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "projectbook=info",
        1 => "projectbook=debug",
        _ => "projectbook=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Fetch {
            year,
            output,
            username,
            page_size,
            json,
            dry_run,
        } => {
            let args = FetchArgs {
                year,
                output,
                username,
                page_size,
                json,
                dry_run,
            };
            cmd_fetch(config_path, args).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(config_path).await,
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    Ok(match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    })
}

// ---------------------------------------------------------------------------
// fetch
// ---------------------------------------------------------------------------

struct FetchArgs {
    year: Option<u16>,
    output: Option<PathBuf>,
    username: Option<String>,
    page_size: Option<PageSize>,
    json: Option<PathBuf>,
    dry_run: bool,
}

async fn cmd_fetch(config_path: Option<&Path>, args: FetchArgs) -> Result<()> {
    let mut config = resolve_config(config_path)?;

    if let Some(output) = args.output {
        config.output.path = output;
    }
    if let Some(page_size) = args.page_size {
        config.output.page_size = page_size;
    }
    let year = args.year.unwrap_or(config.listing.year);

    let credentials = resolve_credentials(&config, args.username.as_deref())?;
    let mut pipeline_config = PipelineConfig::from_app_config(&config, year, credentials)?;
    pipeline_config.json_path = args.json;

    info!(
        year,
        listing_url = %pipeline_config.listing_url,
        output = %pipeline_config.output_path.display(),
        "fetching project book"
    );

    let pipeline = Pipeline::new(pipeline_config)?;
    let reporter = CliProgress::new();

    if args.dry_run {
        let collected = pipeline.collect(&reporter).await.map_err(|e| fail(&reporter, e))?;
        reporter.finish();
        println!("{}", collected.projects.to_json()?);
        return Ok(());
    }

    let report = pipeline.run(&reporter).await.map_err(|e| fail(&reporter, e))?;

    println!();
    println!("  Project book created successfully!");
    println!("  Projects: {}", report.project_count);
    if report.missing_descriptions > 0 {
        println!("  Without description: {}", report.missing_descriptions);
    }
    for failure in &report.detail_failures {
        println!("  Warning: {} ({}): {}", failure.project_id, failure.url, failure.error);
    }
    println!("  Pages:    {}", report.output.page_count);
    println!("  Path:     {}", report.output.path.display());
    println!("  Time:     {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

/// Clear the spinner and turn a pipeline failure into a report.
fn fail(reporter: &CliProgress, err: PipelineError) -> color_eyre::Report {
    reporter.finish();
    err.into()
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, state: RunState) {
        if let Some(line) = status_line(state) {
            self.spinner.suspend(|| println!("{line}"));
        }
        self.spinner.set_message(state.to_string());
    }

    fn project_enriched(&self, title: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Fetching descriptions [{current}/{total}] {title}"));
    }

    fn done(&self, _report: &RunReport) {
        self.spinner.finish_and_clear();
    }
}

/// Status printed to stdout when a run enters `state`.
fn status_line(state: RunState) -> Option<&'static str> {
    match state {
        RunState::Authenticated => Some("Login successful"),
        RunState::LoginFailed => Some("Login failed"),
        RunState::NoProjects => Some("No projects found"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
