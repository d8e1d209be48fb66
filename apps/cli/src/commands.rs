//! CLI definition, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use ldcontext_core::pipeline::{BuildConfig, BuildSummary, ContextBuilder, ProgressReporter};
use ldcontext_shared::{AppConfig, init_config, load_config};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// ldcontext: build a JSON-LD context from Turtle ontology files.
#[derive(Parser)]
#[command(
    name = "ldcontext",
    version,
    about = "Scan an ontology tree and emit the JSON-LD @context for its properties.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Enable debug-level logging.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Project root (must contain the root marker, `.git` by default).
    #[arg(long, env = "LDCONTEXT_ROOT", global = true)]
    pub root: Option<PathBuf>,

    /// Explicit config file.
    #[arg(long, env = "LDCONTEXT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Write the context to this file instead of standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Subdirectory of the root to scan (repeatable). Overrides the config.
    #[arg(long = "subdir", value_name = "NAME")]
    pub subdirs: Vec<String>,

    /// Emit single-line JSON.
    #[arg(long)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Optional subcommands. Without one, the context is built.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write the default config to the user config file.
    Init,
    /// Show the resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs always go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = if cli.debug { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

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

/// Run the CLI.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().wrap_err("cannot determine working directory")?,
    };

    match &cli.command {
        None => cmd_build(&cli, &root),
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&cli, &root),
        },
    }
}

/// Load the config for `root` and apply flag overrides.
fn resolve_config(cli: &Cli, root: &Path) -> Result<AppConfig> {
    let mut config = load_config(cli.config.as_deref(), root)?;
    if !cli.subdirs.is_empty() {
        config.discovery.subdirs = cli.subdirs.clone();
    }
    if cli.compact {
        config.output.pretty = false;
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_build(cli: &Cli, root: &Path) -> Result<()> {
    let config = resolve_config(cli, root)?;
    let build_config = BuildConfig {
        root: root.to_path_buf(),
        discovery: config.discovery,
    };

    info!(
        root = %root.display(),
        subdirs = ?build_config.discovery.subdirs,
        "building JSON-LD context"
    );

    let reporter = CliProgress::new();
    let output = ContextBuilder::new(&build_config).run(&reporter)?;

    match &cli.output {
        None => {
            println!("{}", output.document.to_json_string(config.output.pretty)?);
        }
        Some(path) => {
            output.document.write_to(path, config.output.pretty)?;
            print_summary(path, &output.summary);
        }
    }

    Ok(())
}

fn print_summary(path: &Path, summary: &BuildSummary) {
    println!();
    println!("  Context written!");
    println!("  Path:        {}", path.display());
    println!("  Files:       {}", summary.file_count);
    println!("  Prefixes:    {}", summary.prefix_count);
    println!("  Datatype:    {}", summary.datatype_property_count);
    println!("  Object:      {}", summary.object_property_count);
    if summary.skipped_count > 0 {
        println!("  Skipped:     {}", summary.skipped_count);
    }
    println!("  Entries:     {}", summary.entry_count);
    println!("  Time:        {:.1}s", summary.elapsed.as_secs_f64());
    println!();
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(cli: &Cli, root: &Path) -> Result<()> {
    let config = resolve_config(cli, root)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner on stderr.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_processed(&self, path: &Path, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Parsing [{current}/{total}] {}", path.display()));
    }

    fn done(&self, _summary: &BuildSummary) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        // Clear the spinner when a phase fails before `done`.
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
