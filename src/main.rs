mod cli;

/// Version injected at compile time via SCM_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("SCM_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cli::output::OutputFormat;
use cli::Command;
use scm_sdk::error::format_error;
use scm_sdk::{Config, Scm, ScmError};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Strata Cloud Manager network configuration client
#[derive(Parser, Debug)]
#[command(name = "scm", version, about, long_about = None)]
struct Args {
    /// API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Environment variable holding the access token
    #[arg(long)]
    token_env: Option<String>,

    /// Folder used when a command names no container
    #[arg(long)]
    default_folder: Option<String>,

    /// Page size for list calls
    #[arg(long)]
    max_limit: Option<i64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {:?}: {}", log_path, e);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("scm {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("scm").join("scm.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".scm").join("scm.log");
    }
    PathBuf::from("scm.log")
}

/// Command line values take precedence over the config file
fn effective_config(args: &Args) -> Config {
    let mut config = Config::load();
    if let Some(base_url) = &args.base_url {
        config.base_url = Some(base_url.clone());
    }
    if let Some(token_env) = &args.token_env {
        config.token_env = Some(token_env.clone());
    }
    if let Some(folder) = &args.default_folder {
        config.default_folder = Some(folder.clone());
    }
    if let Some(limit) = args.max_limit {
        config.max_limit = Some(limit);
    }
    config
}

async fn run(args: Args) -> Result<()> {
    let config = effective_config(&args);

    let text = match args.command {
        Command::Resources => cli::render_resources(args.output)?,
        Command::Config(command) => {
            let path = Config::config_path().context("no config directory on this system")?;
            cli::run_config(command, &path, args.output)?
        },
        command => {
            let scm = Scm::from_config(&config)?;
            tracing::debug!("Using API at {}", config.effective_base_url());
            cli::run(&scm, command, args.output, config.default_folder.as_deref()).await?
        },
    };

    println!("{}", text);
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let log_guard = setup_logging(args.log_level);

    let result = run(args).await;
    if let Err(err) = &result {
        tracing::error!("Command failed: {:#}", err);
        match err.downcast_ref::<ScmError>() {
            Some(e) => eprintln!("Error: {}", format_error(e)),
            None => eprintln!("Error: {:#}", err),
        }
    }

    // Flush the log writer before exiting
    drop(log_guard);
    if result.is_err() {
        std::process::exit(1);
    }
}
