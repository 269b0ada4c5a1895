use anyhow::{Context, Result};
use azure_source::azure::SnapshotClient;
use azure_source::config::Config;
use azure_source::discovery::{discover, DiscoveryOptions};
use azure_source::item::ItemType;
use azure_source::VERSION;
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Offline Azure discovery over an exported ARM snapshot
#[derive(Parser, Debug)]
#[command(name = "azure-source", version, about, long_about = None)]
struct Args {
    /// JSON file of ARM records (array or `{ "value": [...] }`)
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Subscription to discover
    #[arg(long)]
    subscription: Option<String>,

    /// Resource group to discover (repeatable)
    #[arg(short = 'g', long = "resource-group")]
    resource_groups: Vec<String>,

    /// Resource group used when a query names no scope
    #[arg(long)]
    default_resource_group: Option<String>,

    /// Only discover these item types (repeatable)
    #[arg(short = 't', long = "type", value_parser = parse_item_type)]
    types: Vec<ItemType>,

    /// Records per snapshot page
    #[arg(long)]
    page_size: Option<usize>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Persist subscription, resource groups and page size to the config file
    #[arg(long)]
    save_config: bool,
}

fn parse_item_type(value: &str) -> Result<ItemType, String> {
    value.parse()
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

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();
    let file = open_log_file(&log_path)?;

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

    tracing::info!("azure-source {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

/// Open the log file for appending, creating its directory first
fn open_log_file(log_path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("azure-source").join("azure-source.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".azure-source").join("azure-source.log");
    }
    PathBuf::from("azure-source.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    // CLI > config > environment
    let mut config = Config::load();
    if let Some(subscription) = args.subscription.clone() {
        config.subscription_id = Some(subscription);
    }
    config.resource_groups = config.effective_resource_groups(&args.resource_groups);
    if let Some(rg) = args.default_resource_group.clone() {
        config.default_resource_group = Some(rg);
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }

    if args.save_config {
        config.save()?;
    }

    let scopes = config.scope_set()?;
    tracing::info!(
        "Using subscription: {}, scopes: {:?}",
        scopes.subscription(),
        scopes.scopes()
    );

    let client = SnapshotClient::from_file(&args.snapshot)?.with_page_size(config.page_size);
    let options = DiscoveryOptions {
        concurrency: config.concurrency,
        types: args.types.clone(),
    };

    let report = discover(Arc::new(client), &scopes, &options).await;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for item in &report.items {
        serde_json::to_writer(&mut out, item)?;
        writeln!(out)?;
    }

    for err in &report.errors {
        eprintln!("Error: {err}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_log_file_creates_directory() {
        let dir = std::env::temp_dir().join(format!("azure-source-log-{}", std::process::id()));
        let path = dir.join("nested").join("azure-source.log");

        assert!(open_log_file(&path).is_ok());
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_open_log_file_reports_unusable_directory() {
        let blocker = std::env::temp_dir().join(format!("azure-source-blocker-{}", std::process::id()));
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = open_log_file(&blocker.join("azure-source.log")).unwrap_err();
        assert!(err.to_string().contains("Failed to create log directory"));

        let _ = std::fs::remove_file(&blocker);
    }
}
