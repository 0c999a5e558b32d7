//! Logging setup for the `stockroom` binary
//!
//! Console output goes to stderr so command output on stdout stays clean.
//! JSON logs can additionally be written to daily files for bug reports.

use std::path::PathBuf;

use stockroom_settings::LoggingSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory where JSON log files are written
    pub log_dir: PathBuf,

    /// Whether to write JSON logs to files
    pub enable_json_logs: bool,

    /// Whether to include file/line information in console logs
    pub include_location: bool,

    /// Filter used when RUST_LOG is unset
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: log_directory(),
            enable_json_logs: false,
            include_location: cfg!(debug_assertions),
            default_filter: "warn".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Build from persisted settings; `verbosity` raises the level per `-v`
    pub fn from_settings(settings: &LoggingSettings, verbosity: u8) -> Self {
        let level = match verbosity {
            0 => settings.level.as_str(),
            1 => "debug",
            _ => "trace",
        };
        Self {
            enable_json_logs: settings.file_logging,
            default_filter: format!(
                "warn,stockroom={level},stockroom_table={level},stockroom_catalog={level},stockroom_settings={level}"
            ),
            ..Self::default()
        }
    }
}

/// Initialize the global subscriber.
///
/// The returned guard flushes the file writer when dropped and must be held
/// for the lifetime of the program.
pub fn init(config: LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    // RUST_LOG takes precedence over the configured filter
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_writer(std::io::stderr)
        .with_filter(env_filter.clone())
        .boxed();

    let mut layers = vec![console_layer];
    let mut guard = None;

    if config.enable_json_logs {
        std::fs::create_dir_all(&config.log_dir)?;
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "stockroom.log");
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();
        layers.push(json_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::debug!(
        log_dir = %config.log_dir.display(),
        json_enabled = config.enable_json_logs,
        "logging initialized"
    );
    Ok(guard)
}

/// Where JSON log files go
pub fn log_directory() -> PathBuf {
    stockroom_settings::settings_file::logs_dir().unwrap_or_else(|_| PathBuf::from("logs"))
}
