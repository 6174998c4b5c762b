use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

pub fn log_file_name(at: DateTime<Local>) -> String {
    format!("fair-score-{}.log", at.format("%Y%m%d-%H%M%S"))
}

fn stderr_filter(verbose: u8, quiet: bool) -> EnvFilter {
    let level = match verbose {
        0 if quiet => "error",
        0 => return EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => "debug",
        _ => "trace",
    };
    EnvFilter::new(level)
}

/// Installs the process-wide subscriber: human-readable stderr output plus,
/// when `log_dir` is set, a per-run log file. The returned guard flushes the
/// file writer when dropped and must live until exit.
pub fn init_logging(verbose: u8, quiet: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(stderr_filter(verbose, quiet));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, log_file_name(Local::now()));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new("info"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install log subscriber")?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn log_file_is_timestamped() {
        let at = Local
            .with_ymd_and_hms(2025, 1, 2, 3, 4, 5)
            .single()
            .expect("unambiguous time");
        assert_eq!(log_file_name(at), "fair-score-20250102-030405.log");
    }
}
