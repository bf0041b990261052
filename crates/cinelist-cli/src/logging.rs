use anyhow::Result;
use std::io;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc, writer::BoxMakeWriter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter used when RUST_LOG is not set
fn default_directive(verbose_level: u8) -> &'static str {
    match verbose_level {
        0 => "info",
        // -v: debug, but keep the HTTP stack quiet
        1 => "debug,hyper=warn,hyper_util=warn,reqwest=info",
        _ => "trace",
    }
}

fn build_filter(verbose_level: u8, quiet: bool) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose_level)))
}

fn json_enabled() -> bool {
    std::env::var("RUST_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or_else(|_| !io::stdout().is_terminal())
}

/// Rolling daily appender; `cinelist.log` rotates to `cinelist.<date>`
fn file_writer(log_path: PathBuf) -> Result<BoxMakeWriter> {
    let log_dir = log_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
    std::fs::create_dir_all(log_dir)?;

    let prefix = log_path
        .file_stem()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;

    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, prefix);
    Ok(BoxMakeWriter::new(appender))
}

pub fn init_logging(verbose_level: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let filter = build_filter(verbose_level, quiet);
    let to_file = log_file.is_some();

    let writer = match log_file {
        Some(path) => file_writer(path)?,
        None => BoxMakeWriter::new(io::stderr),
    };

    let registry = Registry::default().with(filter);

    if json_enabled() {
        registry
            .with(fmt::layer().json().with_timer(ChronoUtc::rfc_3339()).with_writer(writer))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(!to_file) // No ANSI codes in log files
                    .with_writer(writer),
            )
            .init();
    }

    Ok(())
}
