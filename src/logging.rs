//! Tracing subscriber setup.
//!
//! Log lines go to stdout, stderr, an appended file, or nowhere. The filter
//! comes from `RUST_LOG` when set, otherwise from configuration.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Off,
    Stdout,
    Stderr,
    File(PathBuf),
}

impl LogOutput {
    /// Parse `0`/`off`, `1`/`stdout`, `2`/`stderr`, or anything else as a file path.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "0" | "off" | "" => LogOutput::Off,
            "1" | "stdout" => LogOutput::Stdout,
            "2" | "stderr" => LogOutput::Stderr,
            path => LogOutput::File(PathBuf::from(path)),
        }
    }
}

/// Build the filter: `RUST_LOG` wins, then `verbose`, then the configured directive.
pub fn build_filter(level: &str, verbose: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let directive = if verbose { "debug" } else { level };
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber.
pub fn init(output: &LogOutput, level: &str, verbose: bool) -> Result<()> {
    let writer = match output {
        LogOutput::Off => return Ok(()),
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level, verbose))
        .with_writer(writer)
        .with_ansi(matches!(output, LogOutput::Stderr))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
