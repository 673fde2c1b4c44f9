use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides every other filter source.
pub const LOG_ENV: &str = "PANELINK_LOG";
pub const DEFAULT_FILTER: &str = "warn";

/// Pick the filter directive: `PANELINK_LOG`, then `RUST_LOG`, then the
/// configured value, then [`DEFAULT_FILTER`].
pub fn filter_directive(
    panelink_log: Option<String>,
    rust_log: Option<String>,
    configured: Option<&str>,
) -> String {
    [panelink_log, rust_log, configured.map(str::to_string)]
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the global tracing subscriber. Output goes to stderr, or appends
/// to `log_file` when one is given, since stdout carries protocol traffic.
pub fn init_tracing(
    log_file: Option<&str>,
    configured: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let directive = filter_directive(
        std::env::var(LOG_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
        configured,
    );
    let filter = EnvFilter::try_new(&directive)?;

    let (writer, ansi) = match log_file {
        Some(path) => {
            // Try to create/open the file to ensure we have write permissions
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.flush()?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .try_init()
        .map_err(|err| format!("Failed to install tracing subscriber: {err}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins() {
        assert_eq!(
            filter_directive(
                Some("panelink=debug".into()),
                Some("info".into()),
                Some("error")
            ),
            "panelink=debug"
        );
    }

    #[test]
    fn blank_sources_are_skipped() {
        assert_eq!(
            filter_directive(Some("  ".into()), None, Some("panelink::core=trace")),
            "panelink::core=trace"
        );
        assert_eq!(filter_directive(None, Some(String::new()), None), "warn");
    }

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn second_install_is_reported() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("panel.log");
        let path = path.to_str().expect("utf-8 path");

        assert!(init_tracing(Some(path), Some("off")).is_ok());
        let err = init_tracing(Some(path), Some("off")).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Failed to install tracing subscriber"));
    }
}
