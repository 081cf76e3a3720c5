//! Tracing setup for embedders that do not install their own subscriber

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is unset or invalid: run summaries and
/// failures from this workspace, warnings from everything else.
pub const DEFAULT_DIRECTIVE: &str = "warn,param_core=info,param_tree=info";

/// Filter from `RUST_LOG`, falling back to [`DEFAULT_DIRECTIVE`]
pub fn env_filter() -> Result<EnvFilter, ParseError> {
    EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_DIRECTIVE))
}

/// Install a compact stderr subscriber.
///
/// The `reconcile` span is logged when it closes, so every run ends with one
/// line carrying its `run_id` and duration.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::CLOSE)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter()?)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{info, warn};

    #[test]
    fn test_default_directive_parses() {
        let filter = EnvFilter::try_new(DEFAULT_DIRECTIVE).unwrap();
        assert!(filter.to_string().contains("param_core=info"));
    }

    #[test]
    fn test_init_twice_fails_cleanly() {
        // Another test may already have installed a subscriber
        let _ = init();
        assert!(init().is_err());

        let span = tracing::info_span!("reconcile", run_id = "test");
        let _guard = span.enter();
        info!("reconcile starting");
        warn!("mutation failed");
    }
}
