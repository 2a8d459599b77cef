#![forbid(unsafe_code)]

//! Structured logging.
//!
//! With the `tracing` feature enabled the `tracing` macros are re-exported
//! here (and at crate root). `tracing-json` additionally provides
//! [`init_json`] for hosts that want newline-delimited JSON logs filtered by
//! `RUST_LOG`.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Install a global JSON subscriber filtered by `RUST_LOG`.
///
/// Returns an error if a global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json() -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
}

#[cfg(all(test, feature = "tracing-json"))]
mod tests {
    use super::*;

    #[test]
    fn init_json_installs_once() {
        assert!(init_json().is_ok());
        assert!(init_json().is_err());
        info!(component = "logging", "json subscriber installed");
    }
}
