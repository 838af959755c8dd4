//! Logging setup for the docqa CLI.
//!
//! Logs go to stderr through `tracing`, so CSV or JSON written to stdout
//! stays clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither a flag nor `RUST_LOG` says otherwise
const DEFAULT_FILTER: &str = "docqa_cli=info,docqa_extractor=info,docqa_llm=info";

/// Initialize the tracing subscriber.
///
/// Precedence: `verbose` (debug for docqa crates), then `quiet` (errors
/// only), then `RUST_LOG`, then info for docqa crates.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("docqa_cli=debug,docqa_extractor=debug,docqa_llm=debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Whether colored output should be used.
///
/// Honors the `NO_COLOR` convention.
pub fn should_use_colors(no_color_flag: bool) -> bool {
    !no_color_flag && std::env::var_os("NO_COLOR").is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_disables_colors() {
        assert!(!should_use_colors(true));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logger(false, true, true);
        init_logger(true, false, true);
    }
}
