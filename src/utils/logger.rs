use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "bid_timeout=debug,info"
    } else {
        "bid_timeout=warn"
    }
}

/// `RUST_LOG` 優先於 `--verbose`
fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)))
}

/// Installs the CLI subscriber on stderr; stdout carries the report.
/// Returns `false` when a global subscriber was already set.
pub fn init_cli_logger(verbose: bool) -> bool {
    tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false)
                .compact(),
        )
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(true), "bid_timeout=debug,info");
        assert_eq!(default_filter(false), "bid_timeout=warn");
    }

    #[test]
    fn test_second_init_is_rejected() {
        init_cli_logger(false);
        assert!(!init_cli_logger(true));
    }
}
