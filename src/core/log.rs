use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const CRATE_TARGET: &str = "inr_usd_converter";

/// Directive used when `RUST_LOG` is not set.
fn default_directive(verbose: bool) -> String {
    if verbose {
        format!("{CRATE_TARGET}=debug")
    } else {
        "off".to_string()
    }
}

/// Sends logs to stderr so converted amounts on stdout stay clean.
///
/// Silent unless `verbose`; `RUST_LOG` replaces the default directive.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .without_time()
                .with_target(verbose)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
