use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins when set; otherwise the
/// crate logs at `warn`, or `debug` with `--verbose`.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "shelf_scan=debug"
    } else {
        "shelf_scan=warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // stdout carries the report; diagnostics go to stderr
    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .init();
}
