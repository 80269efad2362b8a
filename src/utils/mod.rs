use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "expense_core=info";

/// Installs the global `fmt` subscriber, honouring `RUST_LOG`.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = DEFAULT_DIRECTIVE.parse() {
        filter = filter.add_directive(directive);
    }
    // Another subscriber may already be installed (tests, embedding apps).
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
