//! casegen -- test-case authoring server over stdio JSON-RPC.
//!
//! Usage: casegen  (an editor frontend drives stdin/stdout)

fn main() -> anyhow::Result<()> {
    // Tracing goes to stderr so it does not interfere with the stdio protocol.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    casegen::run_server()
}
