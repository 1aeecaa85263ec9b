//! Knowbot - Pattern-Matching Chat Agent
//!
//! Matches user input against a corpus of regex intent patterns and learns
//! new question/answer pairs at runtime.

// Use the library crate for all modules
use knowbot::cli;

fn main() -> anyhow::Result<()> {
    // Initialize logging (WARN level by default, use RUST_LOG=info for debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into())
        )
        .init();

    // Run CLI
    cli::run()
}
