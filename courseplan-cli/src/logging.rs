use tracing_subscriber::EnvFilter;

/// Stderr subscriber. `COURSEPLAN_LOG` wins over `RUST_LOG`; default `warn`.
pub fn init() {
    let filter = EnvFilter::try_from_env("COURSEPLAN_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
