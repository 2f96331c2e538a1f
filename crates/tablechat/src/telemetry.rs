// tablechat/crates/tablechat/src/telemetry.rs

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber. The log sink itself is an external
/// concern; this only shapes the lines the core emits.
pub fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,sqlx=warn".into());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_level(true)
        .compact()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
