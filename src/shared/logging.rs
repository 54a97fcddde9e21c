use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global tracing subscriber. `FIELDSYNC_LOG` overrides the
/// default filter. Safe to call twice; the second call is a no-op.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("FIELDSYNC_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
