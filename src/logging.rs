use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Environment;

/// Install the global subscriber. `RUST_LOG` overrides the profile's filter.
///
/// Logs go to stderr; stdout is reserved for command output.
pub fn init_logging(env: Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env.log_directives()));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(env.logs_source_location())
        .with_line_number(env.logs_source_location());

    let registry = tracing_subscriber::registry().with(filter);
    if env.json_logs() {
        registry.with(layer.json()).init();
    } else {
        registry.with(layer.pretty()).init();
    }

    tracing::debug!(env = ?env, "Logging ready");
}
