use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::configuration::LoggingSettings;

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `settings.level`. Fails if a subscriber
/// is already installed.
pub fn init_telemetry(settings: &LoggingSettings) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if settings.json {
        registry
            .with(fmt::layer().with_writer(std::io::stdout).json())
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    }
}
