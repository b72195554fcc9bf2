use bevy::log::{BoxedLayer, Level, LogPlugin};
use bevy::prelude::*;

use crate::core::config::LogConfig;

#[cfg(log_profile = "release")]
const DEFAULT_LEVEL: Level = Level::ERROR;
#[cfg(log_profile = "profiling")]
const DEFAULT_LEVEL: Level = Level::WARN;
#[cfg(not(any(log_profile = "release", log_profile = "profiling")))]
const DEFAULT_LEVEL: Level = Level::DEBUG;

pub fn log_plugin(config: &LogConfig) -> LogPlugin {
    LogPlugin {
        level: DEFAULT_LEVEL,
        filter: config.filter.clone(),
        custom_layer: flame_layer,
    }
}

/// Keeps the flame output flushed until the app is dropped.
#[cfg(feature = "logging")]
struct FlameGuard(#[allow(dead_code)] tracing_flame::FlushGuard<std::io::BufWriter<std::fs::File>>);

#[cfg(feature = "logging")]
fn flame_layer(app: &mut App) -> Option<BoxedLayer> {
    use crate::core::constants::TRACE_FLAME_ENV;
    use crate::core::error::ShowcaseError;
    use tracing_flame::FlameLayer;

    let path = std::env::var_os(TRACE_FLAME_ENV)?;
    match FlameLayer::<tracing_subscriber::Registry, _>::with_file(&path) {
        Ok((layer, guard)) => {
            app.insert_non_send_resource(FlameGuard(guard));
            Some(Box::new(layer))
        }
        Err(err) => {
            // The subscriber is not installed yet, so stderr is the only sink
            eprintln!("{}", ShowcaseError::Tracing(err.to_string()));
            None
        }
    }
}

#[cfg(not(feature = "logging"))]
fn flame_layer(_app: &mut App) -> Option<BoxedLayer> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(any(log_profile = "release", log_profile = "profiling")))]
    #[test]
    fn debug_builds_log_at_debug_level() {
        let plugin = log_plugin(&LogConfig::default());
        assert_eq!(plugin.level, Level::DEBUG);
    }

    #[test]
    fn filter_comes_from_config() {
        let config = LogConfig {
            filter: "wgpu=error,helmet_showcase=trace".to_string(),
        };
        assert_eq!(log_plugin(&config).filter, config.filter);
    }
}
