use crate::config::LoggingSettings;
use std::fs::OpenOptions;
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Filter directive: `RUST_LOG` wins, then the CLI override, then the config
fn filter(settings: &LoggingSettings, level_override: Option<&str>) -> EnvFilter {
    let level = level_override.unwrap_or(&settings.level);
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global tracing subscriber.
///
/// `console` is ANDed with `settings.console_enabled`; the interactive HUD
/// turns it off so log lines do not land on the alternate screen. Keep the
/// returned guard alive until exit or buffered file output is lost.
pub fn init_logging(
    settings: &LoggingSettings,
    level_override: Option<&str>,
    console: bool,
) -> io::Result<Option<WorkerGuard>> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if console && settings.console_enabled {
        let layer = if settings.json {
            fmt::layer().json().boxed()
        } else {
            fmt::layer().boxed()
        };
        layers.push(layer);
    }

    if let Some(path) = &settings.file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let (writer, file_guard) = tracing_appender::non_blocking(file);
        let layer = if settings.json {
            fmt::layer().json().with_writer(writer).boxed()
        } else {
            fmt::layer().with_ansi(false).with_writer(writer).boxed()
        };
        layers.push(layer);
        guard = Some(file_guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter(settings, level_override))
        .init();

    Ok(guard)
}
