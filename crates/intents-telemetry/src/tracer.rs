//! Subscriber and tracer setup

use intents_core::{LogFormat, ObservabilityConfig};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::{SimpleSpanProcessor, TracerProvider};
use std::sync::{Arc, Mutex, OnceLock};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Global tracer provider holder
static TRACER_PROVIDER: OnceLock<Arc<TracerProvider>> = OnceLock::new();

/// Span processor builders registered before initialization
type ProcessorBuilder = Box<dyn FnOnce() -> SimpleSpanProcessor + Send>;
static SPAN_PROCESSOR_BUILDERS: Mutex<Option<Vec<ProcessorBuilder>>> = Mutex::new(Some(Vec::new()));

/// Register a span processor (exporter) used when the OpenTelemetry layer is
/// enabled. Must be called before [`init_telemetry`].
///
/// # Example
///
/// ```ignore
/// use intents_telemetry::{register_span_processor, init_telemetry};
/// use opentelemetry_sdk::trace::SimpleSpanProcessor;
///
/// register_span_processor(Box::new(|| {
///     SimpleSpanProcessor::new(Box::new(/* your exporter */))
/// }));
/// init_telemetry(&config.observability);
/// ```
pub fn register_span_processor(builder: ProcessorBuilder) {
    let mut builders = SPAN_PROCESSOR_BUILDERS
        .lock()
        .unwrap_or_else(|e| e.into_inner());

    if let Some(ref mut vec) = *builders {
        vec.push(builder);
    } else {
        tracing::warn!("Attempted to register span processor after telemetry initialization");
    }
}

/// Install the global subscriber.
///
/// - `RUST_LOG` wins over `config.log_level` when set
/// - `config.log_format` picks human-readable or JSON lines
/// - `config.otel_enabled` adds the OpenTelemetry layer fed by the
///   registered span processors
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_telemetry(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_line_number(true)
            .boxed(),
    };

    let otel_layer = if config.otel_enabled {
        let service_name = config
            .service_name
            .clone()
            .unwrap_or_else(|| crate::attributes::SYSTEM_NAME.to_string());
        let tracer = build_tracer_provider().tracer(service_name);
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(otel_layer)
        .with(filter)
        .try_init()
        .is_ok()
}

/// Build the tracer provider from the registered processors and store it
/// globally. Processors can only be consumed once.
fn build_tracer_provider() -> Arc<TracerProvider> {
    let builders = SPAN_PROCESSOR_BUILDERS
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .take()
        .unwrap_or_default();

    let mut provider_builder = TracerProvider::builder();
    for builder in builders {
        provider_builder = provider_builder.with_span_processor(builder());
    }

    TRACER_PROVIDER
        .get_or_init(|| Arc::new(provider_builder.build()))
        .clone()
}

/// Get the global tracer provider if initialized
pub fn tracer_provider() -> Option<Arc<TracerProvider>> {
    TRACER_PROVIDER.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let config = ObservabilityConfig {
            otel_enabled: true,
            ..ObservabilityConfig::default()
        };

        // Only the first installation in a process can succeed
        let first = init_telemetry(&config);
        let second = init_telemetry(&config);
        assert!(!second);
        assert!(tracer_provider().is_some());
    }
}
