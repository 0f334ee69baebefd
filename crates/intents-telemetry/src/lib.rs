//! Logging and tracing for the intents tools
//!
//! Installs a `tracing` subscriber (pretty or JSON output, `EnvFilter`,
//! optional OpenTelemetry layer) and provides span helpers for tool calls.

pub mod attributes;
mod spans;
mod tracer;

pub use spans::{ToolSpanAttributes, safe_serialize, trace_tool_call};
pub use tracer::{init_telemetry, register_span_processor, tracer_provider};
