//! Span attribute names, following the OpenTelemetry GenAI conventions
//! where one exists

pub const SYSTEM_NAME: &str = "intents";

pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";
pub const GEN_AI_TOOL_NAME: &str = "gen_ai.tool.name";
pub const GEN_AI_TOOL_DESCRIPTION: &str = "gen_ai.tool.description";
pub const GEN_AI_TOOL_CALL_ID: &str = "gen_ai.tool.call.id";

pub const INTENTS_INVOCATION_ID: &str = "intents.invocation_id";
pub const INTENTS_TOOL_CALL_ARGS: &str = "intents.tool_call_args";
pub const INTENTS_TOOL_RESPONSE: &str = "intents.tool_response";
pub const INTENTS_CACHE_HIT: &str = "intents.cache_hit";
pub const INTENTS_OUTCOME: &str = "intents.outcome";
