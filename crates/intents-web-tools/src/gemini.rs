//! Gemini `generateContent` request body and tolerant response extraction

use crate::outcome::{SearchSummary, SourceCitation};
use serde::Serialize;
use serde_json::Value;

/// Maximum number of citations returned to the agent
pub const MAX_SOURCES: usize = 3;

/// Request body for a grounded, non-streaming generation call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundedSearchRequest {
    pub contents: Vec<RequestContent>,
    pub tools: Vec<SearchToolSpec>,
    pub system_instruction: SystemInstruction,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestContent {
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextPart {
    pub text: String,
}

/// Enables the built-in Google Search grounding tool
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchToolSpec {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GoogleSearch {}

#[derive(Debug, Clone, Serialize)]
pub struct SystemInstruction {
    pub parts: Vec<TextPart>,
}

impl GroundedSearchRequest {
    /// The query is the only user content
    pub fn new(query: &str, response_language: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: query.to_string(),
                }],
            }],
            tools: vec![SearchToolSpec::default()],
            system_instruction: SystemInstruction {
                parts: vec![TextPart {
                    text: system_prompt(response_language),
                }],
            },
        }
    }
}

pub fn system_prompt(response_language: &str) -> String {
    format!(
        "You are a search assistant. Use search to get up-to-date information. \
         Return a concise summary of the search results. \
         Always answer in {}.",
        response_language
    )
}

/// Text and citations pulled out of the first candidate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCandidate {
    pub text: String,
    pub citations: Vec<SourceCitation>,
}

impl ParsedCandidate {
    /// `None` when there is neither text nor a citation
    pub fn into_summary(self) -> Option<SearchSummary> {
        if self.text.is_empty() && self.citations.is_empty() {
            return None;
        }

        Some(SearchSummary {
            answer_summary: self.text,
            sources: self.citations,
        })
    }
}

/// Extract the first candidate of a response.
///
/// Returns `None` if the response has no candidates. Missing or oddly typed
/// fields below the candidate default to empty.
pub fn parse_response(body: &Value) -> Option<ParsedCandidate> {
    let candidate = body
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())?;

    Some(ParsedCandidate {
        text: first_part_text(candidate),
        citations: citations(candidate),
    })
}

fn first_part_text(candidate: &Value) -> String {
    candidate
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .and_then(|parts| parts.first())
        .and_then(|part| part.get("text"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn citations(candidate: &Value) -> Vec<SourceCitation> {
    let Some(metadata) = candidate.get("groundingMetadata") else {
        return Vec::new();
    };

    let non_empty = |field: &str| {
        metadata
            .get(field)
            .and_then(Value::as_array)
            .filter(|entries| !entries.is_empty())
    };

    // Older responses carry attributions, current ones grounding chunks
    let Some(entries) = non_empty("groundingAttributions").or_else(|| non_empty("groundingChunks"))
    else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(citation)
        .take(MAX_SOURCES)
        .collect()
}

fn citation(entry: &Value) -> Option<SourceCitation> {
    let web = entry.get("web")?.as_object().filter(|web| !web.is_empty())?;
    let field = |name: &str| web.get(name).and_then(Value::as_str).map(str::to_string);

    Some(SourceCitation {
        title: field("title"),
        url: field("uri"),
    })
}
