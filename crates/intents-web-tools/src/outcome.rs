//! Result shapes returned to the agent

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// Text of the "no information" result
pub const NO_INFORMATION: &str = "No information found.";

/// A source used to ground an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// Answer text plus up to three sources. This is the cached value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSummary {
    pub answer_summary: String,
    pub sources: Vec<SourceCitation>,
}

/// The single result of one search invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Summary(SearchSummary),
    NoResults,
    Error(String),
}

impl SearchOutcome {
    /// Short label used in logs and spans
    pub fn kind(&self) -> &'static str {
        match self {
            SearchOutcome::Summary(_) => "summary",
            SearchOutcome::NoResults => "no_results",
            SearchOutcome::Error(_) => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SearchOutcome::Error(_))
    }

    /// Render the JSON handed back to the agent.
    ///
    /// Non-error shapes carry `instruction`; errors are returned bare.
    pub fn to_response(&self, instruction: &str) -> Value {
        match self {
            SearchOutcome::Summary(summary) => json!({
                "answer_summary": summary.answer_summary,
                "sources": summary.sources,
                "instruction": instruction,
            }),
            SearchOutcome::NoResults => json!({
                "results": NO_INFORMATION,
                "instruction": instruction,
            }),
            SearchOutcome::Error(message) => json!({ "error": message }),
        }
    }
}

impl From<SearchError> for SearchOutcome {
    fn from(err: SearchError) -> Self {
        SearchOutcome::Error(err.to_string())
    }
}

/// Failures of a search invocation, rendered to `{error}` at the boundary
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Google Search API key not configured")]
    MissingApiKey,

    #[error("Search error: status {0}")]
    Status(u16),

    #[error("An error occurred during search: request timed out after {0}s")]
    Timeout(u64),

    #[error("An error occurred during search: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("An error occurred during search: invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SearchError {
    /// Classify a transport error. The URL is stripped because it carries
    /// the API key.
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            SearchError::Timeout(timeout_secs)
        } else {
            SearchError::Transport(err.without_url())
        }
    }
}
