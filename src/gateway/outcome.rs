//! Structured call outcomes and their fixed display strings

use crate::errors::SchoaError;
use crate::gateway::wire::GenerateContentResponse;
use std::fmt;

/// The three gateway call shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GenerateText,
    AnalyzeImage,
    SearchRecords,
}

impl Operation {
    /// Returned when the service succeeds without any text
    pub fn empty_placeholder(&self) -> &'static str {
        match self {
            Operation::GenerateText => "No response generated.",
            Operation::AnalyzeImage => "No analysis generated.",
            Operation::SearchRecords => "No results found.",
        }
    }

    /// Returned for every failure class
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::GenerateText => {
                "Error: Unable to generate response. Please check your API key or connection."
            }
            Operation::AnalyzeImage => "Error: Unable to analyze image.",
            Operation::SearchRecords => "Error processing search query.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GenerateText => "generate_text",
            Operation::AnalyzeImage => "analyze_image",
            Operation::SearchRecords => "search_records",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one gateway call before it is collapsed into display text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOutcome {
    Success(String),
    EmptyResult,
    TransportError(String),
    AuthError(String),
    ServiceError { status: u16, message: String },
}

impl ModelOutcome {
    pub fn from_response(response: &GenerateContentResponse) -> Self {
        match response.text() {
            Some(text) => ModelOutcome::Success(text),
            None => ModelOutcome::EmptyResult,
        }
    }

    pub fn from_error(error: SchoaError) -> Self {
        match error {
            SchoaError::AuthError { message, .. } => ModelOutcome::AuthError(message),
            SchoaError::ServiceError { status, message } => ModelOutcome::ServiceError { status, message },
            other => ModelOutcome::TransportError(other.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ModelOutcome::Success(_))
    }

    /// Auth, transport and service failures; an empty result is not one
    pub fn is_failure(&self) -> bool {
        !matches!(self, ModelOutcome::Success(_) | ModelOutcome::EmptyResult)
    }

    /// Display text for this outcome: the response, the placeholder, or the
    /// operation's fixed failure string
    pub fn into_text(self, operation: Operation) -> String {
        match self {
            ModelOutcome::Success(text) => text,
            ModelOutcome::EmptyResult => operation.empty_placeholder().to_string(),
            _ => operation.failure_message().to_string(),
        }
    }
}
