//! Request formatting
//!
//! Builds the exact text sent to the language model for each module action.
//! Every builder is pure and infallible; empty-input checks happen in the
//! view controllers before a builder is called.

use serde::{Deserialize, Serialize};

/// Scribe persona for note summarization
pub const SCRIBE_SYSTEM_INSTRUCTION: &str = "You are an expert medical scribe assistant.";

/// Decision-support persona for differential diagnosis
pub const DECISION_SUPPORT_SYSTEM_INSTRUCTION: &str =
    "You are a clinical decision support system. Be concise and prioritize high-risk conditions.";

/// CFO persona for financial insight
pub const CFO_SYSTEM_INSTRUCTION: &str = "You are a Chief Financial Officer assistant for a hospital.";

/// Grounding instruction for record search; forbids answers outside the dataset
pub const SEARCH_SYSTEM_INSTRUCTION: &str = "You are a specialized search assistant for a Hospital Information System.
    You have access to a JSON dataset of patients (FHIR-like structure).
    Your job is to interpret the user's natural language query and extract relevant patient information from the provided dataset.
    Do not invent data. If no patient matches, say so.
    Format your answer as a clean, readable list.";

/// Radiology-preview instruction sent alongside an image
pub const IMAGE_ANALYSIS_PROMPT: &str = "Describe this medical image. Identify any potential anomalies or key structures visible. Provide a description suitable for a radiologist's preliminary review.";

const SUMMARY_TEMPLATE_HEAD: &str = "Please summarize the following raw clinical notes into a professional \"After Visit Summary\" format. Extract key vitals, diagnosis mentions, and action items.\n\nRaw Notes:\n";

const DIFFERENTIAL_TEMPLATE_HEAD: &str = "Analyze the following symptoms and patient description. Provide a list of potential differential diagnoses to consider and recommended next steps (labs/imaging). \n\nSymptoms: ";

const FINANCE_TEMPLATE_HEAD: &str = "Analyze the following hospital financial data (Revenue vs Expenses vs Profit) for the first half of the year. Identify trends, potential areas for cost-saving, and overall financial health.\n\nData: ";

/// Binary attachment sent inline with a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineData {
    /// Base64-encoded payload
    pub data: String,
    /// IANA media type, e.g. `image/png`
    pub media_type: String,
}

/// Everything the gateway needs to issue one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRequest {
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub inline_data: Option<InlineData>,
    pub temperature: Option<f32>,
}

impl ModelRequest {
    /// Text-only request
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
            inline_data: None,
            temperature: None,
        }
    }

    /// Attachment followed by an instruction, no system instruction
    pub fn multimodal(data: impl Into<String>, media_type: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
            inline_data: Some(InlineData {
                data: data.into(),
                media_type: media_type.into(),
            }),
            temperature: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A prompt paired with the persona it is sent under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedPrompt {
    pub prompt: String,
    pub system_instruction: &'static str,
}

/// After Visit Summary request for raw consultation notes
pub fn summarize_notes(notes: &str) -> FormattedPrompt {
    FormattedPrompt {
        prompt: format!("{}{}", SUMMARY_TEMPLATE_HEAD, notes),
        system_instruction: SCRIBE_SYSTEM_INSTRUCTION,
    }
}

/// Differential-diagnosis draft for a free-text symptom description
pub fn differential_diagnosis(symptoms: &str) -> FormattedPrompt {
    FormattedPrompt {
        prompt: format!("{}{}", DIFFERENTIAL_TEMPLATE_HEAD, symptoms),
        system_instruction: DECISION_SUPPORT_SYSTEM_INSTRUCTION,
    }
}

/// Trend and cost-saving analysis over serialized financial data
pub fn financial_insight(dataset_json: &str) -> FormattedPrompt {
    FormattedPrompt {
        prompt: format!("{}{}", FINANCE_TEMPLATE_HEAD, dataset_json),
        system_instruction: CFO_SYSTEM_INSTRUCTION,
    }
}

/// Dataset-grounded search prompt: the dataset first, then the query
pub fn record_search(query: &str, dataset_text: &str) -> FormattedPrompt {
    FormattedPrompt {
        prompt: format!("Dataset: {}\n\nUser Query: {}", dataset_text, query),
        system_instruction: SEARCH_SYSTEM_INSTRUCTION,
    }
}

/// Radiology-preview request for an encoded image
pub fn image_analysis(data_base64: &str, media_type: &str) -> ModelRequest {
    ModelRequest::multimodal(data_base64, media_type, IMAGE_ANALYSIS_PROMPT)
}
