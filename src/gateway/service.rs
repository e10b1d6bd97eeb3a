//! Model gateway operations
//!
//! Every call goes out through the injected transport exactly once. Failures
//! are logged and collapsed into fixed text at this boundary; nothing is
//! retried and nothing propagates to the caller.

use crate::gateway::outcome::{ModelOutcome, Operation};
use crate::gateway::transport::ModelTransport;
use crate::gateway::wire::GenerateContentRequest;
use crate::prompts::{self, ModelRequest};
use crate::telemetry::TelemetryCollector;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Sampling temperature applied to plain text generation
pub const DEFAULT_TEXT_TEMPERATURE: f32 = 0.2;

/// Stateless gateway over a shared transport
#[derive(Clone)]
pub struct ModelGateway {
    transport: Arc<dyn ModelTransport>,
    temperature: f32,
    telemetry: Option<TelemetryCollector>,
}

impl ModelGateway {
    pub fn new(transport: Arc<dyn ModelTransport>) -> Self {
        Self {
            transport,
            temperature: DEFAULT_TEXT_TEMPERATURE,
            telemetry: None,
        }
    }

    /// Record every completed call into `collector`
    pub fn with_telemetry(mut self, collector: TelemetryCollector) -> Self {
        self.telemetry = Some(collector);
        self
    }

    /// Override the text-generation temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn model(&self) -> &str {
        self.transport.model()
    }

    /// Send one request and classify the result
    pub async fn execute(&self, operation: Operation, request: &ModelRequest) -> ModelOutcome {
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!(
            "model_call",
            %request_id,
            operation = operation.as_str(),
            model = self.transport.model()
        );

        async {
            let started = Instant::now();
            let body = GenerateContentRequest::from(request);
            tracing::debug!(
                prompt_chars = request.prompt.len(),
                has_system_instruction = request.system_instruction.is_some(),
                has_attachment = request.inline_data.is_some(),
                "sending request"
            );

            let outcome = match self.transport.generate_content(&body).await {
                Ok(response) => {
                    let outcome = ModelOutcome::from_response(&response);
                    if outcome == ModelOutcome::EmptyResult {
                        tracing::debug!("service returned no text");
                    }
                    outcome
                }
                Err(e) => {
                    tracing::error!(error = %e, "model call failed");
                    ModelOutcome::from_error(e)
                }
            };

            if let Some(telemetry) = &self.telemetry {
                telemetry.record_call(operation, &outcome, started.elapsed());
            }
            outcome
        }
        .instrument(span)
        .await
    }

    /// Text generation with an optional persona
    pub async fn generate_text_outcome(&self, prompt: &str, system_instruction: Option<&str>) -> ModelOutcome {
        let mut request = ModelRequest::text(prompt).with_temperature(self.temperature);
        if let Some(instruction) = system_instruction {
            request = request.with_system_instruction(instruction);
        }
        self.execute(Operation::GenerateText, &request).await
    }

    pub async fn generate_text(&self, prompt: &str, system_instruction: Option<&str>) -> String {
        self.generate_text_outcome(prompt, system_instruction)
            .await
            .into_text(Operation::GenerateText)
    }

    /// One inline attachment plus one instruction, no persona
    pub async fn analyze_image_outcome(&self, data_base64: &str, media_type: &str, prompt: &str) -> ModelOutcome {
        let request = ModelRequest::multimodal(data_base64, media_type, prompt);
        self.execute(Operation::AnalyzeImage, &request).await
    }

    pub async fn analyze_image(&self, data_base64: &str, media_type: &str, prompt: &str) -> String {
        self.analyze_image_outcome(data_base64, media_type, prompt)
            .await
            .into_text(Operation::AnalyzeImage)
    }

    /// Dataset-grounded search; no temperature override
    pub async fn search_records_outcome(&self, query: &str, dataset_text: &str) -> ModelOutcome {
        let formatted = prompts::record_search(query, dataset_text);
        let request = ModelRequest::text(formatted.prompt).with_system_instruction(formatted.system_instruction);
        self.execute(Operation::SearchRecords, &request).await
    }

    pub async fn search_records(&self, query: &str, dataset_text: &str) -> String {
        self.search_records_outcome(query, dataset_text)
            .await
            .into_text(Operation::SearchRecords)
    }
}
