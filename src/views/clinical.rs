//! Clinical assistant view
//!
//! Three tabs over one shared slot: note summarization, symptom analysis
//! and image analysis.

use crate::errors::{Result, SchoaError};
use crate::gateway::ModelGateway;
use crate::image::ImagePayload;
use crate::prompts;
use crate::views::slot::RequestSlot;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClinicalTab {
    #[default]
    Notes,
    Symptoms,
    Image,
}

impl ClinicalTab {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "notes" | "summary" | "summarize" => Some(ClinicalTab::Notes),
            "symptoms" | "symptom" | "diagnosis" => Some(ClinicalTab::Symptoms),
            "image" | "imaging" => Some(ClinicalTab::Image),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClinicalTab::Notes => "Note Summarizer",
            ClinicalTab::Symptoms => "Symptom Analysis",
            ClinicalTab::Image => "Image Analysis",
        }
    }
}

/// Form fields and result slots
#[derive(Debug, Clone, Default)]
pub struct ClinicalState {
    pub tab: ClinicalTab,
    pub notes: String,
    pub summary: String,
    pub symptoms: String,
    pub diagnosis_draft: String,
    pub image: Option<ImagePayload>,
    pub image_analysis: String,
    image_call: Option<u64>,
}

#[derive(Clone)]
pub struct ClinicalView {
    gateway: ModelGateway,
    state: Arc<Mutex<ClinicalState>>,
    slot: RequestSlot,
}

impl ClinicalView {
    pub fn new(gateway: ModelGateway, slot: RequestSlot) -> Self {
        Self {
            gateway,
            state: Arc::default(),
            slot,
        }
    }

    fn state(&self) -> MutexGuard<'_, ClinicalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> ClinicalState {
        self.state().clone()
    }

    pub fn tab(&self) -> ClinicalTab {
        self.state().tab
    }

    pub fn set_tab(&self, tab: ClinicalTab) {
        self.state().tab = tab;
    }

    pub fn set_notes(&self, notes: impl Into<String>) {
        self.state().notes = notes.into();
    }

    pub fn set_symptoms(&self, symptoms: impl Into<String>) {
        self.state().symptoms = symptoms.into();
    }

    /// Select a new image; any previous analysis is discarded, including
    /// one still in flight
    pub fn select_image(&self, image: ImagePayload) {
        let pending = {
            let mut state = self.state();
            state.image = Some(image);
            state.image_analysis.clear();
            state.image_call.take()
        };
        self.cancel_image_call(pending);
    }

    pub fn remove_image(&self) {
        let pending = {
            let mut state = self.state();
            state.image = None;
            state.image_analysis.clear();
            state.image_call.take()
        };
        self.cancel_image_call(pending);
    }

    // the slot applies results under its own lock, so the state lock is released first
    fn cancel_image_call(&self, pending: Option<u64>) {
        if let Some(generation) = pending {
            if self.slot.cancel_generation(generation) {
                tracing::debug!(generation, "image replaced, analysis cancelled");
            }
        }
    }

    /// Summarize the current notes into an After Visit Summary
    pub async fn summarize(&self) -> Result<String> {
        let notes = self.state().notes.clone();
        if notes.is_empty() {
            return Err(SchoaError::Rejected("notes are empty".to_string()));
        }

        let formatted = prompts::summarize_notes(&notes);
        let ticket = self.slot.begin()?;
        self.slot
            .run(
                ticket,
                self.gateway
                    .generate_text(&formatted.prompt, Some(formatted.system_instruction)),
                |text| self.state().summary = text.clone(),
            )
            .await
    }

    /// Draft a differential diagnosis for the current symptoms
    pub async fn analyze_symptoms(&self) -> Result<String> {
        let symptoms = self.state().symptoms.clone();
        if symptoms.is_empty() {
            return Err(SchoaError::Rejected("symptoms are empty".to_string()));
        }

        let formatted = prompts::differential_diagnosis(&symptoms);
        let ticket = self.slot.begin()?;
        self.slot
            .run(
                ticket,
                self.gateway
                    .generate_text(&formatted.prompt, Some(formatted.system_instruction)),
                |text| self.state().diagnosis_draft = text.clone(),
            )
            .await
    }

    /// Radiology-preview description of the selected image
    pub async fn analyze_image(&self) -> Result<String> {
        let image = self
            .state()
            .image
            .clone()
            .ok_or_else(|| SchoaError::Rejected("no image selected".to_string()))?;

        let ticket = self.slot.begin()?;
        self.state().image_call = Some(ticket.generation());
        self.slot
            .run(
                ticket,
                self.gateway.analyze_image(
                    &image.data_base64,
                    &image.media_type,
                    prompts::IMAGE_ANALYSIS_PROMPT,
                ),
                |text| {
                    let mut state = self.state();
                    state.image_analysis = text.clone();
                    state.image_call = None;
                },
            )
            .await
    }

    /// Run the action behind the active tab
    pub async fn submit_active(&self) -> Result<String> {
        match self.tab() {
            ClinicalTab::Notes => self.summarize().await,
            ClinicalTab::Symptoms => self.analyze_symptoms().await,
            ClinicalTab::Image => self.analyze_image().await,
        }
    }

    /// Accept free text for the active tab
    pub fn input_for_active(&self, text: &str) -> Result<()> {
        match self.tab() {
            ClinicalTab::Notes => self.set_notes(text),
            ClinicalTab::Symptoms => self.set_symptoms(text),
            ClinicalTab::Image => {
                return Err(SchoaError::Rejected(
                    "the image tab takes /image <path>, not free text".to_string(),
                ))
            }
        }
        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    pub fn cancel(&self) -> bool {
        self.slot.cancel()
    }
}
