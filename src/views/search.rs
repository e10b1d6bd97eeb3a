//! Patient record search view

use crate::errors::{Result, SchoaError};
use crate::gateway::ModelGateway;
use crate::records::{self, Patient};
use crate::views::slot::RequestSlot;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    pub results: String,
}

#[derive(Clone)]
pub struct SearchView {
    gateway: ModelGateway,
    patients: Arc<Vec<Patient>>,
    state: Arc<Mutex<SearchState>>,
    slot: RequestSlot,
}

impl SearchView {
    pub fn new(gateway: ModelGateway, slot: RequestSlot) -> Self {
        Self {
            gateway,
            patients: Arc::new(records::mock_patients()),
            state: Arc::default(),
            slot,
        }
    }

    fn state(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn snapshot(&self) -> SearchState {
        self.state().clone()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.state().query = query.into();
    }

    /// Ask the model to answer the current query from the patient dataset.
    ///
    /// The query is sent verbatim; only a blank query is refused.
    pub async fn search(&self) -> Result<String> {
        let query = self.state().query.clone();
        if query.trim().is_empty() {
            return Err(SchoaError::Rejected("query is empty".to_string()));
        }

        let dataset = serde_json::to_string(self.patients.as_slice())?;
        let ticket = self.slot.begin()?;
        self.slot
            .run(
                ticket,
                self.gateway.search_records(&query, &dataset),
                |text| self.state().results = text.clone(),
            )
            .await
    }

    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    pub fn cancel(&self) -> bool {
        self.slot.cancel()
    }
}
