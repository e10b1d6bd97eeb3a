//! Operational & financial view
//!
//! Revenue cycle table with an AI insight action, and the payroll table.

use crate::errors::Result;
use crate::gateway::ModelGateway;
use crate::prompts;
use crate::records::finance::FinancialTotals;
use crate::records::{self, FinancialRecord, PayrollEntry};
use crate::views::slot::RequestSlot;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub struct OperationalView {
    gateway: ModelGateway,
    financials: Arc<Vec<FinancialRecord>>,
    payroll: Arc<Vec<PayrollEntry>>,
    insight: Arc<Mutex<String>>,
    slot: RequestSlot,
}

impl OperationalView {
    pub fn new(gateway: ModelGateway, slot: RequestSlot) -> Self {
        Self {
            gateway,
            financials: Arc::new(records::mock_financial_data()),
            payroll: Arc::new(records::mock_payroll()),
            insight: Arc::default(),
            slot,
        }
    }

    pub fn financials(&self) -> &[FinancialRecord] {
        &self.financials
    }

    pub fn totals(&self) -> FinancialTotals {
        FinancialTotals::from_records(&self.financials)
    }

    pub fn payroll(&self) -> &[PayrollEntry] {
        &self.payroll
    }

    /// Last insight text, empty until one has been produced
    pub fn insight(&self) -> String {
        self.insight.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// CFO-style trend and cost-saving analysis of the half-year figures
    pub async fn analyze_finances(&self) -> Result<String> {
        let dataset = serde_json::to_string(self.financials.as_slice())?;
        let formatted = prompts::financial_insight(&dataset);

        let ticket = self.slot.begin()?;
        self.slot
            .run(
                ticket,
                self.gateway
                    .generate_text(&formatted.prompt, Some(formatted.system_instruction)),
                |text| *self.insight.lock().unwrap_or_else(PoisonError::into_inner) = text.clone(),
            )
            .await
    }

    /// Entries a batch run would pick up. Nothing is transitioned.
    pub fn process_pending_batch(&self) -> Vec<PayrollEntry> {
        let pending: Vec<PayrollEntry> = self.payroll.iter().filter(|e| e.is_pending()).cloned().collect();
        tracing::info!(pending = pending.len(), "payroll batch requested; no state change applied");
        pending
    }

    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    pub fn cancel(&self) -> bool {
        self.slot.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GeminiClient;

    fn view() -> OperationalView {
        let client = GeminiClient::with_config("http://127.0.0.1:9", "gemini-test", "", None).unwrap();
        OperationalView::new(ModelGateway::new(Arc::new(client)), RequestSlot::default())
    }

    #[test]
    fn test_tables_loaded() {
        let view = view();
        assert_eq!(view.financials().len(), 6);
        assert_eq!(view.payroll().len(), 3);
        assert_eq!(view.totals().expenses, 2_010_000);
        assert!(view.insight().is_empty());
    }

    #[test]
    fn test_process_pending_batch_is_a_no_op() {
        let view = view();
        let pending = view.process_pending_batch();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "Nurse John Doe");

        let still_pending = view.payroll().iter().filter(|e| e.is_pending()).count();
        assert_eq!(still_pending, 1);
        assert_eq!(view.process_pending_batch(), pending);
    }
}
