//! Mock hospital datasets
//!
//! Static, hardcoded records standing in for a real data store: the patient
//! list searched by the Search view, the financial half-year shown on the
//! Operations view, and the payroll table next to it.

pub mod finance;
pub mod patient;
pub mod payroll;

pub use finance::{mock_financial_data, FinancialRecord};
pub use patient::{mock_patients, Patient};
pub use payroll::{mock_payroll, PayrollEntry, PayrollStatus};

use crate::errors::Result;

/// Compact JSON text of the patient list, as embedded in search prompts
pub fn patients_json() -> Result<String> {
    Ok(serde_json::to_string(&mock_patients())?)
}

/// Compact JSON text of the financial records, as embedded in insight prompts
pub fn financial_json() -> Result<String> {
    Ok(serde_json::to_string(&mock_financial_data())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patients_json_uses_camel_case_fields() {
        let json = patients_json().unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"lastVisit\":\"2023-10-12\""));
        assert!(json.contains("\"condition\":[\"Hypertension\",\"Type 2 Diabetes\"]"));
        assert!(json.contains("\"dob\":\"1980-05-15\""));
    }

    #[test]
    fn test_financial_json_is_compact() {
        let json = financial_json().unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with("[{\"month\":\"Jan\",\"revenue\":450000"));
    }
}
