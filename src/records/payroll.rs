//! Payroll table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payroll processing state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayrollStatus {
    Pending,
    Processed,
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayrollStatus::Pending => write!(f, "Pending"),
            PayrollStatus::Processed => write!(f, "Processed"),
        }
    }
}

/// One employee row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollEntry {
    pub id: String,
    pub name: String,
    pub role: String,
    pub base_salary: u64,
    pub deductions: u64,
    pub net_pay: u64,
    pub status: PayrollStatus,
}

impl PayrollEntry {
    /// Base salary less deductions
    pub fn computed_net_pay(&self) -> u64 {
        self.base_salary.saturating_sub(self.deductions)
    }

    pub fn is_pending(&self) -> bool {
        self.status == PayrollStatus::Pending
    }
}

fn entry(
    id: &str,
    name: &str,
    role: &str,
    base_salary: u64,
    deductions: u64,
    status: PayrollStatus,
) -> PayrollEntry {
    PayrollEntry {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        base_salary,
        deductions,
        net_pay: base_salary - deductions,
        status,
    }
}

pub fn mock_payroll() -> Vec<PayrollEntry> {
    vec![
        entry("EMP001", "Dr. Sarah Smith", "Cardiologist", 15_000, 2_000, PayrollStatus::Processed),
        entry("EMP002", "Nurse John Doe", "Head Nurse", 6_000, 800, PayrollStatus::Pending),
        entry("EMP003", "Admin Jane Roe", "Receptionist", 3_500, 400, PayrollStatus::Processed),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_pay_matches_listed_values() {
        let payroll = mock_payroll();
        let net: Vec<u64> = payroll.iter().map(|e| e.net_pay).collect();
        assert_eq!(net, vec![13_000, 5_200, 3_100]);
        for e in &payroll {
            assert_eq!(e.net_pay, e.computed_net_pay());
        }
    }

    #[test]
    fn test_single_pending_entry() {
        let pending: Vec<_> = mock_payroll().into_iter().filter(|e| e.is_pending()).collect();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "EMP002");
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_value(&mock_payroll()[1]).unwrap();
        assert_eq!(json["status"], "Pending");
        assert_eq!(json["baseSalary"], 6000);
        assert_eq!(json["netPay"], 5200);
    }
}
