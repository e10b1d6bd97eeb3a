//! Half-year financial records

use serde::{Deserialize, Serialize};

/// One month of revenue cycle figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub month: String,
    pub revenue: u64,
    pub expenses: u64,
    pub payroll: u64,
    pub profit: u64,
}

fn record(month: &str, revenue: u64, expenses: u64, payroll: u64, profit: u64) -> FinancialRecord {
    FinancialRecord {
        month: month.to_string(),
        revenue,
        expenses,
        payroll,
        profit,
    }
}

/// January through June
pub fn mock_financial_data() -> Vec<FinancialRecord> {
    vec![
        record("Jan", 450_000, 320_000, 150_000, 130_000),
        record("Feb", 420_000, 310_000, 150_000, 110_000),
        record("Mar", 480_000, 350_000, 155_000, 130_000),
        record("Apr", 510_000, 340_000, 155_000, 170_000),
        record("May", 490_000, 330_000, 155_000, 160_000),
        record("Jun", 550_000, 360_000, 160_000, 190_000),
    ]
}

/// Column totals over a set of records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinancialTotals {
    pub revenue: u64,
    pub expenses: u64,
    pub payroll: u64,
    pub profit: u64,
}

impl FinancialTotals {
    pub fn from_records(records: &[FinancialRecord]) -> Self {
        records.iter().fold(Self::default(), |acc, r| Self {
            revenue: acc.revenue + r.revenue,
            expenses: acc.expenses + r.expenses,
            payroll: acc.payroll + r.payroll,
            profit: acc.profit + r.profit,
        })
    }
}
