//! Patient records (FHIR-like, flattened)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single patient as exposed to the search prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub dob: NaiveDate,
    pub gender: String,
    pub condition: Vec<String>,
    pub medications: Vec<String>,
    pub last_visit: NaiveDate,
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The four mock patients, in display order
pub fn mock_patients() -> Vec<Patient> {
    vec![
        Patient {
            id: "P-1001".to_string(),
            name: "John Smith".to_string(),
            dob: date(1980, 5, 15),
            gender: "Male".to_string(),
            condition: strings(&["Hypertension", "Type 2 Diabetes"]),
            medications: strings(&["Metformin", "Lisinopril"]),
            last_visit: date(2023, 10, 12),
        },
        Patient {
            id: "P-1002".to_string(),
            name: "Emily Chen".to_string(),
            dob: date(1992, 11, 20),
            gender: "Female".to_string(),
            condition: strings(&["Asthma"]),
            medications: strings(&["Albuterol Inhaler"]),
            last_visit: date(2024, 1, 5),
        },
        Patient {
            id: "P-1003".to_string(),
            name: "Michael Johnson".to_string(),
            dob: date(1955, 3, 30),
            gender: "Male".to_string(),
            condition: strings(&["Coronary Artery Disease", "Hyperlipidemia"]),
            medications: strings(&["Atorvastatin", "Aspirin"]),
            last_visit: date(2023, 12, 20),
        },
        Patient {
            id: "P-1004".to_string(),
            name: "Sarah Williams".to_string(),
            dob: date(1988, 7, 8),
            gender: "Female".to_string(),
            condition: strings(&["Migraine"]),
            medications: strings(&["Sumatriptan"]),
            last_visit: date(2024, 2, 15),
        },
    ]
}
