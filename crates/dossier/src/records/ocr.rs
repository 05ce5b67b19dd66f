//! Post-processing of OCR text captured from badges and documents.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn code_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"[0-9]{4,}").ok())
        .as_ref()
}

/// First run of four or more digits in the recognized text.
pub fn extract_employee_code(text: &str) -> Option<&str> {
    code_pattern()?.find(text).map(|found| found.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrOutcome {
    Found,
    UnknownCode,
    NoCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrLookupResult {
    pub outcome: OcrOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
    pub message: String,
}

impl OcrLookupResult {
    pub fn found(code: &str) -> Self {
        Self {
            outcome: OcrOutcome::Found,
            employee_code: Some(code.to_string()),
            message: format!("Found employee {code}"),
        }
    }

    pub fn unknown_code(code: &str) -> Self {
        Self {
            outcome: OcrOutcome::UnknownCode,
            employee_code: Some(code.to_string()),
            message: format!("Employee code {code} not found."),
        }
    }

    pub fn no_code() -> Self {
        Self {
            outcome: OcrOutcome::NoCode,
            employee_code: None,
            message: "Employee code not detected in the uploaded image.".to_string(),
        }
    }
}
