//! File custody helpers: document lists, confirmation mail, month buckets.

use chrono::NaiveDate;

use super::domain::FileTrackingRecord;
use super::repository::MailMessage;

/// Splits a stored `documents_taken` value on commas, dropping blanks.
pub fn split_documents(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_documents(documents: &[String]) -> String {
    documents.join(",")
}

/// Mail sent to whoever takes a personnel file, if they left an address.
pub fn confirmation_mail(employee_code: &str, record: &FileTrackingRecord) -> Option<MailMessage> {
    let to = record.taken_by_email.as_deref()?.trim();
    if to.is_empty() {
        return None;
    }

    let expected_return = record.expected_return_date.as_deref().unwrap_or("-");
    let body = format!(
        "Hi {name},\n\n\
         This is a confirmation that you have taken the file related to Employee Code: {employee_code}.\n\n\
         Please ensure the file is returned before {expected_return}.\n\n\
         Thank you,\nAdmin Team",
        name = record.taken_by,
    );

    Some(MailMessage {
        to: to.to_string(),
        subject: format!("File Taken Confirmation for Employee Code {employee_code}"),
        body,
    })
}

/// `YYYY-MM` bucket for a `date_taken` value written as `M/D/YYYY` or `YYYY-MM-DD`.
pub fn month_bucket(date_taken: &str) -> Option<String> {
    let trimmed = date_taken.trim();
    let date = if trimmed.contains('/') {
        NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").ok()?
    } else {
        let bytes = trimmed.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()?
    };
    Some(date.format("%Y-%m").to_string())
}
