use std::path::Path;

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "pdf"];

const CHECKLIST_FOLDER: &str = "checklists";

/// Lowercased extension without the dot. Dotfiles like `.pdf` have none.
pub fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

pub fn allowed_file(file_name: &str) -> bool {
    extension(file_name).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Reduces a user-supplied name to a flat, ASCII-only file name.
pub fn secure_filename(name: &str) -> String {
    let spaced: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Relative path under the upload root for a checklist scan:
/// `checklists/{code}_{Document_Label}_{unix_ts}{.ext}`.
pub fn checklist_file_path(
    employee_code: &str,
    document_name: &str,
    original_file_name: &str,
    unix_timestamp: i64,
) -> String {
    let label = secure_filename(&document_name.replace(' ', "_"));
    let suffix = Path::new(original_file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();
    let file_name =
        secure_filename(&format!("{employee_code}_{label}_{unix_timestamp}{suffix}"));
    format!("{CHECKLIST_FOLDER}/{file_name}")
}
