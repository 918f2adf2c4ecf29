// src/domain/list_field.rs
//
// The legacy spreadsheet schema has no array columns, so list values
// (emails, social links) live in one text cell joined with ", ".
// Known limitation: a value that itself contains ", " splits on the way back.

pub const DELIMITER: &str = ", ";

pub fn join_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(DELIMITER)
}

pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// True when `values` would not survive `join_list` -> `parse_list` unchanged.
pub fn is_lossy(values: &[String]) -> bool {
    values.iter().any(|v| v.contains(DELIMITER))
}
