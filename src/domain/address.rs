// src/domain/address.rs
//
// Fallback parsing for providers that only hand back a one-line address.
// Tuned for US formatting ("street, city, ST 12345"); other layouts may
// come back with an empty city or the raw last segment as state.

fn segments(address: &str) -> Vec<&str> {
    address.split(',').map(str::trim).collect()
}

/// Second-to-last comma segment, or "" when there are fewer than two.
pub fn extract_city(address: &str) -> String {
    let parts = segments(address);
    if parts.len() >= 2 {
        return parts[parts.len() - 2].to_string();
    }
    String::new()
}

/// Two-letter code at the start of the last segment when followed by a 5-digit zip,
/// otherwise the last segment as-is.
pub fn extract_state(address: &str) -> String {
    if address.trim().is_empty() {
        return String::new();
    }
    let parts = segments(address);
    let last = parts.last().copied().unwrap_or_default();

    match state_code_prefix(last) {
        Some(code) => code.to_string(),
        None => last.to_string(),
    }
}

/// Matches `^[A-Z]{2}\s*\d{5}`.
fn state_code_prefix(segment: &str) -> Option<&str> {
    let bytes = segment.as_bytes();
    if bytes.len() < 7 || !bytes[0].is_ascii_uppercase() || !bytes[1].is_ascii_uppercase() {
        return None;
    }
    let rest = segment[2..].trim_start();
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits >= 5 {
        Some(&segment[..2])
    } else {
        None
    }
}
