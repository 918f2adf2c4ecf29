use serde::Serialize;

const SPAM_WORDS: [&str; 5] = ["urgent", "limited time", "act now", "exclusive offer", "free trial"];
const MIN_CHARS: usize = 50;
const MAX_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCheck {
    pub is_valid: bool,
    pub issues: Vec<String>,
}

/// Heuristic post-check on a drafted message. Advisory only.
pub fn validate_message(message: &str) -> MessageCheck {
    let lower = message.to_lowercase();
    let mut issues = Vec::new();

    let spam: Vec<&str> = SPAM_WORDS.iter().copied().filter(|w| lower.contains(w)).collect();
    if !spam.is_empty() {
        issues.push(format!("Contains spam-like words: {}", spam.join(", ")));
    }

    let chars = message.chars().count();
    if chars < MIN_CHARS {
        issues.push("Message is too short".to_string());
    }
    if chars > MAX_CHARS {
        issues.push("Message is too long".to_string());
    }

    // "your" contains "you".
    if !lower.contains("you") {
        issues.push("Message lacks personalization".to_string());
    }

    MessageCheck {
        is_valid: issues.is_empty(),
        issues,
    }
}
