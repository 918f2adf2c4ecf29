//! Minimal RFC 2822 message for the Gmail raw-send endpoint.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

/// Strip CR/LF so a value can't inject extra headers.
pub fn header_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Bytes of text per encoded word; keeps each word under the 75-char limit.
const ENCODED_WORD_CHUNK: usize = 45;

/// RFC 2047 `B` encoding for non-ASCII header text; ASCII passes through.
/// Long values become several encoded words joined by folding whitespace.
pub fn encode_word(value: &str) -> String {
    if value.is_ascii() {
        return value.to_string();
    }

    let mut words = Vec::new();
    let mut chunk = String::new();
    for c in value.chars() {
        if chunk.len() + c.len_utf8() > ENCODED_WORD_CHUNK {
            words.push(format!("=?utf-8?B?{}?=", STANDARD.encode(chunk.as_bytes())));
            chunk.clear();
        }
        chunk.push(c);
    }
    if !chunk.is_empty() {
        words.push(format!("=?utf-8?B?{}?=", STANDARD.encode(chunk.as_bytes())));
    }
    words.join("\r\n ")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Plain text to HTML: blank lines split paragraphs, single newlines become `<br>`.
pub fn text_to_html(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    let paragraphs: Vec<String> = normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", escape_html(p).replace('\n', "<br>")))
        .collect();

    format!(
        "<html><body style=\"font-family: Arial, sans-serif; line-height: 1.6; color: #333;\">{}</body></html>",
        paragraphs.join("")
    )
}

pub struct Envelope<'a> {
    pub from_name: &'a str,
    pub from_email: &'a str,
    pub to: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
}

pub fn compose(env: &Envelope<'_>) -> String {
    // Bodies that already look like HTML are sent untouched.
    let html = if env.body.trim_start().starts_with('<') {
        env.body.to_string()
    } else {
        text_to_html(env.body)
    };

    format!(
        "From: {} <{}>\r\nTo: {}\r\nSubject: {}\r\nMIME-Version: 1.0\r\nContent-Type: text/html; charset=utf-8\r\n\r\n{}",
        encode_word(&header_value(env.from_name)),
        header_value(env.from_email),
        header_value(env.to),
        encode_word(&header_value(env.subject)),
        html
    )
}

/// base64url without padding, as `users.messages.send` expects in `raw`.
pub fn encode_raw(message: &str) -> String {
    URL_SAFE_NO_PAD.encode(message.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope<'a>(subject: &'a str, body: &'a str) -> Envelope<'a> {
        Envelope {
            from_name: "Lead Generation System",
            from_email: "me@example.com",
            to: "owner@acme.com",
            subject,
            body,
        }
    }

    #[test]
    fn headers_are_crlf_separated() {
        let msg = compose(&envelope("Hello", "Hi there"));
        assert!(msg.starts_with(
            "From: Lead Generation System <me@example.com>\r\nTo: owner@acme.com\r\nSubject: Hello\r\n"
        ));
        assert!(msg.contains("Content-Type: text/html; charset=utf-8\r\n\r\n<html>"));
        assert!(msg.contains("<p>Hi there</p>"));
    }

    #[test]
    fn subject_injection_is_stripped() {
        let msg = compose(&envelope("Hi\r\nBcc: victim@x.com", "body"));
        assert!(msg.contains("Subject: HiBcc: victim@x.com\r\n"));
        assert!(!msg.contains("\r\nBcc:"));
    }

    #[test]
    fn text_body_becomes_escaped_paragraphs() {
        let html = text_to_html("Hi <Acme> & co,\nthanks.\n\nBest,\nSam");
        assert!(html.contains("<p>Hi &lt;Acme&gt; &amp; co,<br>thanks.</p><p>Best,<br>Sam</p>"));
    }

    #[test]
    fn raw_is_url_safe_without_padding() {
        let raw = encode_raw("subject?>>>");
        assert!(!raw.contains('+') && !raw.contains('/') && !raw.contains('='));
        let decoded = URL_SAFE_NO_PAD.decode(raw).unwrap();
        assert_eq!(decoded, b"subject?>>>");
    }

    #[test]
    fn non_ascii_headers_are_encoded_words() {
        let mut env = envelope("Café Plomería", "body");
        env.from_name = "Señor Pipes";
        let msg = compose(&env);

        let subject = format!("Subject: =?utf-8?B?{}?=\r\n", STANDARD.encode("Café Plomería"));
        assert!(msg.contains(&subject));
        let from = format!("From: =?utf-8?B?{}?= <me@example.com>\r\n", STANDARD.encode("Señor Pipes"));
        assert!(msg.starts_with(&from));
        let headers = msg.split("\r\n\r\n").next().unwrap();
        assert!(headers.is_ascii());
    }

    #[test]
    fn long_non_ascii_subject_is_split_into_short_words() {
        let subject = "Plomería rápida en Austin, Texas: ¿necesita ayuda con su página web hoy?";
        let encoded = encode_word(subject);
        let words: Vec<&str> = encoded.split("\r\n ").collect();
        assert!(words.len() > 1);

        let mut decoded = Vec::new();
        for word in words {
            assert!(word.len() <= 75);
            let b64 = word.strip_prefix("=?utf-8?B?").unwrap().strip_suffix("?=").unwrap();
            decoded.extend(STANDARD.decode(b64).unwrap());
        }
        assert_eq!(String::from_utf8(decoded).unwrap(), subject);
    }
}
