use crate::domain::Lead;

pub const SYSTEM_PROMPT: &str = "You are a professional business development specialist. \
Write compelling, personalized cold outreach emails that are friendly, brief, and professional. \
Avoid generic language and make each message feel personal to the recipient.";

pub const DEFAULT_TEMPLATE: &str = "Write a friendly and brief cold outreach email to a company named \
{{BusinessName}} located in {{City}}. The email should introduce a lead generation tool for service \
businesses and suggest a quick call. Keep it under 150 words and make it personal and professional.";

/// Substitute `{{Placeholder}}` tokens with lead data. Blank fields get a
/// generic phrase so the prompt never reads "located in ."
pub fn fill_placeholders(template: &str, lead: &Lead) -> String {
    let pick = |value: &str, filler: &'static str| -> String {
        let value = value.trim();
        if value.is_empty() {
            filler.to_string()
        } else {
            value.to_string()
        }
    };

    let substitutions = [
        ("{{BusinessName}}", pick(&lead.name, "this business")),
        ("{{City}}", pick(&lead.city, "your area")),
        ("{{State}}", pick(&lead.state, "your state")),
        ("{{Address}}", pick(&lead.address, "your location")),
        ("{{Website}}", pick(&lead.website, "your website")),
        ("{{Phone}}", pick(&lead.phone, "your phone number")),
    ];

    substitutions
        .iter()
        .fold(template.to_string(), |acc, (token, value)| acc.replace(token, value))
}

/// Caller template if it has any content, otherwise the default.
pub fn choose_template(template: Option<&str>) -> &str {
    match template {
        Some(t) if !t.trim().is_empty() => t,
        _ => DEFAULT_TEMPLATE,
    }
}
