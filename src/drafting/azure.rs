// drafting/azure.rs
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{CompletionProvider, DraftError};
use crate::config::AzureOpenAiConfig;

const MAX_TOKENS: u32 = 300;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Chat completions against an Azure OpenAI deployment.
pub struct AzureOpenAiClient {
    client: Client,
    api_key: String,
    url: String,
    api_version: String,
}

impl AzureOpenAiClient {
    pub fn new(cfg: &AzureOpenAiConfig) -> Result<Self, DraftError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| DraftError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key: cfg.api_key.clone(),
            url: format!("{}/chat/completions", deployment_base(&cfg.endpoint, &cfg.deployment)),
            api_version: cfg.api_version.clone(),
        })
    }
}

/// `https://host/openai/deployments/{name}`. An endpoint that already names a
/// deployment is cut right after the deployment segment and used as-is.
fn deployment_base(endpoint: &str, deployment: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');

    if let Some(idx) = endpoint.find("/deployments/") {
        let after = &endpoint[idx + "/deployments/".len()..];
        let name_len = after.find(['/', '?']).unwrap_or(after.len());
        if name_len > 0 {
            return endpoint[..idx + "/deployments/".len() + name_len].to_string();
        }
    }

    format!("{endpoint}/openai/deployments/{deployment}")
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string())
}

impl CompletionProvider for AzureOpenAiClient {
    fn complete(&self, system: &str, prompt: &str) -> Result<String, DraftError> {
        let body = json!({
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let resp = self
            .client
            .post(&self.url)
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| DraftError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(DraftError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let parsed: ChatResponse = resp.json().map_err(|e| DraftError::Decode(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(DraftError::EmptyCompletion);
        }
        Ok(content)
    }
}
