//! Configuration loaded from environment variables (after `.env`, if present).

use serde::Serialize;
use std::env;
use std::net::SocketAddr;

/// Which backend holds lead rows.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Airtable(AirtableConfig),
    Sqlite,
}

#[derive(Debug, Clone)]
pub struct AirtableConfig {
    pub token: String,
    pub base_id: String,
    pub table: String,
}

/// Which maps-data provider the scraper calls.
#[derive(Debug, Clone)]
pub enum ScrapeConfig {
    Apify { token: String, actor: String },
    SerpApi { api_key: String },
}

#[derive(Debug, Clone)]
pub struct AzureOpenAiConfig {
    pub api_key: String,
    pub endpoint: String,
    pub deployment: String,
    pub api_version: String,
}

#[derive(Debug, Clone)]
pub struct GmailConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub from_email: String,
    pub from_name: String,
}

/// Per-sender send caps. Zero disables a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendLimits {
    pub daily: u32,
    pub hourly: u32,
}

/// Process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub max_workers: usize,
    pub sqlite_path: String,
    pub store: StoreConfig,
    pub scrape: ScrapeConfig,
    pub openai: AzureOpenAiConfig,
    pub gmail: GmailConfig,
    pub limits: SendLimits,
    pub default_subject: String,
}

pub const DEFAULT_SUBJECT: &str = "Quick question about your business";

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `BIND_ADDR` | Server bind address | `127.0.0.1:3000` |
    /// | `MAX_WORKERS` | Server worker threads | `8` |
    /// | `LEAD_STORE` | `airtable` or `sqlite` | `airtable` |
    /// | `SQLITE_PATH` | Local database file | `leads.sqlite3` |
    /// | `AIRTABLE_PERSONAL_ACCESS_TOKEN` | Airtable token | (required for airtable) |
    /// | `AIRTABLE_BASE_ID` | Airtable base | (required for airtable) |
    /// | `AIRTABLE_TABLE` | Airtable table name | `Leads` |
    /// | `SCRAPE_PROVIDER` | `apify` or `serpapi` | `apify` |
    /// | `APIFY_TOKEN` | Apify token | (required for apify) |
    /// | `APIFY_ACTOR` | Apify actor id | `compass~crawler-google-places` |
    /// | `SERP_API_KEY` | SerpAPI key | (required for serpapi) |
    /// | `AZURE_OPENAI_KEY` | Completion API key | (required) |
    /// | `AZURE_OPENAI_ENDPOINT` | Completion endpoint | (required) |
    /// | `AZURE_OPENAI_DEPLOYMENT` | Deployment name | `nucleus-gpt-35` |
    /// | `AZURE_OPENAI_API_VERSION` | api-version | `2024-02-15-preview` |
    /// | `GMAIL_CLIENT_ID` / `GMAIL_CLIENT_SECRET` / `GMAIL_REFRESH_TOKEN` | OAuth client | (required) |
    /// | `GMAIL_FROM_EMAIL` | Sender address | (required) |
    /// | `GMAIL_FROM_NAME` | Sender display name | `Lead Generation System` |
    /// | `DAILY_EMAIL_LIMIT` / `HOURLY_EMAIL_LIMIT` | Send caps | `50` / `10` |
    /// | `DEFAULT_EMAIL_SUBJECT` | Subject when none given | `Quick question about your business` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let addr_raw = vars.or("BIND_ADDR", "127.0.0.1:3000");
        let addr = addr_raw.parse().map_err(|_| ConfigError::Invalid {
            var: "BIND_ADDR",
            value: addr_raw.clone(),
        })?;

        let max_workers = vars.number("MAX_WORKERS", 8)? as usize;
        let sqlite_path = vars.or("SQLITE_PATH", "leads.sqlite3");

        let store = match vars.or("LEAD_STORE", "airtable").as_str() {
            "airtable" => StoreConfig::Airtable(AirtableConfig {
                token: vars.required("AIRTABLE_PERSONAL_ACCESS_TOKEN")?,
                base_id: vars.required("AIRTABLE_BASE_ID")?,
                table: vars.or("AIRTABLE_TABLE", "Leads"),
            }),
            "sqlite" => StoreConfig::Sqlite,
            other => {
                return Err(ConfigError::Invalid {
                    var: "LEAD_STORE",
                    value: other.to_string(),
                })
            }
        };

        let scrape = match vars.or("SCRAPE_PROVIDER", "apify").as_str() {
            "apify" => ScrapeConfig::Apify {
                token: vars.required("APIFY_TOKEN")?,
                actor: vars.or("APIFY_ACTOR", "compass~crawler-google-places"),
            },
            "serpapi" => ScrapeConfig::SerpApi {
                api_key: vars.required("SERP_API_KEY")?,
            },
            other => {
                return Err(ConfigError::Invalid {
                    var: "SCRAPE_PROVIDER",
                    value: other.to_string(),
                })
            }
        };

        let openai = AzureOpenAiConfig {
            api_key: vars.required("AZURE_OPENAI_KEY")?,
            endpoint: vars.required("AZURE_OPENAI_ENDPOINT")?,
            deployment: vars.or("AZURE_OPENAI_DEPLOYMENT", "nucleus-gpt-35"),
            api_version: vars.or("AZURE_OPENAI_API_VERSION", "2024-02-15-preview"),
        };

        let gmail = GmailConfig {
            client_id: vars.required("GMAIL_CLIENT_ID")?,
            client_secret: vars.required("GMAIL_CLIENT_SECRET")?,
            refresh_token: vars.required("GMAIL_REFRESH_TOKEN")?,
            from_email: vars.required("GMAIL_FROM_EMAIL")?,
            from_name: vars.or("GMAIL_FROM_NAME", "Lead Generation System"),
        };

        let limits = SendLimits {
            daily: vars.number("DAILY_EMAIL_LIMIT", 50)?,
            hourly: vars.number("HOURLY_EMAIL_LIMIT", 10)?,
        };

        Ok(Self {
            addr,
            max_workers,
            sqlite_path,
            store,
            scrape,
            openai,
            gmail,
            limits,
            default_subject: vars.or("DEFAULT_EMAIL_SUBJECT", DEFAULT_SUBJECT),
        })
    }
}

struct Vars<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn number(&self, key: &'static str, default: u32) -> Result<u32, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: key,
                value: raw,
            }),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Which adapter credentials are present. Never carries the values themselves.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigReport {
    pub lead_store: String,
    pub airtable: bool,
    pub scrape_provider: String,
    pub apify: bool,
    pub serp_api: bool,
    pub azure_openai: bool,
    pub azure_openai_deployment: String,
    pub gmail: bool,
}

impl ConfigReport {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);
        let all = |keys: &[&str]| keys.iter().all(|k| vars.get(k).is_some());

        Self {
            lead_store: vars.or("LEAD_STORE", "airtable"),
            airtable: all(&["AIRTABLE_PERSONAL_ACCESS_TOKEN", "AIRTABLE_BASE_ID"]),
            scrape_provider: vars.or("SCRAPE_PROVIDER", "apify"),
            apify: all(&["APIFY_TOKEN"]),
            serp_api: all(&["SERP_API_KEY"]),
            azure_openai: all(&["AZURE_OPENAI_KEY", "AZURE_OPENAI_ENDPOINT"]),
            azure_openai_deployment: vars.or("AZURE_OPENAI_DEPLOYMENT", "nucleus-gpt-35"),
            gmail: all(&[
                "GMAIL_CLIENT_ID",
                "GMAIL_CLIENT_SECRET",
                "GMAIL_REFRESH_TOKEN",
                "GMAIL_FROM_EMAIL",
            ]),
        }
    }
}
