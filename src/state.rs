// state.rs
use crate::config::{Config, ConfigReport, StoreConfig};
use crate::db::{init_db, Database, SqliteLeadStore};
use crate::drafting::{AzureOpenAiClient, CompletionProvider};
use crate::mailings::{GmailMailer, Mailer, Outreach, SendLimiter};
use crate::scraper::{build_source, LeadSource};
use crate::store::{AirtableStore, LeadStore};

/// Values handlers read but never change.
#[derive(Debug, Clone)]
pub struct Settings {
    pub default_subject: String,
    pub daily_email_limit: u32,
    pub config_report: ConfigReport,
}

/// One adapter of each kind, built at startup and shared by every worker.
pub struct AppState {
    pub store: Box<dyn LeadStore>,
    pub source: Box<dyn LeadSource>,
    pub completion: Box<dyn CompletionProvider>,
    pub mailer: Box<dyn Mailer>,
    pub limiter: SendLimiter,
    pub settings: Settings,
}

impl AppState {
    pub fn from_config(cfg: &Config, report: ConfigReport) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::new(cfg.sqlite_path.clone());
        init_db(&db)?;

        let store: Box<dyn LeadStore> = match &cfg.store {
            StoreConfig::Airtable(airtable) => Box::new(AirtableStore::new(airtable)?),
            StoreConfig::Sqlite => Box::new(SqliteLeadStore::new(db.clone())),
        };

        Ok(Self {
            store,
            source: build_source(&cfg.scrape)?,
            completion: Box::new(AzureOpenAiClient::new(&cfg.openai)?),
            mailer: Box::new(GmailMailer::new(cfg.gmail.clone())?),
            limiter: SendLimiter::new(db, cfg.limits),
            settings: Settings {
                default_subject: cfg.default_subject.clone(),
                daily_email_limit: cfg.limits.daily,
                config_report: report,
            },
        })
    }

    pub fn outreach(&self) -> Outreach<'_> {
        Outreach {
            mailer: self.mailer.as_ref(),
            limiter: &self.limiter,
            store: self.store.as_ref(),
        }
    }
}
