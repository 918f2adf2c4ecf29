use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use astra::{Body, Request, Response};
use http::Method;
use tempfile::TempDir;

use crate::config::{ConfigReport, SendLimits};
use crate::db::{init_db, Database, SqliteLeadStore};
use crate::domain::{Lead, LeadPatch, LeadStatus};
use crate::drafting::{CompletionProvider, DraftError};
use crate::mailings::{MailError, Mailer, OutgoingEmail, SendLimiter};
use crate::scraper::{LeadSource, ScraperError};
use crate::state::{AppState, Settings};
use crate::store::{LeadStore, StoreError};

fn db_in(dir: &TempDir) -> Database {
    Database::new(dir.path().join("test.sqlite3").to_string_lossy().to_string())
}

/// A fresh schema-initialized SQLite store in its own temp dir.
pub fn temp_store() -> (TempDir, SqliteLeadStore) {
    let dir = tempfile::tempdir().unwrap();
    let db = db_in(&dir);
    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    (dir, SqliteLeadStore::new(db))
}

/// Limiter over the same database file as `temp_store`.
pub fn temp_limiter(dir: &TempDir, limits: SendLimits) -> SendLimiter {
    let db = db_in(dir);
    init_db(&db).unwrap();
    SendLimiter::new(db, limits)
}

/// SQLite store whose `create` fails for one business name.
pub struct FailingStore {
    inner: SqliteLeadStore,
    fail_name: String,
}

impl FailingStore {
    pub fn failing_on(inner: SqliteLeadStore, name: &str) -> Self {
        Self {
            inner,
            fail_name: name.to_string(),
        }
    }
}

impl LeadStore for FailingStore {
    fn create(&self, lead: &Lead) -> Result<String, StoreError> {
        if lead.name == self.fail_name {
            return Err(StoreError::Api {
                status: 422,
                message: format!("rejected {}", lead.name),
            });
        }
        self.inner.create(lead)
    }

    fn update(&self, id: &str, patch: &LeadPatch) -> Result<(), StoreError> {
        self.inner.update(id, patch)
    }

    fn list(&self, status: Option<LeadStatus>, limit: Option<usize>) -> Result<Vec<Lead>, StoreError> {
        self.inner.list(status, limit)
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Lead>, StoreError> {
        self.inner.get_by_id(id)
    }
}

// ---------- fake adapters ----------

pub struct FakeSource {
    leads: Vec<Lead>,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn with_names(names: &[&str]) -> Self {
        Self {
            leads: names.iter().map(|n| Lead::new(*n)).collect(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_names(&[])
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for FakeSource {
    /// Three contactable businesses with parseable addresses.
    fn default() -> Self {
        let leads = [
            ("Acme Plumbing", "acme", "7310 Menchaca Rd, Austin, TX 78745"),
            ("Bluebonnet Pipes", "bluebonnet", "12 Oak St, Round Rock, TX 78664"),
            ("Cedar Drain Co", "cedar", "400 Elm Ave, Austin, TX 78701"),
        ]
        .into_iter()
        .map(|(name, slug, address)| {
            let mut lead = Lead::new(name);
            lead.address = address.into();
            lead.emails = vec![format!("owner@{slug}.com")];
            lead.website = format!("https://{slug}.com");
            lead
        })
        .collect();

        Self {
            leads,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }
}

impl LeadSource for FakeSource {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn search(&self, _query: &str, max: usize) -> Result<Vec<Lead>, ScraperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ScraperError::Provider {
                status: 503,
                message: "provider unavailable".into(),
            });
        }
        Ok(self.leads.iter().take(max).cloned().collect())
    }
}

/// Returns the user prompt as the completion, so tests can assert on the filled template.
#[derive(Default)]
pub struct FakeCompletion {
    fail_with: Option<String>,
    fail_on: Option<String>,
    last_system: Mutex<Option<String>>,
}

impl FakeCompletion {
    pub fn echo() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Fails only for prompts containing `marker`.
    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
            ..Self::default()
        }
    }

    pub fn last_system(&self) -> Option<String> {
        self.last_system.lock().unwrap().clone()
    }
}

impl CompletionProvider for FakeCompletion {
    fn complete(&self, system: &str, prompt: &str) -> Result<String, DraftError> {
        *self.last_system.lock().unwrap() = Some(system.to_string());

        if let Some(message) = &self.fail_with {
            return Err(DraftError::Api {
                status: 429,
                message: message.clone(),
            });
        }
        if self.fail_on.as_deref().is_some_and(|m| prompt.contains(m)) {
            return Err(DraftError::EmptyCompletion);
        }
        Ok(prompt.to_string())
    }
}

/// Records every message; clones share the outbox.
#[derive(Clone, Default)]
pub struct FakeMailer {
    outbox: Arc<Mutex<Vec<OutgoingEmail>>>,
    fail_for: Option<String>,
    delay: Option<Duration>,
}

impl FakeMailer {
    pub fn failing_for(address: &str) -> Self {
        Self {
            fail_for: Some(address.to_string()),
            ..Self::default()
        }
    }

    /// Each send blocks for `delay` first, like a slow provider.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.outbox.lock().unwrap().clone()
    }
}

impl Mailer for FakeMailer {
    fn sender(&self) -> &str {
        "outreach@example.com"
    }

    fn send(&self, email: &OutgoingEmail) -> Result<Option<String>, MailError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.fail_for.as_deref() == Some(email.to.as_str()) {
            return Err(MailError::Api {
                status: 400,
                message: "Invalid To header".into(),
            });
        }
        let mut outbox = self.outbox.lock().unwrap();
        outbox.push(email.clone());
        Ok(Some(format!("msg-{}", outbox.len())))
    }
}

// ---------- whole app ----------

pub struct TestApp {
    _dir: TempDir,
    pub state: AppState,
    pub mailer: FakeMailer,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_source(FakeSource::default())
    }

    pub fn with_failing_source() -> Self {
        Self::with_source(FakeSource::failing())
    }

    fn with_source(source: FakeSource) -> Self {
        let (dir, store) = temp_store();
        let limits = SendLimits { daily: 50, hourly: 10 };
        let limiter = temp_limiter(&dir, limits);
        let mailer = FakeMailer::default();

        let state = AppState {
            store: Box::new(store),
            source: Box::new(source),
            completion: Box::new(FakeCompletion::echo()),
            mailer: Box::new(mailer.clone()),
            limiter,
            settings: Settings {
                default_subject: "Quick question".into(),
                daily_email_limit: limits.daily,
                config_report: ConfigReport::from_lookup(|key| {
                    (key == "LEAD_STORE").then(|| "sqlite".to_string())
                }),
            },
        };

        Self {
            _dir: dir,
            state,
            mailer,
        }
    }

    /// Store a lead directly and return its id.
    pub fn seed(&self, lead: Lead) -> String {
        self.state.store.create(&lead).unwrap()
    }

    pub fn lead(&self, id: &str) -> Lead {
        self.state.store.get_by_id(id).unwrap().unwrap()
    }
}

// ---------- requests ----------

pub fn request(method: Method, uri: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form_request(uri: &str, fields: &[(&str, &str)]) -> Request {
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish();
    http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(encoded))
        .unwrap()
}

pub fn body_bytes(resp: Response) -> Vec<u8> {
    let mut bytes = Vec::new();
    resp.into_body().reader().read_to_end(&mut bytes).unwrap();
    bytes
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn body_json(resp: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(resp)).unwrap()
}
