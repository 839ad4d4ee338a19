use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{info, warn};

use crate::calendar::Event;
use crate::source::{convert, csv, fallback};

const DEFAULT_BASE_URL: &str = "https://docs.google.com";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("endpoint returned status {0}")]
    BadStatus(StatusCode),
    #[error("response body does not look like CSV")]
    NotCsv,
    #[error("spreadsheet unreachable or not published publicly ({last})")]
    Exhausted { last: String },
    #[error("no valid events found in the spreadsheet")]
    NoValidEvents,
}

/// Outcome of one load cycle.
///
/// Fallback is a typed result, not an error escaping the source: callers
/// always receive a usable event list, plus the reason when it is the
/// bundled one.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(Vec<Event>),
    Fallback { events: Vec<Event>, reason: String },
}

impl LoadOutcome {
    pub fn events(&self) -> &[Event] {
        match self {
            LoadOutcome::Loaded(events) => events,
            LoadOutcome::Fallback { events, .. } => events,
        }
    }

    pub fn into_events(self) -> Vec<Event> {
        match self {
            LoadOutcome::Loaded(events) => events,
            LoadOutcome::Fallback { events, .. } => events,
        }
    }

    pub fn using_fallback(&self) -> bool {
        matches!(self, LoadOutcome::Fallback { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadOutcome::Loaded(_) => None,
            LoadOutcome::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Anything that can produce a full event collection for one cycle.
#[async_trait]
pub trait EventSource {
    async fn load(&self) -> LoadOutcome;
}

/// Client for a publish-to-web Google Sheets document.
pub struct SheetClient {
    base_url: String,
    sheet_id: String,
    gid: u32,
    client: reqwest::Client,
}

impl SheetClient {
    pub fn new(sheet_id: String, gid: u32) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            sheet_id,
            gid,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Candidate export endpoints, tried strictly in this order.
    fn candidate_urls(&self) -> Vec<String> {
        vec![
            format!(
                "{}/spreadsheets/d/e/{}/pub?output=csv",
                self.base_url, self.sheet_id
            ),
            format!(
                "{}/spreadsheets/d/e/{}/pub?gid={}&single=true&output=csv",
                self.base_url, self.sheet_id, self.gid
            ),
            format!(
                "{}/spreadsheets/d/{}/export?format=csv&gid={}",
                self.base_url, self.sheet_id, self.gid
            ),
        ]
    }

    async fn fetch_candidate(&self, url: &str) -> Result<String, FetchError> {
        // Published sheets sit behind aggressive caches; a timestamp
        // parameter defeats them without custom headers the endpoint
        // would reject.
        let separator = if url.contains('?') { '&' } else { '?' };
        let busted = format!("{}{}_t={}", url, separator, Utc::now().timestamp_millis());

        let response = self
            .client
            .get(&busted)
            .header("Cache-Control", "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status));
        }

        let body = response.text().await?;
        if !looks_like_csv(&body) {
            return Err(FetchError::NotCsv);
        }
        Ok(body)
    }

    /// Tries each candidate in order; the first accepted body wins.
    pub async fn fetch_csv(&self) -> Result<String, FetchError> {
        let mut last_error: Option<FetchError> = None;

        for url in self.candidate_urls() {
            match self.fetch_candidate(&url).await {
                Ok(body) => {
                    info!("Fetched sheet CSV from {}", url);
                    return Ok(body);
                }
                Err(err) => {
                    warn!("Candidate {} rejected: {}", url, err);
                    last_error = Some(err);
                }
            }
        }

        let last = last_error
            .map(|err| err.to_string())
            .unwrap_or_else(|| "no transport error captured".to_string());
        Err(FetchError::Exhausted { last })
    }

    async fn load_events(&self) -> Result<Vec<Event>, FetchError> {
        let body = self.fetch_csv().await?;
        let rows = csv::parse(&body);
        let events: Vec<Event> = rows.iter().filter_map(convert::convert).collect();

        info!("Converted {} of {} sheet rows into events", events.len(), rows.len());

        if events.is_empty() {
            return Err(FetchError::NoValidEvents);
        }
        Ok(events)
    }
}

#[async_trait]
impl EventSource for SheetClient {
    async fn load(&self) -> LoadOutcome {
        match self.load_events().await {
            Ok(events) => LoadOutcome::Loaded(events),
            Err(err) => {
                warn!("Falling back to bundled events: {}", err);
                LoadOutcome::Fallback {
                    events: fallback::fallback_events(),
                    reason: format!(
                        "No se pudo cargar desde Google Sheet: {}. Usando datos de respaldo.",
                        err
                    ),
                }
            }
        }
    }
}

/// Best-effort sniff that a response body is CSV rather than an HTML
/// error or login page: non-blank, no HTML document markers, at least
/// one comma and one newline. Not a content-type guarantee.
pub fn looks_like_csv(body: &str) -> bool {
    let trimmed = body.trim();
    !trimmed.is_empty()
        && !trimmed.contains("<!DOCTYPE")
        && !trimmed.contains("<html")
        && trimmed.contains(',')
        && body.contains('\n')
}
