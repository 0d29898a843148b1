//! HTTP client for the record store.

use std::thread;
use std::time::Duration;

use muster_core::{SourceId, SourceRecord};
use serde::{Deserialize, Serialize};

const MAX_RETRIES: u32 = 3;
const USER_AGENT: &str = concat!("muster/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum StoreError {
    /// No API token configured.
    NotAuthenticated,
    /// Auth rejected by the store (401/403).
    Auth(u16, String),
    /// Request rejected as invalid (400).
    Validation(String),
    /// Record or table not found (404).
    NotFound(String),
    /// Rate limited after retries (429).
    RateLimited,
    /// 5xx or network failure after retries.
    Upstream(String),
    /// Response body did not parse.
    Parse(String),
    /// Pagination cursor repeated — the listing would never terminate.
    PaginationStuck(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "no store API token configured"),
            Self::Auth(status, msg) => write!(f, "store auth failed ({status}): {msg}"),
            Self::Validation(msg) => write!(f, "store rejected request: {msg}"),
            Self::NotFound(what) => write!(f, "not found: {what}"),
            Self::RateLimited => write!(f, "store rate limited after {MAX_RETRIES} attempts"),
            Self::Upstream(msg) => write!(f, "store error: {msg}"),
            Self::Parse(msg) => write!(f, "bad store response: {msg}"),
            Self::PaginationStuck(offset) => {
                write!(f, "store pagination stuck: offset {offset:?} repeated")
            }
        }
    }
}

impl std::error::Error for StoreError {}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// One row as the store returns it — the flat-file schema plus a stable id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRow {
    pub id: String,
    pub name: String,
    pub faction: String,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub availability: u32,
    #[serde(default)]
    pub command: u32,
    #[serde(default)]
    pub high_command: bool,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub special_rules: Vec<String>,
}

impl StoreRow {
    pub fn into_record(self) -> SourceRecord {
        SourceRecord {
            origin: SourceId::Store,
            id: Some(self.id),
            name: self.name,
            faction: self.faction,
            points: self.points,
            availability: self.availability,
            command: self.command,
            high_command: self.high_command,
            keywords: self.keywords,
            special_rules: self.special_rules,
        }
    }
}

#[derive(Debug)]
pub struct RecordPage {
    pub rows: Vec<StoreRow>,
    /// Cursor for the next page; `None` on the last page.
    pub next_offset: Option<String>,
}

// ---------------------------------------------------------------------------
// Abstract capability
// ---------------------------------------------------------------------------

/// The "list records" capability the loaders and the fix applicator consume.
/// Abstract so callers can reconcile against anything that can enumerate and
/// patch rows.
pub trait RecordStore {
    fn list_page(&self, table: &str, offset: Option<&str>) -> Result<RecordPage, StoreError>;
    fn fetch_record(&self, table: &str, id: &str) -> Result<StoreRow, StoreError>;
    fn update_field(
        &self,
        table: &str,
        id: &str,
        field: &str,
        value: &serde_json::Value,
    ) -> Result<(), StoreError>;
}

/// Fetch every row of a table, exhausting pagination before returning.
///
/// A partial result is never returned: any page failure aborts the whole
/// load. `progress` is called once per page with (page number, rows so far
/// on that page).
pub fn load_all<S: RecordStore>(
    store: &S,
    table: &str,
    mut progress: impl FnMut(u32, usize),
) -> Result<Vec<SourceRecord>, StoreError> {
    let mut records = Vec::new();
    let mut offset: Option<String> = None;
    let mut page = 0u32;

    loop {
        page += 1;
        let batch = store.list_page(table, offset.as_deref())?;
        progress(page, batch.rows.len());
        records.extend(batch.rows.into_iter().map(StoreRow::into_record));

        match batch.next_offset {
            Some(next) => {
                if offset.as_deref() == Some(next.as_str()) {
                    return Err(StoreError::PaginationStuck(next));
                }
                offset = Some(next);
            }
            None => break,
        }
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Record-store API client (blocking).
#[derive(Clone, Debug)]
pub struct HttpStore {
    http: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, StoreError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(StoreError::NotAuthenticated);
        }
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StoreError::Upstream(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Make a request with retry + exponential backoff. 429 and 5xx retry
    /// (honoring `Retry-After`); auth and validation errors fail
    /// immediately.
    fn request_with_retry(
        &self,
        build_request: impl Fn(&reqwest::blocking::Client) -> reqwest::blocking::RequestBuilder,
    ) -> Result<serde_json::Value, StoreError> {
        let mut backoff_secs = 1u64;

        for attempt in 0..=MAX_RETRIES {
            let req = build_request(&self.http).bearer_auth(&self.token);

            match req.send() {
                Ok(resp) => {
                    let status = resp.status().as_u16();

                    if status == 401 || status == 403 {
                        return Err(StoreError::Auth(status, error_message(resp)));
                    }
                    if status == 400 {
                        return Err(StoreError::Validation(error_message(resp)));
                    }
                    if status == 404 {
                        return Err(StoreError::NotFound(error_message(resp)));
                    }
                    if status >= 400 && status < 500 && status != 429 {
                        return Err(StoreError::Upstream(format!(
                            "HTTP {status}: {}",
                            error_message(resp)
                        )));
                    }

                    if status == 429 || status >= 500 {
                        if attempt == MAX_RETRIES {
                            return Err(if status == 429 {
                                StoreError::RateLimited
                            } else {
                                StoreError::Upstream(format!(
                                    "HTTP {status} after {MAX_RETRIES} attempts"
                                ))
                            });
                        }
                        let wait = if status == 429 {
                            resp.headers()
                                .get("retry-after")
                                .and_then(|v| v.to_str().ok())
                                .and_then(|v| v.parse::<u64>().ok())
                                .unwrap_or(backoff_secs)
                        } else {
                            backoff_secs
                        };
                        thread::sleep(Duration::from_secs(wait));
                        backoff_secs *= 2;
                        continue;
                    }

                    return resp
                        .json::<serde_json::Value>()
                        .map_err(|e| StoreError::Parse(e.to_string()));
                }
                Err(e) => {
                    if attempt == MAX_RETRIES {
                        return Err(StoreError::Upstream(format!(
                            "network error after {MAX_RETRIES} attempts: {e}"
                        )));
                    }
                    thread::sleep(Duration::from_secs(backoff_secs));
                    backoff_secs *= 2;
                }
            }
        }

        unreachable!()
    }
}

fn error_message(resp: reqwest::blocking::Response) -> String {
    let status = resp.status().as_u16();
    let body: serde_json::Value = resp.json().unwrap_or(serde_json::Value::Null);
    body["error"]
        .as_str()
        .or_else(|| body["message"].as_str())
        .map(String::from)
        .unwrap_or_else(|| format!("HTTP {status}"))
}

impl RecordStore for HttpStore {
    fn list_page(&self, table: &str, offset: Option<&str>) -> Result<RecordPage, StoreError> {
        let url = format!("{}/tables/{table}/records", self.base_url);
        // The store treats offset "0" as the start of the listing.
        let offset = offset.unwrap_or("0");
        let body =
            self.request_with_retry(|http| http.get(&url).query(&[("offset", offset)]))?;

        let rows = body["records"]
            .as_array()
            .ok_or_else(|| StoreError::Parse("response missing 'records' array".into()))?
            .iter()
            .map(|row| {
                serde_json::from_value(row.clone()).map_err(|e| StoreError::Parse(e.to_string()))
            })
            .collect::<Result<Vec<StoreRow>, StoreError>>()?;

        let next_offset = body["offset"].as_str().map(String::from);

        Ok(RecordPage { rows, next_offset })
    }

    fn fetch_record(&self, table: &str, id: &str) -> Result<StoreRow, StoreError> {
        let url = format!("{}/tables/{table}/records/{id}", self.base_url);
        let body = self.request_with_retry(|http| http.get(&url))?;
        serde_json::from_value(body).map_err(|e| StoreError::Parse(e.to_string()))
    }

    fn update_field(
        &self,
        table: &str,
        id: &str,
        field: &str,
        value: &serde_json::Value,
    ) -> Result<(), StoreError> {
        let url = format!("{}/tables/{table}/records/{id}", self.base_url);
        let body = serde_json::json!({ "fields": { field: value } });
        self.request_with_retry(|http| http.patch(&url).json(&body))?;
        Ok(())
    }
}
