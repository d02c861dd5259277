//! Published spreadsheet fetched as CSV over HTTP
//!
//! Each sheet is downloaded through the spreadsheet's CSV export endpoint.
//! The `SourceSession` carries the HTTP client and optional bearer token; it
//! is created once per process and handed to the backend.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use super::csv_dir::decode_csv;
use super::{LoadError, SheetSource, Table};

const EXPORT_BASE: &str = "https://docs.google.com/spreadsheets/d";

static URL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)").expect("static regex"));
static BARE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{25,}$").expect("static regex"));

/// Extract the spreadsheet id from a sheet URL or a bare id
pub fn spreadsheet_id(location: &str) -> Option<String> {
    let location = location.trim();
    if let Some(caps) = URL_ID.captures(location) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }
    if BARE_ID.is_match(location) {
        return Some(location.to_string());
    }
    None
}

/// CSV export URL for one sheet of a spreadsheet
pub fn export_url(spreadsheet_id: &str, sheet: &str) -> String {
    format!(
        "{}/{}/gviz/tq?tqx=out:csv&sheet={}",
        EXPORT_BASE,
        spreadsheet_id,
        urlencoding::encode(sheet)
    )
}

/// HTTP client plus credentials, shared by every fetch of one run
#[derive(Debug, Clone)]
pub struct SourceSession {
    client: reqwest::Client,
    token: Option<String>,
}

impl SourceSession {
    pub fn new(timeout: Duration, token: Option<String>) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoadError::Unreachable {
                origin: EXPORT_BASE.to_string(),
                reason: format!("could not build HTTP client: {}", e),
            })?;
        let token = token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        Ok(Self { client, token })
    }

    fn headers(&self, origin: &str) -> Result<HeaderMap, LoadError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                LoadError::Unauthorized {
                    origin: origin.to_string(),
                    reason: format!("invalid token: {}", e),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

/// Map a non-success status to a load error
fn status_error(status: StatusCode, sheet: &str, origin: &str) -> LoadError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LoadError::Unauthorized {
            origin: origin.to_string(),
            reason: format!("HTTP {}", status.as_u16()),
        },
        StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => LoadError::MissingSheet {
            sheet: sheet.to_string(),
            origin: origin.to_string(),
        },
        other => LoadError::Unreachable {
            origin: origin.to_string(),
            reason: format!("HTTP {}", other.as_u16()),
        },
    }
}

/// A private sheet answers with a sign-in page instead of CSV
fn looks_like_html(body: &[u8]) -> bool {
    let head = String::from_utf8_lossy(&body[..body.len().min(512)]).to_lowercase();
    let head = head.trim_start();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}

/// Decode a downloaded body into a table
fn decode_body(body: &[u8], sheet: &str, origin: &str) -> Result<Table, LoadError> {
    if looks_like_html(body) {
        return Err(LoadError::Unauthorized {
            origin: origin.to_string(),
            reason: "received an HTML page instead of CSV".to_string(),
        });
    }
    decode_csv(sheet, body)
}

pub struct RemoteSpreadsheet {
    spreadsheet_id: String,
    session: SourceSession,
}

impl RemoteSpreadsheet {
    pub fn new(spreadsheet_id: String, session: SourceSession) -> Self {
        Self {
            spreadsheet_id,
            session,
        }
    }
}

#[async_trait]
impl SheetSource for RemoteSpreadsheet {
    fn describe(&self) -> String {
        format!("spreadsheet {}", self.spreadsheet_id)
    }

    async fn fetch(&self, sheet: &str) -> Result<Table, LoadError> {
        let origin = self.describe();
        let url = export_url(&self.spreadsheet_id, sheet);
        log::debug!("GET {}", url);

        let response = self
            .session
            .client
            .get(&url)
            .headers(self.session.headers(&origin)?)
            .send()
            .await
            .map_err(|e| LoadError::Unreachable {
                origin: origin.clone(),
                reason: if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("{} answered HTTP {} for sheet {}", origin, status, sheet);
            return Err(status_error(status, sheet, &origin));
        }

        let body = response.bytes().await.map_err(|e| LoadError::Unreachable {
            origin: origin.clone(),
            reason: format!("failed to read response body: {}", e),
        })?;
        log::info!("Downloaded {} bytes for sheet {}", body.len(), sheet);

        decode_body(&body, sheet, &origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "1AbCdEfGhIjKlMnOpQrStUvWxYz0123456789";

    #[test]
    fn test_spreadsheet_id_from_url_and_bare_id() {
        let url = format!("https://docs.google.com/spreadsheets/d/{}/edit#gid=0", ID);
        assert_eq!(spreadsheet_id(&url).as_deref(), Some(ID));
        assert_eq!(spreadsheet_id(ID).as_deref(), Some(ID));
        assert_eq!(spreadsheet_id("TRAZABILIDAD.xlsx"), None);
        assert_eq!(spreadsheet_id("short-id"), None);
    }

    #[test]
    fn test_export_url_encodes_sheet_name() {
        assert_eq!(
            export_url("abc", "MI HOJA"),
            "https://docs.google.com/spreadsheets/d/abc/gviz/tq?tqx=out:csv&sheet=MI%20HOJA"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "PROCESO", "x"),
            LoadError::Unauthorized { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "PROCESO", "x"),
            LoadError::Unauthorized { .. }
        ));
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, "PROCESO", "x"),
            LoadError::MissingSheet {
                sheet: "PROCESO".to_string(),
                origin: "x".to_string()
            }
        );
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "PROCESO", "x"),
            LoadError::Unreachable { .. }
        ));
    }

    #[test]
    fn test_login_page_is_unauthorized() {
        let body = b"  <!DOCTYPE html><html><head><title>Sign in</title>";
        assert!(matches!(
            decode_body(body, "PROCESO", "x"),
            Err(LoadError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_csv_body_is_decoded() {
        let body = b"\"IDPROC\",\"FECHA\",\"PROCESO\"\n\"1\",\"05/01/2024\",\"RETIRO\"\n";
        let table = decode_body(body, "PROCESO", "x").unwrap();
        assert_eq!(table.columns, vec!["IDPROC", "FECHA", "PROCESO"]);
        assert_eq!(table.cell(0, 2), Some("RETIRO"));
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let session = SourceSession::new(Duration::from_secs(5), Some("  ".to_string())).unwrap();
        assert!(session.headers("x").unwrap().is_empty());
    }
}
