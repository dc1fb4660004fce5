// 📡 Feed fetcher - spreadsheet CSV export → lines
//
// One request per call: no retry, no cache, no timeout beyond the transport's.

use crate::error::FeedError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// SHEETS
// ============================================================================

/// One tab of the source spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sheet {
    Clients,
    Accounts,
    Agencies,
}

impl Sheet {
    pub const ALL: [Sheet; 3] = [Sheet::Clients, Sheet::Accounts, Sheet::Agencies];

    /// Logical identifier. The tab name sent on the wire comes from `TabNames`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sheet::Clients => "clients",
            Sheet::Accounts => "accounts",
            Sheet::Agencies => "agencies",
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TRANSPORT
// ============================================================================

/// Where sheet text comes from.
///
/// Production uses `HttpSheetSource`; tests plug in canned text.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Raw CSV text of one sheet.
    async fn fetch_text(&self, sheet: Sheet) -> Result<String, FeedError>;
}

/// Spreadsheet CSV export over HTTP.
///
/// The tab is selected by appending `sheet=<tab name>` to `base_url`.
pub struct HttpSheetSource {
    client: reqwest::Client,
    base_url: String,
    tab_names: TabNames,
}

/// Tab name per sheet, as published in the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabNames {
    pub clients: String,
    pub accounts: String,
    pub agencies: String,
}

/// Tab names of the published directory spreadsheet (`DEFAULT_FEED_URL`).
impl Default for TabNames {
    fn default() -> Self {
        TabNames {
            clients: "clientes".to_string(),
            accounts: "contas".to_string(),
            agencies: "agencias".to_string(),
        }
    }
}

impl TabNames {
    pub fn get(&self, sheet: Sheet) -> &str {
        match sheet {
            Sheet::Clients => &self.clients,
            Sheet::Accounts => &self.accounts,
            Sheet::Agencies => &self.agencies,
        }
    }
}

impl HttpSheetSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_tabs(base_url, TabNames::default())
    }

    pub fn with_tabs(base_url: impl Into<String>, tab_names: TabNames) -> Self {
        HttpSheetSource {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            tab_names,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SheetSource for HttpSheetSource {
    async fn fetch_text(&self, sheet: Sheet) -> Result<String, FeedError> {
        let tab = self.tab_names.get(sheet);
        tracing::debug!(sheet = %sheet, tab = %tab, url = %self.base_url, "fetching sheet");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("sheet", tab)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FeedError::Body(e.to_string()))
    }
}

// ============================================================================
// LINES
// ============================================================================

/// Split on LF or CRLF and drop blank lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Fetch one sheet as non-blank lines, header first.
///
/// An empty body, or one with fewer than two non-blank lines (header but no
/// data), is not an error: it yields an empty vector and a warning.
pub async fn fetch_lines(source: &dyn SheetSource, sheet: Sheet) -> Result<Vec<String>, FeedError> {
    let text = source.fetch_text(sheet).await?;
    let lines = split_lines(&text);

    if lines.len() < 2 {
        tracing::warn!(sheet = %sheet, lines = lines.len(), "sheet has no data rows");
        return Ok(Vec::new());
    }

    tracing::debug!(sheet = %sheet, rows = lines.len() - 1, "sheet fetched");
    Ok(lines)
}

// ============================================================================
// TESTS
// ============================================================================
