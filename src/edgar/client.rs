// src/edgar/client.rs
use crate::edgar::document::flatten_html;
use crate::edgar::models::{CompanySubmission, CompanyTicker, FilingInfo};
use crate::edgar::FilingSource;
use crate::utils::error::EdgarError;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header;
use std::time::Duration;

const SEC_WWW_BASE: &str = "https://www.sec.gov";
const SEC_DATA_BASE: &str = "https://data.sec.gov";

// SEC asks for 10 requests/second max. One pipeline makes three calls.
const EDGAR_REQUEST_DELAY_MS: u64 = 100;
const INDEX_TIMEOUT: Duration = Duration::from_secs(10);
const DOCUMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the three EDGAR endpoints the pipeline needs.
#[derive(Clone)]
pub struct EdgarClient {
    http: reqwest::Client,
    user_agent: String,
    www_base: String,
    data_base: String,
}

impl EdgarClient {
    /// Creates a client that identifies itself with `user_agent` on every call.
    pub fn new(user_agent: impl Into<String>) -> Result<Self, EdgarError> {
        let user_agent = user_agent.into();
        let http = reqwest::Client::builder()
            .user_agent(user_agent.clone()) // Set the required User-Agent
            .build()?;
        Ok(Self {
            http,
            user_agent,
            www_base: SEC_WWW_BASE.to_string(),
            data_base: SEC_DATA_BASE.to_string(),
        })
    }

    /// Points the client at different hosts (mirrors, local fixtures).
    pub fn with_base_urls(mut self, www_base: impl Into<String>, data_base: impl Into<String>) -> Self {
        self.www_base = www_base.into().trim_end_matches('/').to_string();
        self.data_base = data_base.into().trim_end_matches('/').to_string();
        self
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<reqwest::Response, EdgarError> {
        tracing::debug!("GET {} (User-Agent: {})", url, self.user_agent);

        // --- Basic Rate Limiting ---
        tokio::time::sleep(Duration::from_millis(EDGAR_REQUEST_DELAY_MS)).await;

        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json,application/xml,text/html,text/plain,*/*")
            .timeout(timeout)
            .send()
            .await?; // Propagates reqwest::Error as EdgarError::Network

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            if status == reqwest::StatusCode::FORBIDDEN {
                tracing::warn!("Received 403 Forbidden - check User-Agent and rate limits.");
                return Err(EdgarError::RateLimited);
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(EdgarError::FilingDocNotFound(url.to_string()));
            }
            return Err(EdgarError::Http(status));
        }
        Ok(response)
    }

    /// Gets the zero-padded CIK (Central Index Key) for a ticker symbol.
    /// `Ok(None)` means the table was fetched but has no such ticker.
    pub async fn get_cik_from_ticker(&self, ticker: &str) -> Result<Option<String>, EdgarError> {
        let url = format!("{}/files/company_tickers.json", self.www_base);
        let json: serde_json::Value = self.get(&url, INDEX_TIMEOUT).await?.json().await?;
        find_cik(&json, ticker)
    }

    /// Fetches the company submission data for a given CIK.
    pub async fn get_company_submissions(&self, cik: &str) -> Result<CompanySubmission, EdgarError> {
        let url = format!("{}/submissions/CIK{}.json", self.data_base, cik);
        let submission: CompanySubmission = self.get(&url, INDEX_TIMEOUT).await?.json().await?;
        Ok(submission)
    }

    /// Downloads a specific filing document from its URL.
    pub async fn download_filing_doc(&self, url: &str) -> Result<String, EdgarError> {
        tracing::info!("Downloading document from: {}", url);
        let body = self.get(url, DOCUMENT_TIMEOUT).await?.text().await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[async_trait]
impl FilingSource for EdgarClient {
    async fn resolve_cik(&self, ticker: &str) -> Result<Option<String>, EdgarError> {
        self.get_cik_from_ticker(ticker).await
    }

    async fn locate_filing(&self, cik: &str, form_type: &str) -> Result<Option<FilingInfo>, EdgarError> {
        let submissions = self.get_company_submissions(cik).await?;
        Ok(find_latest_filing(&submissions, cik, form_type))
    }

    fn document_url(&self, filing: &FilingInfo) -> String {
        filing.primary_doc_url_with_base(&self.www_base)
    }

    async fn fetch_document_text(&self, url: &str) -> Result<String, EdgarError> {
        let html = self.download_filing_doc(url).await?;
        // Parsing a multi-megabyte filing is CPU-bound; keep it off the reactor.
        tokio::task::spawn_blocking(move || flatten_html(&html))
            .await
            .map_err(|e| EdgarError::Parse(format!("HTML flattening task failed: {}", e)))
    }
}

/// Case-insensitive scan of the ticker table, in document order, for the first match.
pub fn find_cik(table: &serde_json::Value, ticker: &str) -> Result<Option<String>, EdgarError> {
    let entries = table
        .as_object()
        .ok_or_else(|| EdgarError::Parse("Invalid JSON structure".to_string()))?;

    for company in entries.values() {
        let Ok(record) = serde_json::from_value::<CompanyTicker>(company.clone()) else {
            continue;
        };
        if record.ticker.eq_ignore_ascii_case(ticker) {
            return Ok(Some(record.padded_cik()));
        }
    }
    Ok(None)
}

/// Returns the first (most recent) filing of `form_type` in the recent list.
pub fn find_latest_filing(submissions: &CompanySubmission, cik: &str, form_type: &str) -> Option<FilingInfo> {
    let recent = &submissions.filings.recent;
    let i = recent.form.iter().position(|form| form == form_type)?;

    let accession_number = recent.accession_number.get(i)?;
    let primary_doc = recent.primary_document.get(i)?;
    let filing_date = recent
        .filing_date
        .get(i)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

    Some(FilingInfo {
        accession_number: accession_number.clone(),
        filing_date,
        form_type: form_type.to_string(),
        company_name: submissions.name.clone(),
        cik: cik.to_string(),
        primary_doc: primary_doc.clone(),
    })
}
