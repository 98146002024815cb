// src/edgar/mod.rs
pub mod client;
pub mod document;
pub mod models;

use crate::utils::error::EdgarError;
use async_trait::async_trait;
use models::FilingInfo;

pub use client::EdgarClient;

/// Where filings come from: ticker lookup, filing index, document text.
///
/// Lookups return `Ok(None)` on a clean miss so callers can tell a miss
/// apart from a transport failure.
#[async_trait]
pub trait FilingSource: Send + Sync {
    async fn resolve_cik(&self, ticker: &str) -> Result<Option<String>, EdgarError>;

    async fn locate_filing(&self, cik: &str, form_type: &str) -> Result<Option<FilingInfo>, EdgarError>;

    fn document_url(&self, filing: &FilingInfo) -> String {
        filing.primary_doc_url()
    }

    /// Downloads the document and flattens it to plain text.
    async fn fetch_document_text(&self, url: &str) -> Result<String, EdgarError>;
}
