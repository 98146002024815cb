// src/edgar/models.rs
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One record of https://www.sec.gov/files/company_tickers.json
/// The file is an object keyed by row number: {"0": {...}, "1": {...}}
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyTicker {
    pub cik_str: u64,
    pub ticker: String,
    #[serde(default)]
    pub title: String,
}

impl CompanyTicker {
    /// CIK formatted with leading zeros to 10 digits.
    pub fn padded_cik(&self) -> String {
        format!("{:010}", self.cik_str)
    }
}

/// The parts of the EDGAR company submission index we use.
/// Example: https://data.sec.gov/submissions/CIK0000320193.json
#[derive(Debug, Deserialize)]
pub struct CompanySubmission {
    #[serde(default)]
    pub cik: String,
    #[serde(default)]
    pub name: String,
    pub filings: Filings,
}

#[derive(Debug, Deserialize)]
pub struct Filings {
    pub recent: FilingsList,
}

/// Parallel arrays, index-aligned, most recent filing first.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingsList {
    #[serde(default)]
    pub accession_number: Vec<String>,
    #[serde(default)]
    pub filing_date: Vec<String>,
    #[serde(default)]
    pub form: Vec<String>,
    #[serde(default)]
    pub primary_document: Vec<String>,
}

/// The filing we located for a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingInfo {
    pub accession_number: String,
    pub filing_date: Option<NaiveDate>,
    pub form_type: String,
    pub company_name: String,
    pub cik: String,
    pub primary_doc: String,
}

impl FilingInfo {
    /// Constructs the URL to access the primary document of this filing.
    /// The archive path uses the CIK without zero padding.
    pub fn primary_doc_url(&self) -> String {
        self.primary_doc_url_with_base("https://www.sec.gov")
    }

    pub fn primary_doc_url_with_base(&self, archives_base: &str) -> String {
        let acc_no_dashes = self.accession_number.replace('-', "");
        let cik = self.cik.trim_start_matches('0');
        let cik = if cik.is_empty() { "0" } else { cik };
        format!(
            "{}/Archives/edgar/data/{}/{}/{}",
            archives_base.trim_end_matches('/'),
            cik,
            acc_no_dashes,
            self.primary_doc
        )
    }

    pub fn year(&self) -> Option<i32> {
        self.filing_date.map(|d| d.year())
    }
}
