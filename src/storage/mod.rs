// src/storage/mod.rs
pub mod audio;

use crate::edgar::models::FilingInfo;
use crate::extractors::ExtractedSection;
use crate::utils::error::StorageError;
use std::fs;
use std::path::{Path, PathBuf};

pub use audio::AudioStore;

/// Writes extracted sections to disk for offline inspection.
pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    // /base_dir/TICKER/ACCESSION/
    fn filing_dir(&self, ticker: &str, filing: &FilingInfo) -> Result<PathBuf, StorageError> {
        let target_dir = self
            .base_dir
            .join(ticker.to_uppercase())
            .join(&filing.accession_number);
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir).map_err(StorageError::IoError)?;
        }
        Ok(target_dir)
    }

    /// Saves the section text as `<slug>.txt`.
    pub fn save_section(
        &self,
        ticker: &str,
        filing: &FilingInfo,
        section: &ExtractedSection,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self
            .filing_dir(ticker, filing)?
            .join(format!("{}.txt", section_slug(&section.name)));

        fs::write(&file_path, section.text.as_bytes()).map_err(StorageError::IoError)?;
        tracing::info!("Saved section to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves metadata about the section in JSON format
    pub fn save_section_metadata(
        &self,
        ticker: &str,
        filing: &FilingInfo,
        section: &ExtractedSection,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self
            .filing_dir(ticker, filing)?
            .join(format!("{}_meta.json", section_slug(&section.name)));

        let metadata = serde_json::json!({
            "ticker": ticker.to_uppercase(),
            "company_name": filing.company_name,
            "cik": filing.cik,
            "accession_number": filing.accession_number,
            "form_type": filing.form_type,
            "filing_date": filing.filing_date.map(|d| d.to_string()),
            "filing_year": filing.year(),
            "section_name": section.name,
            "content_length": section.text.chars().count(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;
        tracing::info!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }
}

/// "Management's Discussion and Analysis" -> "managements_discussion_and_analysis"
pub fn section_slug(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '\'')
        .map(|word| word.replace('\'', ""))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
