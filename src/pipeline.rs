// src/pipeline.rs
use crate::edgar::models::FilingInfo;
use crate::edgar::FilingSource;
use crate::extractors::{ExtractedSections, SectionExtractor};
use crate::storage::AudioStore;
use crate::summarize::dispatcher::select_section;
use crate::summarize::SummaryDispatcher;
use crate::utils::error::PipelineError;
use serde::Serialize;
use std::sync::Arc;

pub const TARGET_FORM: &str = "10-K";

/// What one analysis request returns to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryResult {
    pub ticker: String,
    pub section: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,
}

/// Resolver -> Locator -> Fetcher -> Extractor.
pub struct FilingReader {
    source: Arc<dyn FilingSource>,
    extractor: SectionExtractor,
}

impl FilingReader {
    pub fn new(source: Arc<dyn FilingSource>) -> Self {
        Self {
            source,
            extractor: SectionExtractor::new(),
        }
    }

    /// Ticker to CIK. A lookup miss and a failed lookup both come back as
    /// `TickerNotFound`; the log line says which one it was.
    pub async fn resolve_cik(&self, ticker: &str) -> Result<String, PipelineError> {
        match self.source.resolve_cik(ticker).await {
            Ok(Some(cik)) => {
                tracing::info!("Found CIK {} for {}", cik, ticker);
                Ok(cik)
            }
            Ok(None) => {
                tracing::warn!("CIK not found for ticker: {}", ticker);
                Err(PipelineError::TickerNotFound)
            }
            Err(e) => {
                tracing::error!("Error getting CIK for {}: {}", ticker, e);
                Err(PipelineError::TickerNotFound)
            }
        }
    }

    /// Most recent filing of `form_type`; misses and failures collapse as above.
    pub async fn locate_filing(&self, cik: &str, form_type: &str) -> Result<FilingInfo, PipelineError> {
        match self.source.locate_filing(cik, form_type).await {
            Ok(Some(filing)) => {
                tracing::info!(
                    "Found {} {} filed {:?} for CIK {}",
                    form_type,
                    filing.accession_number,
                    filing.filing_date,
                    cik
                );
                Ok(filing)
            }
            Ok(None) => {
                tracing::warn!("No {} found for CIK: {}", form_type, cik);
                Err(PipelineError::FilingNotFound)
            }
            Err(e) => {
                tracing::error!("Error getting {} URL for CIK {}: {}", form_type, cik, e);
                Err(PipelineError::FilingNotFound)
            }
        }
    }

    pub async fn fetch_text(&self, filing: &FilingInfo) -> Result<String, PipelineError> {
        let url = self.source.document_url(filing);
        let text = self.source.fetch_document_text(&url).await.map_err(|e| {
            tracing::error!("Error fetching {}: {}", url, e);
            PipelineError::Upstream(e.to_string())
        })?;

        if text.trim().is_empty() {
            tracing::error!("Filing at {} has no text content", url);
            return Err(PipelineError::Upstream(format!("empty document at {}", url)));
        }
        tracing::info!("Fetched {} characters of filing text", text.len());
        Ok(text)
    }

    /// Runs every stage up to extraction for the latest `form_type` filing.
    pub async fn read_sections(
        &self,
        ticker: &str,
        form_type: &str,
    ) -> Result<(FilingInfo, ExtractedSections), PipelineError> {
        let cik = self.resolve_cik(ticker).await?;
        let filing = self.locate_filing(&cik, form_type).await?;
        let text = self.fetch_text(&filing).await?;
        let sections = self.extractor.extract(&text);
        Ok((filing, sections))
    }
}

/// The full per-request pipeline, ending in a generated summary.
pub struct AnalysisPipeline {
    reader: FilingReader,
    dispatcher: SummaryDispatcher,
    audio: Option<AudioStore>,
}

impl AnalysisPipeline {
    pub fn new(reader: FilingReader, dispatcher: SummaryDispatcher) -> Self {
        Self {
            reader,
            dispatcher,
            audio: None,
        }
    }

    /// Also narrate each summary into a WAV file under `store`.
    pub fn with_audio(mut self, store: AudioStore) -> Self {
        self.audio = Some(store);
        self
    }

    pub fn audio_store(&self) -> Option<&AudioStore> {
        self.audio.as_ref()
    }

    pub async fn analyze(&self, ticker: &str, section: &str) -> Result<SummaryResult, PipelineError> {
        tracing::info!("Analyzing {} for {} - {}", TARGET_FORM, ticker, section);

        let (_filing, sections) = self.reader.read_sections(ticker, TARGET_FORM).await?;

        let section_text = select_section(&sections, section).ok_or_else(|| {
            tracing::warn!("Section '{}' not in {:?}", section, sections.names());
            PipelineError::SectionNotFound(section.to_string())
        })?;

        let summary = self
            .dispatcher
            .summarize(section, &section_text)
            .await
            .map_err(|e| {
                tracing::error!("Summary generation failed for {} - {}: {}", ticker, section, e);
                PipelineError::Generation(e.to_string())
            })?;

        let audio_file = match &self.audio {
            Some(store) => self.narrate(store, ticker, section, &summary).await,
            None => None,
        };

        Ok(SummaryResult {
            ticker: ticker.to_string(),
            section: section.to_string(),
            summary,
            audio_file,
        })
    }

    // Speech is best effort: a failure here never fails the request.
    async fn narrate(&self, store: &AudioStore, ticker: &str, section: &str, summary: &str) -> Option<String> {
        tracing::info!("Generating TTS audio...");
        let pcm = match self.dispatcher.oracle().synthesize_speech(summary).await {
            Ok(pcm) => pcm,
            Err(e) => {
                tracing::error!("TTS generation failed: {}", e);
                return None;
            }
        };

        let store = store.clone();
        let (ticker, section) = (ticker.to_string(), section.to_string());
        match tokio::task::spawn_blocking(move || store.save_wav(&ticker, &section, &pcm)).await {
            Ok(Ok(filename)) => Some(filename),
            Ok(Err(e)) => {
                tracing::error!("Failed to write audio file: {}", e);
                None
            }
            Err(e) => {
                tracing::error!("Audio writer task failed: {}", e);
                None
            }
        }
    }
}
