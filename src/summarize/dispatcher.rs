// src/summarize/dispatcher.rs
use crate::extractors::section::{BUSINESS, MD_AND_A, RISK_FACTORS};
use crate::extractors::ExtractedSections;
use crate::summarize::prompts::{PromptRegistry, COMBINED, SYSTEM_PERSONA};
use crate::summarize::Oracle;
use crate::utils::error::OracleError;
use crate::utils::text::{preview, title_case};
use std::borrow::Cow;
use std::sync::Arc;

// Sections that make up the synthesized "combined" section, in order.
const COMBINED_PARTS: [&str; 3] = [BUSINESS, RISK_FACTORS, MD_AND_A];

/// Cuts `text` to at most `max_chars` characters.
///
/// When anything was cut, a note with the original length is appended.
/// Text already within the limit is returned untouched.
pub fn truncate_section(text: &str, max_chars: usize) -> Cow<'_, str> {
    let total = text.chars().count();
    if total <= max_chars {
        return Cow::Borrowed(text);
    }
    let cut = text
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    Cow::Owned(format!(
        "{}\n\n[Truncated: the original section was {} characters long]",
        &text[..cut],
        total
    ))
}

/// Business, Risk Factors and MD&A under title-cased headers, joined by a
/// blank line. Sections missing from the filing are left out; `None` if
/// all three are missing.
pub fn combined_text(sections: &ExtractedSections) -> Option<String> {
    let parts: Vec<String> = COMBINED_PARTS
        .iter()
        .filter_map(|name| {
            sections
                .get(name)
                .map(|text| format!("{}\n\n{}", title_case(&name.to_lowercase()), text))
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

/// Text for a requested section name, synthesizing "combined" on demand.
pub fn select_section<'a>(sections: &'a ExtractedSections, requested: &str) -> Option<Cow<'a, str>> {
    if requested.eq_ignore_ascii_case(COMBINED) {
        combined_text(sections).map(Cow::Owned)
    } else {
        sections.get(requested).map(Cow::Borrowed)
    }
}

/// Builds section prompts and forwards them to the oracle.
pub struct SummaryDispatcher {
    oracle: Arc<dyn Oracle>,
    registry: PromptRegistry,
    max_section_chars: usize,
}

impl SummaryDispatcher {
    pub fn new(oracle: Arc<dyn Oracle>, registry: PromptRegistry, max_section_chars: usize) -> Self {
        Self {
            oracle,
            registry,
            max_section_chars,
        }
    }

    pub fn oracle(&self) -> &Arc<dyn Oracle> {
        &self.oracle
    }

    /// One oracle call for one section. No retries.
    pub async fn summarize(&self, section_name: &str, section_text: &str) -> Result<String, OracleError> {
        let text = truncate_section(section_text, self.max_section_chars);
        if let Cow::Owned(_) = text {
            tracing::info!(
                "Truncated '{}' to {} characters for the prompt",
                section_name,
                self.max_section_chars
            );
        }

        let model = self.registry.model_for(section_name);
        let prompt = self.registry.build_prompt(section_name, &text);
        tracing::info!(
            "Requesting summary of '{}' from {} ({} prompt bytes)",
            section_name,
            model,
            prompt.len()
        );

        let summary = self.oracle.generate_text(model, SYSTEM_PERSONA, &prompt).await?;
        tracing::debug!("Summary preview: {}", preview(&summary, 120));
        Ok(summary)
    }
}
