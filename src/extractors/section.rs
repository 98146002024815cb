// src/extractors/section.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;

// --- Canonical Section Names ---
pub const BUSINESS: &str = "Business";
pub const RISK_FACTORS: &str = "Risk Factors";
pub const MD_AND_A: &str = "Management's Discussion and Analysis";
pub const QUANTITATIVE_DISCLOSURES: &str = "Quantitative and Qualitative Disclosures";
pub const FINANCIAL_STATEMENTS: &str = "Financial Statements";

// --- Heading Patterns (Lazy Static) ---
// (start pattern, canonical name, end pattern), checked in this order.
// All patterns match case-insensitively against the flattened filing text.
static SECTION_PATTERNS: Lazy<Vec<SectionPattern>> = Lazy::new(|| {
    [
        (r"item\s+1[.\s]+business", BUSINESS, r"item\s+1a"),
        (r"item\s+1a[.\s]+risk\s+factors", RISK_FACTORS, r"item\s+1b"),
        (r"item\s+7[.\s]+management|item\s+7[.\s]+md&a", MD_AND_A, r"item\s+7a|item\s+8"),
        (r"item\s+7a[.\s]+quantitative", QUANTITATIVE_DISCLOSURES, r"item\s+8"),
        (r"item\s+8[.\s]+financial", FINANCIAL_STATEMENTS, r"item\s+9"),
    ]
    .into_iter()
    .map(|(start, name, end)| SectionPattern {
        name,
        start: Regex::new(&format!("(?i){}", start)).expect("Failed to compile section start pattern"),
        end: Regex::new(&format!("(?i){}", end)).expect("Failed to compile section end pattern"),
    })
    .collect()
});

// --- Data Structures ---

/// Start/end heading matchers for one narrative section.
#[derive(Debug, Clone)]
pub struct SectionPattern {
    pub name: &'static str,
    start: Regex,
    end: Regex,
}

impl SectionPattern {
    /// Byte range of this section within `text`, or `None` if the start
    /// heading never occurs.
    ///
    /// The *last* start match wins: earlier matches are normally the table of
    /// contents. The end is the first end match after that start, or the end
    /// of the text.
    pub fn locate(&self, text: &str) -> Option<(usize, usize)> {
        let start = self.start.find_iter(text).last()?.start();
        let end = self
            .end
            .find(&text[start..])
            .map(|m| start + m.start())
            .unwrap_or(text.len());
        Some((start, end))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSection {
    pub name: String, // canonical name, e.g. "Risk Factors"
    pub text: String, // trimmed span, may be empty
}

/// Sections found in one filing, keyed case-insensitively by name.
///
/// A section whose heading never appeared is absent; one whose heading
/// appeared right before its end marker is present with empty text.
#[derive(Debug, Clone, Default)]
pub struct ExtractedSections {
    sections: Vec<ExtractedSection>,
}

impl ExtractedSections {
    pub fn insert(&mut self, name: &str, text: impl Into<String>) {
        let text = text.into();
        match self.sections.iter_mut().find(|s| s.name.to_lowercase() == name.to_lowercase()) {
            Some(existing) => existing.text = text,
            None => self.sections.push(ExtractedSection {
                name: name.to_string(),
                text,
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name.to_lowercase() == name.to_lowercase())
            .map(|s| s.text.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtractedSection> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

// --- Main Extractor Structure ---
pub struct SectionExtractor {
    patterns: &'static [SectionPattern],
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionExtractor {
    pub fn new() -> Self {
        Self {
            patterns: SECTION_PATTERNS.as_slice(),
        }
    }

    /// Splits flattened filing text into its narrative sections.
    ///
    /// Each section is located independently of the others, so spans may
    /// overlap when one section's end heading is missing.
    pub fn extract(&self, text: &str) -> ExtractedSections {
        let mut sections = ExtractedSections::default();

        for pattern in self.patterns {
            match pattern.locate(text) {
                Some((start, end)) => {
                    let span = text[start..end].trim();
                    tracing::debug!(
                        "Located '{}' at bytes {}..{} ({} bytes after trim)",
                        pattern.name,
                        start,
                        end,
                        span.len()
                    );
                    sections.insert(pattern.name, span);
                }
                None => {
                    tracing::warn!("Section not found: {}", pattern.name);
                }
            }
        }

        tracing::info!("Found sections: {:?}", sections.names());
        sections
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(name: &str) -> &'static SectionPattern {
        SECTION_PATTERNS.iter().find(|p| p.name == name).unwrap()
    }

    const FILING: &str = "\
Table of Contents
Item 1. Business 4
Item 1A. Risk Factors 12
Item 7. Management's Discussion 30
PART I
Item 1.
Business
The Company designs and sells phones.
Item 1A.
Risk Factors
Supply chains may be disrupted.
Item 1B. Unresolved Staff Comments
None.
Item 7. Management's Discussion and Analysis
Revenue grew.
Item 7A. Quantitative and Qualitative Disclosures About Market Risk
Rates moved.
Item 8. Financial Statements and Supplementary Data
Balance sheet.
Item 9. Changes in and Disagreements with Accountants
None.";

    #[test]
    fn test_extract_uses_last_heading_and_first_following_end() {
        let sections = SectionExtractor::new().extract(FILING);

        assert_eq!(
            sections.get(BUSINESS),
            Some("Item 1.\nBusiness\nThe Company designs and sells phones.")
        );
        assert_eq!(
            sections.get(RISK_FACTORS),
            Some("Item 1A.\nRisk Factors\nSupply chains may be disrupted.")
        );
        assert_eq!(
            sections.get(MD_AND_A),
            Some("Item 7. Management's Discussion and Analysis\nRevenue grew.")
        );
        assert_eq!(
            sections.get(QUANTITATIVE_DISCLOSURES),
            Some("Item 7A. Quantitative and Qualitative Disclosures About Market Risk\nRates moved.")
        );
        assert_eq!(
            sections.get(FINANCIAL_STATEMENTS),
            Some("Item 8. Financial Statements and Supplementary Data\nBalance sheet.")
        );
        assert_eq!(
            sections.names(),
            vec![BUSINESS, RISK_FACTORS, MD_AND_A, QUANTITATIVE_DISCLOSURES, FINANCIAL_STATEMENTS]
        );
    }

    #[test]
    fn test_missing_start_heading_means_absent() {
        let text = "Item 1A. Risk Factors\nThings could go wrong.\nItem 1B. None";
        let sections = SectionExtractor::new().extract(text);

        assert!(!sections.contains(BUSINESS));
        assert!(!sections.contains(FINANCIAL_STATEMENTS));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections.get("risk factors"), Some("Item 1A. Risk Factors\nThings could go wrong."));
    }

    #[test]
    fn test_missing_end_heading_runs_to_end_of_text() {
        let text = "ITEM 8. FINANCIAL STATEMENTS\nAssets 100\nLiabilities 40\n";
        let (start, end) = pattern(FINANCIAL_STATEMENTS).locate(text).unwrap();
        assert_eq!(start, 0);
        assert_eq!(end, text.len());

        let sections = SectionExtractor::new().extract(text);
        assert_eq!(
            sections.get(FINANCIAL_STATEMENTS),
            Some("ITEM 8. FINANCIAL STATEMENTS\nAssets 100\nLiabilities 40")
        );
    }

    #[test]
    fn test_end_searched_only_after_selected_start() {
        // The "Item 9" before the last start heading must not end the section.
        let text = "Item 8. Financial x Item 9 toc\nItem 8. Financial Statements\nNotes\nItem 9. Changes";
        let sections = SectionExtractor::new().extract(text);
        assert_eq!(sections.get(FINANCIAL_STATEMENTS), Some("Item 8. Financial Statements\nNotes"));
    }

    #[test]
    fn test_adjacent_headings_and_empty_sections() {
        // "item 1a" is both the risk factors start and the business end.
        let text = "Item 1 Business Item 1A Risk Factors Item 1B";
        let sections = SectionExtractor::new().extract(text);
        assert_eq!(sections.get(BUSINESS), Some("Item 1 Business"));
        assert_eq!(sections.get(RISK_FACTORS), Some("Item 1A Risk Factors"));

        let mut manual = ExtractedSections::default();
        manual.insert(BUSINESS, "");
        assert!(manual.contains("business"));
        assert_eq!(manual.get("BUSINESS"), Some(""));
    }

    #[test]
    fn test_md_and_a_alternate_heading_and_overlap() {
        // No 7A heading: MD&A ends at Item 8, and Item 7A is simply absent.
        let text = "Item 7 MD&A\nResults.\nItem 8 Financial Statements\nStatements.";
        let sections = SectionExtractor::new().extract(text);
        assert_eq!(sections.get(MD_AND_A), Some("Item 7 MD&A\nResults."));
        assert!(!sections.contains(QUANTITATIVE_DISCLOSURES));
        assert_eq!(sections.get(FINANCIAL_STATEMENTS), Some("Item 8 Financial Statements\nStatements."));
    }

    #[test]
    fn test_sections_extracted_independently_may_overlap() {
        // Risk factors has no 1B heading, so it runs to the end and overlaps MD&A.
        let text = "Item 1A. Risk Factors\nRisky.\nItem 7. Management overview\nGood year.";
        let sections = SectionExtractor::new().extract(text);
        let risk = sections.get(RISK_FACTORS).unwrap();
        let mdna = sections.get(MD_AND_A).unwrap();
        assert!(risk.contains(mdna));
    }

    #[test]
    fn test_insert_replaces_case_insensitively() {
        let mut sections = ExtractedSections::default();
        sections.insert("Business", "old");
        sections.insert("BUSINESS", "new");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections.get("business"), Some("new"));
    }
}
