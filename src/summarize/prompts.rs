// src/summarize/prompts.rs
use crate::extractors::section::{
    BUSINESS, FINANCIAL_STATEMENTS, MD_AND_A, QUANTITATIVE_DISCLOSURES, RISK_FACTORS,
};
use std::collections::HashMap;

pub const COMBINED: &str = "combined";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub const SYSTEM_PERSONA: &str = "You are Warren Buffett. \
Summarize financial documents clearly and concisely. \
Using tenets from the document 'The Warren Buffett Way' by Robert Hagstrom in your analysis.";

const GENERIC_TASK: &str = "Summarize the key points in plain English.";

const BUSINESS_TASK: &str = "Explain in plain English what this company does and how it makes money. \
Identify its main products, customers and markets, and judge whether the business is simple and \
understandable and whether it has a durable competitive advantage (a moat).";

const RISK_FACTORS_TASK: &str = "Summarize the risks that matter most to a long-term owner of this business. \
Separate company-specific risks from boilerplate, and say which ones could permanently impair \
the company's earning power.";

const MD_AND_A_TASK: &str = "Summarize how management describes the year's results, trends in revenue, margins \
and cash flow, and capital allocation. Judge whether management is candid and rational with \
shareholders' capital.";

const QUANTITATIVE_TASK: &str = "Summarize the company's exposure to interest rates, currencies and commodity \
prices in plain English, and say whether any of it could materially hurt owner earnings.";

const FINANCIAL_STATEMENTS_TASK: &str = "Summarize what the financial statements say about return on equity, \
profit margins, debt levels and owner earnings. Point out anything unusual in the numbers or notes.";

const COMBINED_TASK: &str = "Using the business description, risk factors and management's discussion together, \
give an overall investment summary: what the business is, how durable its advantages are, \
how well it is managed, and the main risks to its long-term value.";

/// Per-section prompt tasks and model choices, keyed by lower-cased section name.
#[derive(Debug, Clone)]
pub struct PromptRegistry {
    tasks: HashMap<String, &'static str>,
    models: HashMap<String, String>,
    default_model: String,
}

impl Default for PromptRegistry {
    fn default() -> Self {
        let tasks = [
            (BUSINESS, BUSINESS_TASK),
            (RISK_FACTORS, RISK_FACTORS_TASK),
            (MD_AND_A, MD_AND_A_TASK),
            (QUANTITATIVE_DISCLOSURES, QUANTITATIVE_TASK),
            (FINANCIAL_STATEMENTS, FINANCIAL_STATEMENTS_TASK),
            (COMBINED, COMBINED_TASK),
        ]
        .into_iter()
        .map(|(name, task)| (name.to_lowercase(), task))
        .collect::<HashMap<_, _>>();

        let models = tasks
            .keys()
            .map(|name| (name.clone(), DEFAULT_MODEL.to_string()))
            .collect();

        Self {
            tasks,
            models,
            default_model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl PromptRegistry {
    /// Task text for a section; the generic analyst task if the name is unknown.
    pub fn task_for(&self, section_name: &str) -> &'static str {
        self.tasks
            .get(&section_name.to_lowercase())
            .copied()
            .unwrap_or(GENERIC_TASK)
    }

    pub fn model_for(&self, section_name: &str) -> &str {
        self.models
            .get(&section_name.to_lowercase())
            .map(String::as_str)
            .unwrap_or(&self.default_model)
    }

    pub fn build_prompt(&self, section_name: &str, section_text: &str) -> String {
        format!(
            "You are analyzing a 10-K filing.\nSection: {}\nText:\n{}\n\nTask: {}",
            section_name,
            section_text,
            self.task_for(section_name)
        )
    }
}
