// src/config.rs
use crate::utils::AppError;
use std::env;

/// Default identifying header for EDGAR; the SEC rejects anonymous clients.
pub const DEFAULT_SEC_USER_AGENT: &str = "TenK Analyst admin@tenk-analyst.example";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MAX_SECTION_CHARS: usize = 100_000;
/// Per-call limit for model requests, in line with the EDGAR timeouts.
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 30;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub sec_user_agent: String,
    pub gemini_base_url: String,
    pub max_section_chars: usize,
    /// `GEMINI_TIMEOUT_SECS`. Speech synthesis of a long summary can need more than the default.
    pub oracle_timeout_secs: u64,
}

impl Config {
    /// Loads configuration from the environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let google_api_key = lookup("GOOGLE_API_KEY").filter(|k| !k.trim().is_empty());

        let max_section_chars = positive_setting(&lookup, "MAX_SECTION_CHARS", DEFAULT_MAX_SECTION_CHARS as u64)? as usize;
        let oracle_timeout_secs = positive_setting(&lookup, "GEMINI_TIMEOUT_SECS", DEFAULT_ORACLE_TIMEOUT_SECS)?;

        Ok(Self {
            google_api_key,
            sec_user_agent: lookup("SEC_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_SEC_USER_AGENT.to_string()),
            gemini_base_url: lookup("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            max_section_chars,
            oracle_timeout_secs,
        })
    }

    /// The oracle credential. Anything that calls the model needs it.
    pub fn api_key(&self) -> Result<&str, AppError> {
        self.google_api_key.as_deref().ok_or_else(|| {
            AppError::Config("GOOGLE_API_KEY environment variable is required".to_string())
        })
    }
}

fn positive_setting<F>(lookup: &F, key: &str, default: u64) -> Result<u64, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(AppError::Config(format!("{} must be a positive integer, got '{}'", key, raw))),
    }
}
