// src/summarize/mod.rs
pub mod dispatcher;
pub mod gemini;
pub mod prompts;

use crate::utils::error::OracleError;
use async_trait::async_trait;

pub use dispatcher::SummaryDispatcher;
pub use gemini::GeminiClient;
pub use prompts::PromptRegistry;

/// The generative-text service, seen as a black box.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// One text generation call; returns the model's reply verbatim.
    async fn generate_text(
        &self,
        model: &str,
        system_instruction: &str,
        prompt: &str,
    ) -> Result<String, OracleError>;

    /// Reads `text` aloud; returns raw 16-bit mono PCM samples (little endian).
    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, OracleError>;
}
