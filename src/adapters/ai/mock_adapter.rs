//! Mock completion adapter for running without an API key.
//!
//! Recognises which phase a prompt belongs to and returns a canned completion in the shape the
//! real service is asked for.

use crate::domain::{CompletionConfig, CompletionError};
use crate::ports::CompletionPort;
use crate::usecases::prompts::{QUESTION_PROMPT_MARKER, REPORT_PROMPT_MARKER};
use std::time::Duration;
use tracing::info;

const MOCK_QUESTIONS: &str = "1. [MOCK] In which Indian state or union territory did this happen?\n\
     2. [MOCK] Who are the parties involved (individuals, a company, a government body)?\n\
     3. [MOCK] What are the key dates, from the first incident to today?\n\
     4. [MOCK] Is there any written agreement, notice or official document involved?";

const MOCK_REPORT: &str = "## Summary of Facts\n\
     [MOCK] This is a simulated report. In a real run it would restate the user's situation.\n\n\
     ## Applicable Law\n\
     [MOCK] Relevant Acts and sections would be cited here.\n\n\
     ## Analysis\n\
     [MOCK] The law would be applied to the facts here.\n\n\
     ## Recommendations\n\
     [MOCK] Configure a real API key to receive an actual preliminary opinion and next steps.\n\n\
     *Disclaimer: this report is for informational purposes only and is not legal advice.*";

/// Mock completion adapter.
///
/// Returns predetermined completions without making API calls.
/// Simulates network latency with configurable delay.
pub struct MockCompletionAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
}

impl MockCompletionAdapter {
    /// Create a new mock adapter with default delay (300ms).
    pub fn new() -> Self {
        Self { delay_ms: 300 }
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self { delay_ms }
    }
}

impl Default for MockCompletionAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CompletionPort for MockCompletionAdapter {
    async fn complete(
        &self,
        prompt: &str,
        config: &CompletionConfig,
    ) -> Result<String, CompletionError> {
        info!(
            model = %config.model_id(),
            prompt_len = prompt.len(),
            "[MOCK] Simulating completion"
        );

        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        if prompt.starts_with(QUESTION_PROMPT_MARKER) {
            Ok(MOCK_QUESTIONS.to_string())
        } else if prompt.starts_with(REPORT_PROMPT_MARKER) {
            Ok(MOCK_REPORT.to_string())
        } else {
            Ok(format!("[MOCK] Completion for a {}-character prompt.", prompt.len()))
        }
    }
}
