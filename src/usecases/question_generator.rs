//! Phase one: turn a raw query into clarifying questions.

use crate::domain::{CompletionConfig, ConsultationQuery, DomainError, QuestionSet};
use crate::ports::CompletionPort;
use crate::usecases::completion_call::{DEFAULT_CALL_TIMEOUT, complete_once};
use crate::usecases::prompts::{build_question_prompt, parse_questions};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const MIN_QUESTIONS: usize = 3;
pub const MAX_QUESTIONS: usize = 4;

pub struct QuestionGenerator {
    completion: Arc<dyn CompletionPort>,
    config: CompletionConfig,
    question_count: usize,
    call_timeout: Duration,
}

impl QuestionGenerator {
    pub fn new(completion: Arc<dyn CompletionPort>, config: CompletionConfig) -> Self {
        Self {
            completion,
            config,
            question_count: MAX_QUESTIONS,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Number of questions requested from the service, clamped to 3..=4.
    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = count.clamp(MIN_QUESTIONS, MAX_QUESTIONS);
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// One completion call; the result is either a non-empty `QuestionSet` or an error.
    ///
    /// # Errors
    /// - `MalformedCompletion` when no question line can be parsed
    /// - `CompletionService` when the call fails or times out
    pub async fn generate_questions(
        &self,
        query: &ConsultationQuery,
    ) -> Result<QuestionSet, DomainError> {
        let prompt = build_question_prompt(query, self.question_count);
        let raw = complete_once(
            self.completion.as_ref(),
            &prompt,
            &self.config,
            self.call_timeout,
        )
        .await?;

        let questions = parse_questions(&raw, self.question_count)?;
        info!(
            query_len = query.text().len(),
            questions = questions.len(),
            "clarifying questions generated"
        );
        QuestionSet::new(questions)
    }
}
