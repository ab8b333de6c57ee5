//! Phase two: turn the query plus the user's answers into a structured report.

use crate::domain::{
    AnswerBundle, CompletionConfig, ConsultationQuery, DomainError, Report, ReportSection,
};
use crate::ports::CompletionPort;
use crate::usecases::completion_call::{DEFAULT_CALL_TIMEOUT, complete_once};
use crate::usecases::prompts::{build_report_prompt, missing_sections};
use chrono::Utc;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// What to do when the completion lacks one of the four section headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportValidation {
    /// Fail with `MalformedCompletion`.
    #[default]
    Strict,
    /// Return the text verbatim and log a warning.
    Lenient,
}

impl FromStr for ReportValidation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(DomainError::Config(format!(
                "report validation must be 'strict' or 'lenient', got '{}'",
                other
            ))),
        }
    }
}

pub struct ReportSynthesizer {
    completion: Arc<dyn CompletionPort>,
    config: CompletionConfig,
    validation: ReportValidation,
    call_timeout: Duration,
}

impl ReportSynthesizer {
    pub fn new(completion: Arc<dyn CompletionPort>, config: CompletionConfig) -> Self {
        Self {
            completion,
            config,
            validation: ReportValidation::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_validation(mut self, validation: ReportValidation) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// One completion call; `generated_at` is stamped when the call returns.
    ///
    /// # Errors
    /// - `MalformedCompletion` for a blank completion, or (strict mode) missing sections
    /// - `CompletionService` when the call fails or times out
    pub async fn generate_report(
        &self,
        query: &ConsultationQuery,
        answers: &AnswerBundle,
    ) -> Result<Report, DomainError> {
        let prompt = build_report_prompt(query, answers);
        let raw = complete_once(
            self.completion.as_ref(),
            &prompt,
            &self.config,
            self.call_timeout,
        )
        .await?;

        let body = raw.trim();
        if body.is_empty() {
            return Err(DomainError::MalformedCompletion(
                "report completion was empty".to_string(),
            ));
        }

        let missing = missing_sections(body);
        if !missing.is_empty() {
            let names = section_list(&missing);
            match self.validation {
                ReportValidation::Strict => {
                    return Err(DomainError::MalformedCompletion(format!(
                        "report is missing sections: {}",
                        names
                    )));
                }
                ReportValidation::Lenient => {
                    warn!(missing = %names, "report missing sections; returning verbatim");
                }
            }
        }

        let report = Report {
            body: body.to_string(),
            generated_at: Utc::now(),
        };
        info!(
            query_len = query.text().len(),
            answers_len = answers.text().len(),
            report_len = report.body.len(),
            "report generated"
        );
        Ok(report)
    }
}

fn section_list(sections: &[ReportSection]) -> String {
    sections
        .iter()
        .map(|s| s.title())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CompletionError;
    use crate::usecases::test_support::{ScriptedCompletion, Step};

    const FULL_REPORT: &str = "## Summary of Facts\nDeposit withheld.\n\n\
                               ## Applicable Law\nTransfer of Property Act, 1882.\n\n\
                               ## Analysis\nThe landlord must return it.\n\n\
                               ## Recommendations\nSend a legal notice.";

    fn synthesizer(double: &Arc<ScriptedCompletion>) -> ReportSynthesizer {
        ReportSynthesizer::new(
            Arc::clone(double) as Arc<dyn CompletionPort>,
            CompletionConfig::default(),
        )
    }

    fn inputs() -> (ConsultationQuery, AnswerBundle) {
        (
            ConsultationQuery::new("My landlord kept my deposit").unwrap(),
            AnswerBundle::new("Mumbai; lease ended in May").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_report_timestamp_within_call() {
        let double = Arc::new(ScriptedCompletion::replying(FULL_REPORT));
        let (query, answers) = inputs();

        let before = Utc::now();
        let report = synthesizer(&double)
            .generate_report(&query, &answers)
            .await
            .unwrap();
        let after = Utc::now();

        assert_eq!(report.body, FULL_REPORT);
        assert!(report.generated_at >= before && report.generated_at <= after);
        assert_eq!(double.calls(), 1);

        let prompt = double.last_prompt().unwrap();
        assert!(prompt.contains("My landlord kept my deposit"));
        assert!(prompt.contains("Mumbai; lease ended in May"));
    }

    #[tokio::test]
    async fn test_strict_rejects_missing_sections() {
        let double = Arc::new(ScriptedCompletion::replying("## Summary of Facts\nOnly this."));
        let (query, answers) = inputs();

        let err = synthesizer(&double)
            .generate_report(&query, &answers)
            .await
            .unwrap_err();
        match err {
            DomainError::MalformedCompletion(msg) => {
                assert!(msg.contains("Applicable Law, Analysis, Recommendations"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_lenient_passes_through() {
        let double = Arc::new(ScriptedCompletion::replying("  free-form answer \n"));
        let (query, answers) = inputs();

        let report = synthesizer(&double)
            .with_validation(ReportValidation::Lenient)
            .generate_report(&query, &answers)
            .await
            .unwrap();
        assert_eq!(report.body, "free-form answer");
    }

    #[tokio::test]
    async fn test_blank_completion_is_malformed_even_when_lenient() {
        let double = Arc::new(ScriptedCompletion::replying("   "));
        let (query, answers) = inputs();

        let err = synthesizer(&double)
            .with_validation(ReportValidation::Lenient)
            .generate_report(&query, &answers)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::MalformedCompletion(_)));
    }

    #[tokio::test]
    async fn test_timeout_propagates_unchanged() {
        let double = Arc::new(ScriptedCompletion::failing(CompletionError::Timeout));
        let (query, answers) = inputs();

        let err = synthesizer(&double)
            .generate_report(&query, &answers)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::CompletionService(CompletionError::Timeout)
        ));
    }

    #[tokio::test]
    async fn test_cancelled_service_call_yields_cancellation_only() {
        let double = Arc::new(ScriptedCompletion::failing(CompletionError::Cancelled));
        let (query, answers) = inputs();

        let err = synthesizer(&double)
            .generate_report(&query, &answers)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_aborting_caller_drops_in_flight_call() {
        let double = Arc::new(ScriptedCompletion::new([Step::Hang]));
        let synthesizer = Arc::new(synthesizer(&double));
        let (query, answers) = inputs();

        let task = {
            let synthesizer = Arc::clone(&synthesizer);
            tokio::spawn(async move { synthesizer.generate_report(&query, &answers).await })
        };
        while double.calls() == 0 {
            tokio::task::yield_now().await;
        }
        task.abort();

        let join = task.await;
        assert!(join.unwrap_err().is_cancelled());
        assert!(double.in_flight_dropped());
    }

    #[test]
    fn test_validation_from_str() {
        assert_eq!(
            "Strict".parse::<ReportValidation>().unwrap(),
            ReportValidation::Strict
        );
        assert_eq!(
            " lenient ".parse::<ReportValidation>().unwrap(),
            ReportValidation::Lenient
        );
        assert!("loose".parse::<ReportValidation>().is_err());
    }
}
