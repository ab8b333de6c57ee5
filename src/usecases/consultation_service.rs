//! Consultation service. Implements the inbound `ConsultationPort` over plain strings.
//!
//! Validates raw input into domain values, then delegates to the Question Generator and the
//! Report Synthesizer. Holds no per-consultation state: the caller resubmits the original query
//! with the answers.

use crate::domain::{AnswerBundle, ConsultationQuery, DomainError};
use crate::ports::{ConsultationPort, QuestionsReply, ReportReply};
use crate::usecases::{QuestionGenerator, ReportSynthesizer};
use tracing::{info, instrument};

/// Instruction returned with every question set.
pub const ANSWER_INSTRUCTIONS: &str = "Please answer the questions above to the best of your \
    ability. I will generate a report once I have your answers.";

pub struct ConsultationService {
    questions: QuestionGenerator,
    reports: ReportSynthesizer,
}

impl ConsultationService {
    pub fn new(questions: QuestionGenerator, reports: ReportSynthesizer) -> Self {
        Self { questions, reports }
    }
}

#[async_trait::async_trait]
impl ConsultationPort for ConsultationService {
    #[instrument(skip_all, fields(query_len = query.len()))]
    async fn ask_questions(&self, query: &str) -> Result<QuestionsReply, DomainError> {
        let query = ConsultationQuery::new(query)?;
        info!("phase 1: generating clarifying questions");

        let set = self.questions.generate_questions(&query).await?;
        Ok(QuestionsReply {
            questions: set.into_questions(),
            message: ANSWER_INSTRUCTIONS.to_string(),
        })
    }

    #[instrument(skip_all, fields(query_len = query.len(), answers_len = answers.len()))]
    async fn generate_report(
        &self,
        query: &str,
        answers: &str,
    ) -> Result<ReportReply, DomainError> {
        let query = ConsultationQuery::new(query)?;
        let answers = AnswerBundle::new(answers)?;
        info!("phase 2: synthesizing report");

        let report = self.reports.generate_report(&query, &answers).await?;
        Ok(ReportReply {
            report: report.body,
            generated_at: report.generated_at,
        })
    }
}
