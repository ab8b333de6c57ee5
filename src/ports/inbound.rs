//! Inbound ports. Front ends (HTTP, terminal) call into the application.

use crate::domain::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reply to the first phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionsReply {
    pub questions: Vec<String>,
    /// Instruction text shown to the user alongside the questions.
    pub message: String,
}

/// Reply to the second phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportReply {
    pub report: String,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

/// The two operations exposed to front ends.
///
/// Stateless: the second call must resubmit the original query with the answers.
#[async_trait::async_trait]
pub trait ConsultationPort: Send + Sync {
    async fn ask_questions(&self, query: &str) -> Result<QuestionsReply, DomainError>;

    async fn generate_report(&self, query: &str, answers: &str)
    -> Result<ReportReply, DomainError>;
}

/// A front end that drives consultations until it is done (terminal session ends,
/// HTTP server shuts down).
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    async fn run(&self) -> Result<(), DomainError>;
}
