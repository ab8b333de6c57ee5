//! Domain entities. Transient value objects for a single consultation phase.
//!
//! Nothing here is persisted; the caller carries the query across phases.

use crate::domain::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The user's original free-text legal question. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationQuery {
    text: String,
}

impl ConsultationQuery {
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidInput(
                "query cannot be empty or just whitespace".to_string(),
            ));
        }
        Ok(Self {
            text: trimmed.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for ConsultationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The user's consolidated answers to the clarifying questions, as one blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerBundle {
    text: String,
}

impl AnswerBundle {
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidInput(
                "answers cannot be empty or just whitespace".to_string(),
            ));
        }
        Ok(Self {
            text: trimmed.to_string(),
        })
    }

    /// Join per-question answers into one bundle, pairing each with its question.
    /// Blank answers are skipped.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, DomainError> {
        let text = pairs
            .into_iter()
            .filter(|(_, answer)| !answer.trim().is_empty())
            .enumerate()
            .map(|(i, (question, answer))| {
                format!("Q{}: {}\nA{}: {}", i + 1, question, i + 1, answer.trim())
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        Self::new(text)
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Ordered clarifying questions. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    questions: Vec<String>,
}

impl QuestionSet {
    pub fn new(questions: Vec<String>) -> Result<Self, DomainError> {
        if questions.is_empty() {
            return Err(DomainError::MalformedCompletion(
                "no clarifying questions could be parsed".to_string(),
            ));
        }
        Ok(Self { questions })
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn into_questions(self) -> Vec<String> {
        self.questions
    }
}

/// The four recognised report sections, in their required order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    SummaryOfFacts,
    ApplicableLaw,
    Analysis,
    Recommendations,
}

impl ReportSection {
    pub const ALL: [ReportSection; 4] = [
        ReportSection::SummaryOfFacts,
        ReportSection::ApplicableLaw,
        ReportSection::Analysis,
        ReportSection::Recommendations,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ReportSection::SummaryOfFacts => "Summary of Facts",
            ReportSection::ApplicableLaw => "Applicable Law",
            ReportSection::Analysis => "Analysis",
            ReportSection::Recommendations => "Recommendations",
        }
    }
}

impl fmt::Display for ReportSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Final report. Produced once per (query, answers) pair and handed back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub body: String,
    pub generated_at: DateTime<Utc>,
}
