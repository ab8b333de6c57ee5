//! Core domain layer. No external I/O dependencies.
//!
//! Value objects and the error taxonomy live here. Dependencies flow inward.

pub mod completion;
pub mod entities;
pub mod errors;

pub use completion::CompletionConfig;
pub use entities::{AnswerBundle, ConsultationQuery, QuestionSet, Report, ReportSection};
pub use errors::{CompletionError, DomainError};
