//! Application use cases. Orchestrate the two consultation phases via ports.

mod completion_call;
pub mod consultation_service;
pub mod prompts;
pub mod question_generator;
pub mod report_synthesizer;

#[cfg(test)]
pub(crate) mod test_support;

pub use completion_call::DEFAULT_CALL_TIMEOUT;
pub use consultation_service::{ANSWER_INSTRUCTIONS, ConsultationService};
pub use question_generator::QuestionGenerator;
pub use report_synthesizer::{ReportSynthesizer, ReportValidation};
