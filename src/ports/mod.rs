//! Port traits. API boundaries for the hexagon.
//!
//! - Inbound: Called by front ends (HTTP, terminal) into the application
//! - Outbound: Called by application into infrastructure (Completion Service)

pub mod inbound;
pub mod outbound;

pub use inbound::{ConsultationPort, InputPort, QuestionsReply, ReportReply};
pub use outbound::CompletionPort;
