//! Completion Service adapters. Implement CompletionPort.
//!
//! Provides an OpenAI-compatible adapter and a mock adapter for running without credentials.

pub mod mock_adapter;
pub mod openai_adapter;

pub use mock_adapter::MockCompletionAdapter;
pub use openai_adapter::OpenAiAdapter;
