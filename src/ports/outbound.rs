//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{CompletionConfig, CompletionError};

/// Completion Service. One prompt in, generated text out.
///
/// Implementations own connection pooling, transport timeouts and any retry policy;
/// callers make exactly one call per operation. Dropping the returned future must abandon
/// the in-flight request.
#[async_trait::async_trait]
pub trait CompletionPort: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        config: &CompletionConfig,
    ) -> Result<String, CompletionError>;
}
