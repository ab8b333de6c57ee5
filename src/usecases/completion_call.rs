//! The single outbound call each phase makes, bounded by the core's own timeout.

use crate::domain::{CompletionConfig, CompletionError, DomainError};
use crate::ports::CompletionPort;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default upper bound on one completion call, on top of the client's own timeouts.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Call the Completion Service exactly once. No retry.
///
/// An elapsed `timeout` drops the in-flight call and fails with `CompletionError::Timeout`.
pub(crate) async fn complete_once(
    completion: &dyn CompletionPort,
    prompt: &str,
    config: &CompletionConfig,
    timeout: Duration,
) -> Result<String, DomainError> {
    let started = Instant::now();
    let result = tokio::time::timeout(timeout, completion.complete(prompt, config)).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(text)) => {
            debug!(
                model = %config.model_id(),
                elapsed_ms,
                completion_len = text.len(),
                "completion received"
            );
            Ok(text)
        }
        Ok(Err(e)) => {
            warn!(model = %config.model_id(), elapsed_ms, error = %e, "completion failed");
            Err(e.into())
        }
        Err(_) => {
            warn!(
                model = %config.model_id(),
                timeout_ms = timeout.as_millis() as u64,
                "completion exceeded core timeout"
            );
            Err(CompletionError::Timeout.into())
        }
    }
}
