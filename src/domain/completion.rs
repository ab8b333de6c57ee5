//! Completion call parameters. Validated once, then passed with every call.

use crate::domain::DomainError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL_ID: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

const MAX_TEMPERATURE: f32 = 2.0;

/// Recognised options for a completion request.
///
/// Fields are private so an instance is always in range; use [`CompletionConfig::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    model_id: String,
    temperature: f32,
    max_tokens: u32,
}

impl CompletionConfig {
    /// # Errors
    /// `InvalidInput` if `model_id` is blank, `temperature` is outside `0.0..=2.0`
    /// (or not finite), or `max_tokens` is zero.
    pub fn new(
        model_id: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Self, DomainError> {
        let model_id = model_id.into().trim().to_string();
        if model_id.is_empty() {
            return Err(DomainError::InvalidInput("model_id must not be empty".into()));
        }
        if !temperature.is_finite() || !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
            return Err(DomainError::InvalidInput(format!(
                "temperature must be within 0.0..={}, got {}",
                MAX_TEMPERATURE, temperature
            )));
        }
        if max_tokens == 0 {
            return Err(DomainError::InvalidInput("max_tokens must be at least 1".into()));
        }
        Ok(Self {
            model_id,
            temperature,
            max_tokens,
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let cfg = CompletionConfig::new(" gpt-4o-mini ", 0.3, 1024).unwrap();
        assert_eq!(cfg.model_id(), "gpt-4o-mini");
        assert_eq!(cfg.temperature(), 0.3);
        assert_eq!(cfg.max_tokens(), 1024);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(CompletionConfig::new("", 0.0, 10).is_err());
        assert!(CompletionConfig::new("m", -0.1, 10).is_err());
        assert!(CompletionConfig::new("m", 2.5, 10).is_err());
        assert!(CompletionConfig::new("m", f32::NAN, 10).is_err());
        assert!(CompletionConfig::new("m", 1.0, 0).is_err());
        assert!(CompletionConfig::new("m", 2.0, 1).is_ok());
    }

    #[test]
    fn test_default_matches_constants() {
        let cfg = CompletionConfig::default();
        assert_eq!(cfg.model_id(), DEFAULT_MODEL_ID);
        assert_eq!(cfg.temperature(), DEFAULT_TEMPERATURE);
        assert_eq!(cfg.max_tokens(), DEFAULT_MAX_TOKENS);
    }
}
