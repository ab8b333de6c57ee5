//! Application configuration. Completion Service credentials, model options, HTTP binding.

use crate::adapters::ai::openai_adapter::DEFAULT_API_URL;
use crate::domain::completion::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL_ID, DEFAULT_TEMPERATURE};
use crate::domain::{CompletionConfig, DomainError};
use crate::usecases::ReportValidation;
use crate::usecases::question_generator::MAX_QUESTIONS;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// All keys are optional; `*_or_default` helpers fill the gaps.
/// Read from `LEGAL_CONSULT_*` environment variables and the file named by `LEGAL_CONSULT_CONFIG`.
#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Completion Service
    // ─────────────────────────────────────────────────────────────────────────
    /// API key. Read from LEGAL_CONSULT_AI_API_KEY, falling back to GOOGLE_API_KEY.
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// Chat completions URL. Defaults to Gemini's OpenAI-compatible endpoint.
    #[serde(default)]
    pub ai_api_url: Option<String>,

    /// Model identifier. Defaults to "gemini-2.5-flash".
    #[serde(default)]
    pub ai_model: Option<String>,

    /// Sampling temperature, 0.0..=2.0. Defaults to 0.0.
    #[serde(default)]
    pub ai_temperature: Option<f32>,

    /// Output length cap. Defaults to 2048.
    #[serde(default)]
    pub ai_max_tokens: Option<u32>,

    /// Upper bound on one completion call, in seconds. Defaults to 120.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    // ─────────────────────────────────────────────────────────────────────────
    // Consultation
    // ─────────────────────────────────────────────────────────────────────────
    /// Clarifying questions per query (3 or 4). Defaults to 4.
    #[serde(default)]
    pub question_count: Option<usize>,

    /// "strict" (default) or "lenient" report section validation.
    #[serde(default)]
    pub report_validation: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // HTTP API
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub host: Option<String>,

    /// Listen port. Falls back to PORT.
    #[serde(default)]
    pub port: Option<u16>,

    /// Deployment label reported by /health. Falls back to ENVIRONMENT.
    #[serde(default)]
    pub environment: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("LEGAL_CONSULT").try_parsing(true));
        if let Ok(path) = std::env::var("LEGAL_CONSULT_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // PORT is read directly (no prefix) so container platforms can inject it
        if cfg.port.is_none() {
            if let Ok(s) = std::env::var("PORT") {
                if let Ok(port) = s.parse::<u16>() {
                    cfg.port = Some(port);
                }
            }
        }
        Ok(cfg)
    }

    /// Returns the API key if configured. Reads from config or GOOGLE_API_KEY env.
    pub fn ai_api_key(&self) -> Option<String> {
        Self::key_with_fallback(self.ai_api_key.clone(), || {
            std::env::var("GOOGLE_API_KEY").ok()
        })
    }

    /// A blank configured key counts as unset, so the fallback still applies.
    fn key_with_fallback(
        configured: Option<String>,
        fallback: impl FnOnce() -> Option<String>,
    ) -> Option<String> {
        configured
            .filter(|k| !k.trim().is_empty())
            .or_else(fallback)
            .filter(|k| !k.trim().is_empty())
    }

    /// Returns true if a real Completion Service is configured (API key present).
    pub fn is_ai_configured(&self) -> bool {
        self.ai_api_key().is_some()
    }

    pub fn ai_api_url_or_default(&self) -> String {
        self.ai_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn ai_model_or_default(&self) -> String {
        self.ai_model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string())
    }

    /// Validated completion options built from the ai_* keys.
    pub fn completion_config(&self) -> Result<CompletionConfig, DomainError> {
        CompletionConfig::new(
            self.ai_model_or_default(),
            self.ai_temperature.unwrap_or(DEFAULT_TEMPERATURE),
            self.ai_max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn question_count_or_default(&self) -> usize {
        self.question_count.unwrap_or(MAX_QUESTIONS)
    }

    pub fn report_validation(&self) -> Result<ReportValidation, DomainError> {
        self.report_validation
            .as_deref()
            .map(|s| s.parse::<ReportValidation>())
            .unwrap_or(Ok(ReportValidation::Strict))
    }

    pub fn host_or_default(&self) -> String {
        self.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn environment_or_default(&self) -> String {
        self.environment
            .clone()
            .or_else(|| std::env::var("ENVIRONMENT").ok())
            .unwrap_or_else(|| "production".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.ai_api_url_or_default(), DEFAULT_API_URL);
        assert_eq!(cfg.completion_config().unwrap(), CompletionConfig::default());
        assert_eq!(cfg.request_timeout(), Duration::from_secs(120));
        assert_eq!(cfg.question_count_or_default(), 4);
        assert_eq!(cfg.report_validation().unwrap(), ReportValidation::Strict);
        assert_eq!(cfg.port_or_default(), DEFAULT_PORT);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let cfg = AppConfig {
            ai_temperature: Some(3.5),
            ..AppConfig::default()
        };
        assert!(matches!(
            cfg.completion_config(),
            Err(DomainError::InvalidInput(_))
        ));

        let cfg = AppConfig {
            report_validation: Some("sometimes".into()),
            ..AppConfig::default()
        };
        assert!(matches!(
            cfg.report_validation(),
            Err(DomainError::Config(_))
        ));
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        let cfg = AppConfig {
            ai_api_key: Some("  ".into()),
            ..AppConfig::default()
        };
        assert!(cfg.ai_api_key().is_none());
        assert!(!cfg.is_ai_configured());
    }

    #[test]
    fn test_blank_key_falls_back() {
        let key = AppConfig::key_with_fallback(Some(String::new()), || Some("g-key".into()));
        assert_eq!(key.as_deref(), Some("g-key"));

        let key = AppConfig::key_with_fallback(Some("primary".into()), || Some("g-key".into()));
        assert_eq!(key.as_deref(), Some("primary"));

        assert!(AppConfig::key_with_fallback(Some(" ".into()), || Some(String::new())).is_none());
    }

    #[test]
    fn test_deserialize_from_map() {
        let cfg: AppConfig = config::Config::builder()
            .set_override("ai_model", "gpt-4o-mini")
            .unwrap()
            .set_override("ai_temperature", 0.2)
            .unwrap()
            .set_override("question_count", 3)
            .unwrap()
            .set_override("report_validation", "lenient")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let completion = cfg.completion_config().unwrap();
        assert_eq!(completion.model_id(), "gpt-4o-mini");
        assert!((completion.temperature() - 0.2).abs() < f32::EPSILON);
        assert_eq!(cfg.question_count_or_default(), 3);
        assert_eq!(cfg.report_validation().unwrap(), ReportValidation::Lenient);
    }
}
