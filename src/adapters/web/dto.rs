//! Request bodies and their boundary validation.

use crate::domain::DomainError;
use serde::Deserialize;

pub const MIN_TEXT_CHARS: usize = 10;
pub const MAX_QUERY_CHARS: usize = 5000;
pub const MAX_ANSWERS_CHARS: usize = 10000;

#[derive(Debug, Deserialize)]
pub struct LegalQuery {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct UserAnswers {
    pub initial_query: String,
    pub answers: String,
}

impl LegalQuery {
    /// Trimmed query text within the accepted length range.
    pub fn validate(&self) -> Result<&str, DomainError> {
        bounded("query", &self.query, MAX_QUERY_CHARS)
    }
}

impl UserAnswers {
    pub fn validate(&self) -> Result<(&str, &str), DomainError> {
        let query = bounded("initial_query", &self.initial_query, MAX_QUERY_CHARS)?;
        let answers = bounded("answers", &self.answers, MAX_ANSWERS_CHARS)?;
        Ok((query, answers))
    }
}

fn bounded<'a>(field: &str, value: &'a str, max: usize) -> Result<&'a str, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidInput(format!(
            "{} cannot be empty or just whitespace",
            field
        )));
    }
    let chars = trimmed.chars().count();
    if !(MIN_TEXT_CHARS..=max).contains(&chars) {
        return Err(DomainError::InvalidInput(format!(
            "{} must be between {} and {} characters, got {}",
            field, MIN_TEXT_CHARS, max, chars
        )));
    }
    Ok(trimmed)
}
