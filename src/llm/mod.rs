//! Text generation integration
//!
//! The synthesizer only sees the [`SentenceGenerator`] trait. The concrete
//! client talks to the Anthropic Messages API with bounded retries.

pub mod client;
pub mod prompts;
pub mod retry;

use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    /// Network failure, timeout, rate limit, server error or unreadable body
    #[error("transient generator failure: {0}")]
    Transient(String),

    /// Request rejected in a way retrying cannot fix
    #[error("generator rejected the request: {0}")]
    Rejected(String),

    #[error("generator call timed out after {0}s")]
    Timeout(u64),

    #[error("generator failed after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: String },

    #[error("no text generator configured")]
    Unavailable,
}

impl GeneratorError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, GeneratorError::Transient(_) | GeneratorError::Timeout(_))
    }
}

/// One batch of skills to write sentences for, with tone-matching context
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    pub skills: &'a [String],
    pub job_text: &'a str,
    pub resume_text: &'a str,
}

/// Black-box text generator: skills in, raw output lines out.
///
/// Implementations own their retry policy; an `Err` means the call is
/// finished failing.
pub trait SentenceGenerator {
    fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> impl Future<Output = Result<Vec<String>, GeneratorError>> + Send;

    fn name(&self) -> String;
}

/// Placeholder generator type for synthesizers built without one
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGenerator;

impl SentenceGenerator for NoGenerator {
    async fn generate(&self, _request: &GenerationRequest<'_>) -> Result<Vec<String>, GeneratorError> {
        Err(GeneratorError::Unavailable)
    }

    fn name(&self) -> String {
        "none".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(GeneratorError::Transient("503".to_string()).is_retryable());
        assert!(GeneratorError::Timeout(30).is_retryable());
        assert!(!GeneratorError::Rejected("401".to_string()).is_retryable());
        assert!(!GeneratorError::Unavailable.is_retryable());
    }

    #[tokio::test]
    async fn test_no_generator_is_unavailable() {
        let skills = vec!["Loki".to_string()];
        let request = GenerationRequest {
            skills: &skills,
            job_text: "",
            resume_text: "",
        };
        assert_eq!(NoGenerator.generate(&request).await, Err(GeneratorError::Unavailable));
    }
}
