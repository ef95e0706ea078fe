//! Content generator seam used by draft regeneration.
//!
//! The generator itself is an external collaborator (see the API crate's
//! HTTP client). This module owns the contract around it: every call is
//! bounded by a timeout and can be cancelled, and any failure is reported as
//! a [`GeneratorError`] without touching the draft.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::content::DraftContent;
use crate::types::DbId;

/// Errors from a content generator call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneratorError {
    /// The call exceeded its deadline and was abandoned.
    #[error("generator timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// The call was cancelled before it completed.
    #[error("generator call was cancelled")]
    Cancelled,

    /// No generator is configured or it could not be reached.
    #[error("generator unavailable: {0}")]
    Unavailable(String),

    /// The generator answered with an error.
    #[error("generator failed: {0}")]
    Failed(String),

    /// The generator answered, but not with well-shaped content.
    #[error("generator returned invalid content: {0}")]
    InvalidOutput(String),
}

/// Payload handed to the generator: the draft being regenerated and the seed
/// content supplied by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub project_id: DbId,
    pub draft_id: DbId,
    pub seed: DraftContent,
}

/// Produces replacement draft content from a seed.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<DraftContent, GeneratorError>;
}

/// Generator used when none is configured; every call reports `Unavailable`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredGenerator;

#[async_trait]
impl ContentGenerator for UnconfiguredGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<DraftContent, GeneratorError> {
        Err(GeneratorError::Unavailable(
            "no content generator is configured".into(),
        ))
    }
}

/// Run one generator call under a deadline and a cancellation token.
///
/// Cancellation wins over a result that becomes ready at the same time.
pub async fn generate_bounded(
    generator: &dyn ContentGenerator,
    request: &GenerationRequest,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<DraftContent, GeneratorError> {
    let started = Instant::now();

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(GeneratorError::Cancelled),
        result = tokio::time::timeout(timeout, generator.generate(request)) => match result {
            Ok(inner) => inner,
            Err(_) => Err(GeneratorError::Timeout {
                elapsed_ms: started.elapsed().as_millis() as u64,
            }),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    struct Echo;

    #[async_trait]
    impl ContentGenerator for Echo {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<DraftContent, GeneratorError> {
            Ok(request.seed.clone())
        }
    }

    struct Stalled;

    #[async_trait]
    impl ContentGenerator for Stalled {
        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> Result<DraftContent, GeneratorError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(DraftContent::default())
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            project_id: 1,
            draft_id: 2,
            seed: DraftContent::from_value(&json!({"sections": [{"id": "s"}]})).unwrap(),
        }
    }

    #[tokio::test]
    async fn completes_within_deadline() {
        let out = generate_bounded(
            &Echo,
            &request(),
            Duration::from_secs(5),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(out, request().seed);
    }

    #[tokio::test]
    async fn times_out() {
        let err = generate_bounded(
            &Stalled,
            &request(),
            Duration::from_millis(50),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert_matches!(err, GeneratorError::Timeout { .. });
    }

    #[tokio::test]
    async fn cancelled_token_aborts_call() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = generate_bounded(&Stalled, &request(), Duration::from_secs(10), &cancel)
            .await
            .unwrap_err();
        assert_eq!(err, GeneratorError::Cancelled);
    }

    #[tokio::test]
    async fn unconfigured_generator_is_unavailable() {
        let err = UnconfiguredGenerator.generate(&request()).await.unwrap_err();
        assert_matches!(err, GeneratorError::Unavailable(_));
    }

    #[test]
    fn display_timeout() {
        let err = GeneratorError::Timeout { elapsed_ms: 5000 };
        assert_eq!(err.to_string(), "generator timed out after 5000ms");
    }
}
