//! HTTP client for the external content generator.
//!
//! Sends the regeneration request as JSON to a single endpoint and reads the
//! replacement content back. Deadlines and cancellation are applied by the
//! caller through [`wikidraft_core::generator::generate_bounded`].

use async_trait::async_trait;
use serde_json::Value;
use wikidraft_core::content::DraftContent;
use wikidraft_core::generator::{ContentGenerator, GenerationRequest, GeneratorError};

/// Content generator reached over HTTP.
pub struct HttpContentGenerator {
    client: reqwest::Client,
    url: String,
}

impl HttpContentGenerator {
    /// * `url` - Full endpoint URL, e.g. `http://generator:8080/generate`.
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl ContentGenerator for HttpContentGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<DraftContent, GeneratorError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| GeneratorError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeneratorError::Failed(format!("status {status}: {body}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GeneratorError::InvalidOutput(e.to_string()))?;

        parse_content(&body)
    }
}

/// Accept either bare content or a `{ "data": content }` envelope.
fn parse_content(body: &Value) -> Result<DraftContent, GeneratorError> {
    let content = match body.get("data") {
        Some(inner) if body.as_object().is_some_and(|o| o.len() == 1) => inner,
        _ => body,
    };
    DraftContent::from_value(content).map_err(|e| GeneratorError::InvalidOutput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_bare_content() {
        let content = parse_content(&json!({"sections": [{"id": "a"}]})).unwrap();
        assert_eq!(content.sections.len(), 1);
    }

    #[test]
    fn unwraps_data_envelope() {
        let content = parse_content(&json!({"data": {"counters": {"n": 2}}})).unwrap();
        assert_eq!(content.counters["n"], json!(2));
    }

    #[test]
    fn rejects_malformed_content() {
        let err = parse_content(&json!({"sections": "nope"})).unwrap_err();
        assert_matches!(err, GeneratorError::InvalidOutput(_));
    }

    #[test]
    fn rejects_non_object() {
        let err = parse_content(&json!([1, 2])).unwrap_err();
        assert_matches!(err, GeneratorError::InvalidOutput(_));
    }
}
