use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::message::SourceRef;

/// Content substituted when a successful reply carries no recognizable answer.
pub const NO_ANSWER_FALLBACK: &str = "No answer received.";

#[derive(Serialize)]
struct AskRequest<'a> {
    message: &'a str,
}

/// Body of a successful answer-service reply. Every field is optional on
/// the wire.
#[derive(Debug, Default, Deserialize)]
pub struct AskResponse {
    pub answer: Option<String>,
    pub response: Option<String>,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

impl AskResponse {
    /// Display content in fallback order: `answer`, then `response`, then a
    /// fixed placeholder.
    pub fn resolve_content(&self) -> String {
        self.answer
            .as_deref()
            .or(self.response.as_deref())
            .unwrap_or(NO_ANSWER_FALLBACK)
            .to_string()
    }
}

#[derive(Clone)]
pub struct AssistClient {
    client: Client,
    endpoint: String,
}

impl AssistClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one question to the answer service. Any non-success status is an
    /// error; the status and body text are preserved for the diagnostic log.
    pub async fn ask(&self, message: &str) -> Result<AskResponse> {
        let request = AskRequest { message };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("answer service returned {}: {}", status, body));
        }

        let answer: AskResponse = response.json().await?;
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::UNKNOWN_SOURCE;

    fn parse(body: &str) -> AskResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_answer_field_preferred() {
        let response = parse(r#"{"answer": "X", "response": "Y"}"#);
        assert_eq!(response.resolve_content(), "X");
    }

    #[test]
    fn test_response_field_is_the_fallback() {
        let response = parse(r#"{"response": "Y"}"#);
        assert_eq!(response.resolve_content(), "Y");
    }

    #[test]
    fn test_no_recognizable_field_yields_placeholder() {
        let response = parse("{}");
        assert_eq!(response.resolve_content(), NO_ANSWER_FALLBACK);
    }

    #[test]
    fn test_string_sources() {
        let response = parse(r#"{"answer": "X", "sources": ["a", "b"]}"#);
        let labels: Vec<_> = response.sources.iter().map(SourceRef::label).collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn test_record_sources() {
        let response = parse(r#"{"answer": "X", "sources": [{"source": "Doc1"}, {}]}"#);
        let labels: Vec<_> = response.sources.iter().map(SourceRef::label).collect();
        assert_eq!(labels, vec!["Doc1", UNKNOWN_SOURCE]);
    }

    #[test]
    fn test_missing_sources_default_to_empty() {
        let response = parse(r#"{"answer": "X"}"#);
        assert!(response.sources.is_empty());
    }
}
