//! Client for the hosted text-generation service that writes summaries.
//!
//! Requests go to the Gemini `generateContent` endpoint with a JSON response
//! schema of `{summary: string}`. The service is an external collaborator:
//! anything it returns is validated here before the rest of the crate sees it.

use crate::summary::SummaryRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("no summarization service is configured")]
    NotConfigured,
    #[error("summarization request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("summarization service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected summarization response: {0}")]
    InvalidResponse(String),
}

/// `summary: None` is a successful call that produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SummaryReply {
    #[serde(default)]
    pub summary: Option<String>,
}

impl SummaryReply {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
        }
    }

    fn cleaned(self) -> Self {
        Self {
            summary: self.summary.filter(|text| !text.trim().is_empty()),
        }
    }
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryReply, SummarizeError>;
}

/// Stand-in used when no API key is configured.
pub struct DisabledSummarizer;

#[async_trait]
impl Summarizer for DisabledSummarizer {
    async fn summarize(&self, _request: &SummaryRequest) -> Result<SummaryReply, SummarizeError> {
        Err(SummarizeError::NotConfigured)
    }
}

pub struct GeminiSummarizer {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiSummarizer {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryReply, SummarizeError> {
        let prompt = request.prompt();
        let body = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: serde_json::json!({
                    "type": "OBJECT",
                    "properties": { "summary": { "type": "STRING" } },
                    "required": ["summary"],
                }),
            },
        };

        debug!(scope = ?request.scope(), chars = prompt.len(), "sending summary request");
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SummarizeError::Status { status, body });
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| SummarizeError::InvalidResponse(e.to_string()))?;
        parse_reply(parsed)
    }
}

fn parse_reply(response: GenerateResponse) -> Result<SummaryReply, SummarizeError> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text));

    let Some(text) = text else {
        return Ok(SummaryReply::default());
    };

    let reply: SummaryReply = serde_json::from_str(text.trim())
        .map_err(|e| SummarizeError::InvalidResponse(format!("{e}: {text}")))?;
    Ok(reply.cleaned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: serde_json::Value) -> GenerateResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn summary_is_read_from_first_candidate() {
        let reply = parse_reply(response(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"summary\": \"Good day.\"}" }] } }]
        })))
        .unwrap();
        assert_eq!(reply, SummaryReply::new("Good day."));
    }

    #[test]
    fn missing_or_blank_summary_is_soft() {
        let empty = parse_reply(response(serde_json::json!({ "candidates": [] }))).unwrap();
        assert_eq!(empty.summary, None);

        let blank = parse_reply(response(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"summary\": \"  \"}" }] } }]
        })))
        .unwrap();
        assert_eq!(blank.summary, None);

        let absent = parse_reply(response(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "{}" }] } }]
        })))
        .unwrap();
        assert_eq!(absent.summary, None);
    }

    #[test]
    fn non_json_text_is_invalid() {
        let result = parse_reply(response(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "Sure! Here is a summary" }] } }]
        })));
        assert!(matches!(result, Err(SummarizeError::InvalidResponse(_))));
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiSummarizer::new("http://127.0.0.1:9/", "gemini-test", "key");
        assert_eq!(
            client.endpoint(),
            "http://127.0.0.1:9/v1beta/models/gemini-test:generateContent"
        );
    }

    #[tokio::test]
    async fn disabled_summarizer_always_fails() {
        let request = SummaryRequest::Daily {
            daily_log: String::new(),
        };
        assert!(matches!(
            DisabledSummarizer.summarize(&request).await,
            Err(SummarizeError::NotConfigured)
        ));
    }
}
