use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AnalysisError, BoxFuture, LlmClient};
use crate::config::{Settings, GENERATION_TEMPERATURE};

/// Connection establishment limit. Requests themselves are not time-limited.
const CONNECT_TIMEOUT_SECS: u64 = 10;

const JSON_MIME_TYPE: &str = "application/json";

/// Gemini `generateContent` client.
pub struct GeminiClient {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(
        endpoint: &str,
        model: &str,
        api_key: Option<String>,
    ) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AnalysisError::HttpClient(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            client,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AnalysisError> {
        Self::new(&settings.endpoint, &settings.model, settings.api_key.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

/// Request body for `models/{model}:generateContent`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    temperature: f32,
    response_mime_type: &'a str,
    response_schema: &'a serde_json::Value,
}

/// Response body from `generateContent`
#[derive(Deserialize)]
struct GenerateContentResponse {
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
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, all text parts concatenated.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl LlmClient for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        system: &'a str,
        schema: &'a serde_json::Value,
    ) -> BoxFuture<'a, Result<String, AnalysisError>> {
        Box::pin(async move {
            let api_key = self
                .api_key
                .as_deref()
                .ok_or(AnalysisError::MissingCredential)?;

            let body = GenerateContentRequest {
                system_instruction: Content {
                    role: None,
                    parts: vec![Part { text: system }],
                },
                contents: vec![Content {
                    role: Some("user"),
                    parts: vec![Part { text: prompt }],
                }],
                generation_config: GenerationConfig {
                    temperature: GENERATION_TEMPERATURE,
                    response_mime_type: JSON_MIME_TYPE,
                    response_schema: schema,
                },
            };

            let response = self
                .client
                .post(self.generate_url())
                .header("x-goog-api-key", api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    if e.is_connect() {
                        AnalysisError::Connection(self.endpoint.clone())
                    } else {
                        AnalysisError::HttpClient(e.to_string())
                    }
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(AnalysisError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let parsed: GenerateContentResponse = response
                .json()
                .await
                .map_err(|e| AnalysisError::JsonParsing(e.to_string()))?;

            parsed.into_text().ok_or(AnalysisError::EmptyCandidate)
        })
    }
}

/// One request captured by `MockLlmClient`.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub prompt: String,
    pub system: String,
    pub schema: serde_json::Value,
}

/// Mock LLM client for testing: returns a configurable response.
pub struct MockLlmClient {
    response: Option<String>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A client whose every call fails as if the service were unreachable.
    pub fn failing() -> Self {
        Self {
            response: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl LlmClient for MockLlmClient {
    fn model_name(&self) -> &str {
        "mock"
    }

    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        system: &'a str,
        schema: &'a serde_json::Value,
    ) -> BoxFuture<'a, Result<String, AnalysisError>> {
        Box::pin(async move {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(MockCall {
                    prompt: prompt.to_string(),
                    system: system.to_string(),
                    schema: schema.clone(),
                });
            }
            self.response
                .clone()
                .ok_or_else(|| AnalysisError::Connection("mock".into()))
        })
    }
}
