//! Analysis client: turns a symptom description into an `AnalysisResult`.
//!
//! `LlmClient` is the transport seam (Gemini in production, `MockLlmClient`
//! in tests). `SymptomAnalyzer` wraps a transport with the fixed system
//! instruction and response schema, and degrades every failure to
//! `AnalysisResult::fallback()`. Callers hold it as `Arc<dyn AnalysisService>`.

pub mod gemini;
pub mod parser;
pub mod prompt;

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use thiserror::Error;

use crate::models::AnalysisResult;

pub use gemini::{GeminiClient, MockLlmClient};
pub use parser::parse_analysis_response;
pub use prompt::{build_symptom_description, build_user_prompt, RESPONSE_SCHEMA, SYSTEM_INSTRUCTION};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Analysis service is unreachable at {0}")]
    Connection(String),

    #[error("Analysis service returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Analysis service returned no candidate text")]
    EmptyCandidate,

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("No credential configured for the analysis service")]
    MissingCredential,
}

/// Generative model transport (allows mocking).
pub trait LlmClient: Send + Sync {
    fn model_name(&self) -> &str;

    /// Send one prompt with a system instruction and a JSON response schema.
    /// Returns the raw response text.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        system: &'a str,
        schema: &'a serde_json::Value,
    ) -> BoxFuture<'a, Result<String, AnalysisError>>;
}

/// The analysis capability: never fails, always yields a complete result.
pub trait AnalysisService: Send + Sync {
    fn analyze<'a>(&'a self, symptoms: &'a str) -> BoxFuture<'a, AnalysisResult>;
}

/// Production analysis service over any `LlmClient`.
pub struct SymptomAnalyzer<C> {
    client: C,
}

impl<C: LlmClient> SymptomAnalyzer<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// One request/parse cycle, with failures surfaced.
    pub async fn try_analyze(&self, symptoms: &str) -> Result<AnalysisResult, AnalysisError> {
        let prompt = build_user_prompt(symptoms);
        let raw = self
            .client
            .generate(&prompt, SYSTEM_INSTRUCTION, &RESPONSE_SCHEMA)
            .await?;
        parse_analysis_response(&raw)
    }
}

impl<C: LlmClient> AnalysisService for SymptomAnalyzer<C> {
    fn analyze<'a>(&'a self, symptoms: &'a str) -> BoxFuture<'a, AnalysisResult> {
        Box::pin(async move {
            match self.try_analyze(symptoms).await {
                Ok(result) => {
                    tracing::info!(
                        model = self.client.model_name(),
                        risk_level = %result.risk_level,
                        conditions = result.possible_conditions.len(),
                        "Symptom analysis completed"
                    );
                    result
                }
                Err(e) => {
                    tracing::error!(
                        model = self.client.model_name(),
                        error = %e,
                        "Analysis service call failed, returning fallback result"
                    );
                    AnalysisResult::fallback()
                }
            }
        })
    }
}

/// Test double for the whole capability: returns a fixed result and
/// records every description it was asked to analyze.
pub struct StaticAnalysisService {
    result: AnalysisResult,
    calls: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl StaticAnalysisService {
    pub fn new(result: AnalysisResult) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl AnalysisService for StaticAnalysisService {
    fn analyze<'a>(&'a self, symptoms: &'a str) -> BoxFuture<'a, AnalysisResult> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(symptoms.to_string());
            }
            self.result.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskLevel, SERVICE_FAILURE_ALERT};

    #[tokio::test]
    async fn analyzer_returns_parsed_result() {
        let client = MockLlmClient::new(
            r#"{"riskLevel":"Critical","emergencyAlert":"Seek immediate medical attention!","disclaimer":"d"}"#,
        );
        let analyzer = SymptomAnalyzer::new(client);
        let result = analyzer.analyze("Severe chest pain").await;
        assert_eq!(result.risk_level, RiskLevel::Critical);
        assert_eq!(
            result.emergency_alert.as_deref(),
            Some("Seek immediate medical attention!")
        );
    }

    #[tokio::test]
    async fn analyzer_sends_prompt_instruction_and_schema() {
        let analyzer = SymptomAnalyzer::new(MockLlmClient::new(
            r#"{"riskLevel":"Low","disclaimer":"d"}"#,
        ));
        analyzer.analyze("Mild cough").await;

        let calls = analyzer.client().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, "Analyze the following symptoms: \"Mild cough\"");
        assert_eq!(calls[0].system, SYSTEM_INSTRUCTION);
        assert_eq!(calls[0].schema, *RESPONSE_SCHEMA);
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_fallback() {
        let analyzer = SymptomAnalyzer::new(MockLlmClient::failing());
        let result = analyzer.analyze("Mild cough").await;
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert!(!result.disclaimer.is_empty());
        assert_eq!(result.emergency_alert.as_deref(), Some(SERVICE_FAILURE_ALERT));
    }

    #[tokio::test]
    async fn malformed_response_degrades_to_fallback() {
        let analyzer = SymptomAnalyzer::new(MockLlmClient::new("not json at all"));
        let result = analyzer.analyze("Mild cough").await;
        assert!(result.is_fallback());
    }

    #[tokio::test]
    async fn try_analyze_surfaces_the_error() {
        let analyzer = SymptomAnalyzer::new(MockLlmClient::failing());
        let err = analyzer.try_analyze("Mild cough").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Connection(_)));
    }

    #[tokio::test]
    async fn each_call_reaches_the_transport() {
        let analyzer = SymptomAnalyzer::new(MockLlmClient::new(
            r#"{"riskLevel":"Low","disclaimer":"d"}"#,
        ));
        analyzer.analyze("Mild cough").await;
        analyzer.analyze("Mild cough").await;
        assert_eq!(analyzer.client().calls().len(), 2);
    }

    #[tokio::test]
    async fn static_service_records_requests() {
        let service = StaticAnalysisService::new(AnalysisResult::new(RiskLevel::Low, "d"));
        let result = service.analyze("Mild cough").await;
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(service.call_count(), 1);
        assert_eq!(service.requests(), vec!["Mild cough".to_string()]);
    }
}
