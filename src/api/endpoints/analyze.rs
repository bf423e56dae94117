//! Stateless JSON analysis endpoint.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::analysis::build_symptom_description;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::checker::{analyze_guarded, CheckError};
use crate::collector::SymptomCollector;
use crate::models::{AnalysisResult, UserInputSymptom};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub symptoms: Vec<UserInputSymptom>,
}

/// `POST /api/analyze`: analyze a complete symptom list in one call.
///
/// Names go through the same collector rules as the form (trimmed,
/// non-blank). Service failures still answer 200 with the fallback result;
/// a service task that dies answers 500 with the unexpected-error message.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let mut collector = SymptomCollector::new();
    for symptom in &request.symptoms {
        collector.add(&symptom.name, symptom.severity)?;
    }
    if collector.is_empty() {
        return Err(CheckError::NoSymptoms.into());
    }

    let description = build_symptom_description(collector.symptoms());
    let result = analyze_guarded(ctx.analyzer.clone(), description)
        .await
        .map_err(ApiError::AnalysisFailed)?;
    if result.is_fallback() {
        tracing::warn!("Returning fallback analysis to API client");
    }

    Ok(Json(result))
}
