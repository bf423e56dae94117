use serde::Deserialize;

use super::AnalysisError;
use crate::models::{AnalysisResult, PossibleCondition, RiskLevel, SymptomSeverity, STANDARD_DISCLAIMER};

/// Parse the model's response text into an `AnalysisResult`.
///
/// Accepts a bare JSON object or one wrapped in Markdown fences. Required
/// fields must be present; malformed items inside optional lists are skipped.
pub fn parse_analysis_response(response: &str) -> Result<AnalysisResult, AnalysisError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::JsonParsing("empty response".into()));
    }

    let json_str = extract_json_object(trimmed).unwrap_or(trimmed);
    let raw: RawAnalysis =
        serde_json::from_str(json_str).map_err(|e| AnalysisError::JsonParsing(e.to_string()))?;

    Ok(raw.into_result())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    risk_level: RiskLevel,
    disclaimer: String,
    symptom_severity: Option<Vec<serde_json::Value>>,
    possible_conditions: Option<Vec<serde_json::Value>>,
    emergency_alert: Option<String>,
    lifestyle_tips: Option<Vec<serde_json::Value>>,
    clarification_questions: Option<Vec<serde_json::Value>>,
    health_tip: Option<String>,
}

impl RawAnalysis {
    fn into_result(self) -> AnalysisResult {
        let disclaimer = if self.disclaimer.trim().is_empty() {
            STANDARD_DISCLAIMER.to_string()
        } else {
            self.disclaimer
        };

        let possible_conditions: Vec<PossibleCondition> =
            parse_array_lenient(self.possible_conditions.as_deref());
        let symptom_severity: Vec<SymptomSeverity> =
            parse_array_lenient(self.symptom_severity.as_deref());

        AnalysisResult {
            risk_level: self.risk_level,
            symptom_severity: symptom_severity
                .into_iter()
                .filter(|s| !s.symptom.trim().is_empty())
                .collect(),
            possible_conditions: possible_conditions
                .into_iter()
                .filter(|c| !c.name.trim().is_empty())
                .collect(),
            emergency_alert: non_blank(self.emergency_alert),
            lifestyle_tips: non_blank_strings(parse_array_lenient(self.lifestyle_tips.as_deref())),
            clarification_questions: non_blank_strings(parse_array_lenient(
                self.clarification_questions.as_deref(),
            )),
            health_tip: non_blank(self.health_tip),
            disclaimer,
        }
    }
}

/// Parse an array leniently: skip items that fail to deserialize.
fn parse_array_lenient<T: for<'de> Deserialize<'de>>(
    items: Option<&[serde_json::Value]>,
) -> Vec<T> {
    match items {
        None => vec![],
        Some(arr) => arr
            .iter()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_blank_strings(values: Vec<String>) -> Vec<String> {
    values.into_iter().filter(|v| !v.trim().is_empty()).collect()
}

/// Slice from the first `{` to the last `}`, dropping fences or chatter.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}
