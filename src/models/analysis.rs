use serde::{Deserialize, Deserializer, Serialize};

use super::enums::{RiskLevel, Severity};

/// Disclaimer carried by the fallback result and substituted for a blank one.
pub const STANDARD_DISCLAIMER: &str = "This information is for awareness only. \
Please consult a licensed healthcare professional for an accurate diagnosis.";

/// Alert carried by the fallback result.
pub const SERVICE_FAILURE_ALERT: &str = "Failed to get analysis from AI service. \
Please check your connection and try again.";

/// Structured analysis returned for one submission.
///
/// `risk_level` and `disclaimer` are always present, including on the
/// fallback path. Every other section is optional; an empty list or `None`
/// means the model did not provide it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub symptom_severity: Vec<SymptomSeverity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub possible_conditions: Vec<PossibleCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_alert: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lifestyle_tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clarification_questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_tip: Option<String>,
    pub disclaimer: String,
}

impl AnalysisResult {
    /// Minimal result with only the required fields.
    pub fn new(risk_level: RiskLevel, disclaimer: impl Into<String>) -> Self {
        Self {
            risk_level,
            symptom_severity: Vec::new(),
            possible_conditions: Vec::new(),
            emergency_alert: None,
            lifestyle_tips: Vec::new(),
            clarification_questions: Vec::new(),
            health_tip: None,
            disclaimer: disclaimer.into(),
        }
    }

    /// Result returned when the analysis service call or its parsing fails.
    pub fn fallback() -> Self {
        Self {
            emergency_alert: Some(SERVICE_FAILURE_ALERT.to_string()),
            ..Self::new(RiskLevel::Medium, STANDARD_DISCLAIMER)
        }
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}

/// A condition the model considers possible.
///
/// Probabilities across conditions are independent estimates and are not
/// expected to sum to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossibleCondition {
    pub name: String,
    #[serde(deserialize_with = "deserialize_probability")]
    pub probability: u8,
    #[serde(default)]
    pub description: String,
}

/// The model's own severity judgment for one symptom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomSeverity {
    pub symptom: String,
    pub severity: Severity,
}

/// Round and clamp a model-supplied percentage into 0..=100.
pub fn clamp_probability(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

fn deserialize_probability<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(clamp_probability(value))
}
