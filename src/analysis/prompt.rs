use std::sync::LazyLock;

use serde_json::{json, Value};

use crate::models::UserInputSymptom;

/// Fixed system instruction sent with every analysis request.
pub const SYSTEM_INSTRUCTION: &str = r#"You are an advanced Healthcare Symptom Checker AI. Your role is to provide a structured, informational analysis of user-provided symptoms that follows the provided JSON schema. You are NOT a medical professional.

RULES:
1. Emergency first: if symptoms such as "chest pain", "difficulty breathing", "severe bleeding" or "sudden confusion" are mentioned, set 'riskLevel' to "Critical" and 'emergencyAlert' to "Seek immediate medical attention! These symptoms could indicate a life-threatening condition."
2. Severity: each symptom comes with a user rating ('Mild', 'Moderate', 'Severe'). Treat it as the primary factor. 'symptomSeverity' must reflect the user's input.
3. Risk: set 'riskLevel' ('Low', 'Medium', 'High') from the combination and severity of the symptoms.
4. Probabilities: list 'possibleConditions' with an estimated 'probability'. The probabilities do not need to sum to 100.
5. Safe advice: 'lifestyleTips' must be safe, general advice (e.g. "Stay hydrated", "Get plenty of rest"). NEVER name specific medications.
6. Vague input: if the symptoms are unclear (e.g. "I feel sick"), fill 'clarificationQuestions' and keep other data minimal.
7. Disclaimer: always include the standard disclaimer.
8. Language: accept symptoms in any language, but write the JSON response in English.
"#;

/// Declared output schema constraining the model's response.
///
/// Only `riskLevel` and `disclaimer` are required.
pub static RESPONSE_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "riskLevel": {
                "type": "STRING",
                "enum": ["Low", "Medium", "High", "Critical"],
                "description": "Overall risk assessment based on symptoms."
            },
            "symptomSeverity": {
                "type": "ARRAY",
                "description": "Analysis of each symptom provided by the user.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "symptom": { "type": "STRING" },
                        "severity": { "type": "STRING", "enum": ["Mild", "Moderate", "Severe"] }
                    },
                    "required": ["symptom", "severity"]
                }
            },
            "possibleConditions": {
                "type": "ARRAY",
                "description": "List of potential health conditions with likelihood.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "probability": {
                            "type": "INTEGER",
                            "description": "Estimated likelihood percentage (e.g., 70 for 70%)."
                        },
                        "description": {
                            "type": "STRING",
                            "description": "A brief, easy-to-understand explanation."
                        }
                    },
                    "required": ["name", "probability", "description"]
                }
            },
            "emergencyAlert": {
                "type": "STRING",
                "description": "A clear, urgent message if critical symptoms are detected. Null otherwise."
            },
            "lifestyleTips": {
                "type": "ARRAY",
                "description": "Actionable, safe self-care and first-aid advice. No specific medications.",
                "items": { "type": "STRING" }
            },
            "clarificationQuestions": {
                "type": "ARRAY",
                "description": "Questions for vague input. Empty when the input is clear.",
                "items": { "type": "STRING" }
            },
            "healthTip": {
                "type": "STRING",
                "description": "A single relevant health tip or a suggested article."
            },
            "disclaimer": {
                "type": "STRING",
                "description": "The mandatory disclaimer that this is not a medical diagnosis."
            }
        },
        "required": ["riskLevel", "disclaimer"]
    })
});

/// Serialize symptoms as `"{severity} {name}"` joined by `", "`, in list order.
pub fn build_symptom_description(symptoms: &[UserInputSymptom]) -> String {
    symptoms
        .iter()
        .map(|s| format!("{} {}", s.severity, s.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// User turn wrapping a symptom description.
pub fn build_user_prompt(description: &str) -> String {
    format!("Analyze the following symptoms: \"{description}\"")
}
