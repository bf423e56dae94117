//! Result renderer: maps an `AnalysisResult` onto an ordered list of
//! visual sections. `html` turns the sections into markup.

pub mod html;

use crate::models::{AnalysisResult, PossibleCondition, RiskLevel, SymptomSeverity};

pub use html::{render_page, render_result};

/// One visual block of a rendered result, in display order.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<'a> {
    EmergencyAlert(&'a str),
    RiskBadge(RiskLevel),
    ClarificationQuestions(&'a [String]),
    /// Descending by probability; ties keep their original order.
    ConditionChart(Vec<&'a PossibleCondition>),
    /// Original order.
    ConditionDetails(&'a [PossibleCondition]),
    SymptomSeverity(&'a [SymptomSeverity]),
    LifestyleTips(&'a [String]),
    HealthTip(&'a str),
    Disclaimer(&'a str),
}

/// Lay out a result. Absent optional fields produce no section.
pub fn layout(result: &AnalysisResult) -> Vec<Section<'_>> {
    let mut sections = Vec::new();

    if let Some(alert) = result.emergency_alert.as_deref() {
        sections.push(Section::EmergencyAlert(alert));
    }

    sections.push(Section::RiskBadge(result.risk_level));

    if !result.clarification_questions.is_empty() {
        sections.push(Section::ClarificationQuestions(&result.clarification_questions));
    }

    if !result.possible_conditions.is_empty() {
        sections.push(Section::ConditionChart(sort_conditions(&result.possible_conditions)));
        sections.push(Section::ConditionDetails(&result.possible_conditions));
    }

    if !result.symptom_severity.is_empty() {
        sections.push(Section::SymptomSeverity(&result.symptom_severity));
    }

    if !result.lifestyle_tips.is_empty() {
        sections.push(Section::LifestyleTips(&result.lifestyle_tips));
    }

    if let Some(tip) = result.health_tip.as_deref() {
        sections.push(Section::HealthTip(tip));
    }

    sections.push(Section::Disclaimer(&result.disclaimer));
    sections
}

/// Stable sort by descending probability.
pub fn sort_conditions(conditions: &[PossibleCondition]) -> Vec<&PossibleCondition> {
    let mut sorted: Vec<&PossibleCondition> = conditions.iter().collect();
    sorted.sort_by(|a, b| b.probability.cmp(&a.probability));
    sorted
}
