//! Symptom collector: the ordered list of symptoms entered on one form.

use crate::models::{Severity, UserInputSymptom};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectorError {
    #[error("Symptom name is required")]
    BlankName,
    #[error("Symptoms cannot be changed while an analysis is running")]
    Busy,
}

/// Ordered, session-local list of user-entered symptoms.
///
/// Duplicates are allowed. The severity selector starts at `Mild` and
/// returns to `Mild` after every successful add.
#[derive(Debug, Clone, Default)]
pub struct SymptomCollector {
    symptoms: Vec<UserInputSymptom>,
    current_severity: Severity,
}

impl SymptomCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symptoms(&self) -> &[UserInputSymptom] {
        &self.symptoms
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    /// Severity preselected for the next entry.
    pub fn current_severity(&self) -> Severity {
        self.current_severity
    }

    pub fn select_severity(&mut self, severity: Severity) {
        self.current_severity = severity;
    }

    /// Append a symptom with its name trimmed.
    pub fn add(&mut self, name: &str, severity: Severity) -> Result<&UserInputSymptom, CollectorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CollectorError::BlankName);
        }

        self.symptoms.push(UserInputSymptom::new(name, severity));
        self.current_severity = Severity::Mild;
        Ok(&self.symptoms[self.symptoms.len() - 1])
    }

    /// Remove by position. Out-of-range indices leave the list untouched.
    pub fn remove(&mut self, index: usize) -> Option<UserInputSymptom> {
        if index < self.symptoms.len() {
            Some(self.symptoms.remove(index))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(collector: &SymptomCollector) -> Vec<&str> {
        collector.symptoms().iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn new_collector_is_empty_with_mild_default() {
        let collector = SymptomCollector::new();
        assert!(collector.is_empty());
        assert_eq!(collector.current_severity(), Severity::Mild);
    }

    #[test]
    fn add_trims_name_and_keeps_severity() {
        let mut collector = SymptomCollector::new();
        let added = collector.add("  headache \n", Severity::Severe).unwrap();
        assert_eq!(added.name, "headache");
        assert_eq!(added.severity, Severity::Severe);
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn add_rejects_blank_names() {
        let mut collector = SymptomCollector::new();
        assert_eq!(collector.add("", Severity::Mild), Err(CollectorError::BlankName));
        assert_eq!(collector.add("   \t", Severity::Moderate), Err(CollectorError::BlankName));
        assert!(collector.is_empty());
    }

    #[test]
    fn severity_resets_to_mild_after_add() {
        let mut collector = SymptomCollector::new();
        collector.select_severity(Severity::Severe);
        collector.add("cough", Severity::Severe).unwrap();
        assert_eq!(collector.current_severity(), Severity::Mild);
    }

    #[test]
    fn failed_add_keeps_selected_severity() {
        let mut collector = SymptomCollector::new();
        collector.select_severity(Severity::Moderate);
        assert!(collector.add(" ", Severity::Moderate).is_err());
        assert_eq!(collector.current_severity(), Severity::Moderate);
    }

    #[test]
    fn duplicates_are_allowed() {
        let mut collector = SymptomCollector::new();
        collector.add("fever", Severity::Mild).unwrap();
        collector.add("fever", Severity::Mild).unwrap();
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn remove_preserves_relative_order() {
        let mut collector = SymptomCollector::new();
        for name in ["a", "b", "c", "d"] {
            collector.add(name, Severity::Mild).unwrap();
        }
        let removed = collector.remove(1).unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(names(&collector), vec!["a", "c", "d"]);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut collector = SymptomCollector::new();
        collector.add("nausea", Severity::Mild).unwrap();
        assert!(collector.remove(5).is_none());
        assert_eq!(collector.len(), 1);
    }
}
