use serde::{Deserialize, Serialize};

use super::enums::Severity;

/// A symptom as entered on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInputSymptom {
    pub name: String,
    pub severity: Severity,
}

impl UserInputSymptom {
    pub fn new(name: impl Into<String>, severity: Severity) -> Self {
        Self {
            name: name.into(),
            severity,
        }
    }
}
