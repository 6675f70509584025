use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// Patient sex, used by the long-term survival model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

/// A suspected stroke patient at the moment the transport decision is made.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub sex: Sex,
    pub age: u8,
    pub severity: Severity,
    /// Minutes from symptom onset to the decision point.
    pub time_since_symptoms: f64,
}

impl Patient {
    #[must_use]
    pub fn new(sex: Sex, age: u8, severity: Severity, time_since_symptoms: f64) -> Self {
        Self {
            sex,
            age,
            severity,
            time_since_symptoms,
        }
    }
}
