use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A condition the model considers possible, with its likelihood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PossibleCondition {
    pub name: String,
    pub likelihood_percent: f64,
}

/// Validated symptom-checker output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SymptomAssessment {
    pub possible_conditions: Vec<PossibleCondition>,
    pub next_steps: Vec<String>,
}

/// One symptom query and its assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomRecord {
    pub input: String,
    pub response: SymptomAssessment,
    pub checked_at: DateTime<Utc>,
}
