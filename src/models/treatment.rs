use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannedMedication {
    pub name: String,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
}

/// Validated treatment-planner output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreatmentPlanPayload {
    pub medications: Vec<PlannedMedication>,
    pub lifestyle_changes: Vec<String>,
    pub follow_up_care: Vec<String>,
    pub duration: String,
}

/// Most recently generated plan. Singular: each generation replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentPlan {
    pub condition: String,
    pub details: String,
    pub plan: TreatmentPlanPayload,
    pub generated_at: DateTime<Utc>,
}
