use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// LLM-backed actions, one per feature handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    ProfileTips,
    SymptomCheck,
    Chat,
    TreatmentPlan,
    GlucoseAdvice,
    BloodPressureAdvice,
    AsthmaAdvice,
    ReportSummary,
}

impl Feature {
    pub const ALL: [Feature; 8] = [
        Feature::ProfileTips,
        Feature::SymptomCheck,
        Feature::Chat,
        Feature::TreatmentPlan,
        Feature::GlucoseAdvice,
        Feature::BloodPressureAdvice,
        Feature::AsthmaAdvice,
        Feature::ReportSummary,
    ];

    /// Key under which the status is stored in the session.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ProfileTips => "profile_tips",
            Self::SymptomCheck => "symptom_check",
            Self::Chat => "chat",
            Self::TreatmentPlan => "treatment_plan",
            Self::GlucoseAdvice => "glucose_advice",
            Self::BloodPressureAdvice => "blood_pressure_advice",
            Self::AsthmaAdvice => "asthma_advice",
            Self::ReportSummary => "report_summary",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Where a feature's last LLM call stands.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationStatus {
    #[default]
    Idle,
    Pending {
        started_at: DateTime<Utc>,
    },
    Resolved {
        finished_at: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    Failed {
        finished_at: DateTime<Utc>,
        error: String,
    },
}

impl InvocationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn resolved_text(&self) -> Option<&str> {
        match self {
            Self::Resolved { text, .. } => text.as_deref(),
            _ => None,
        }
    }
}
