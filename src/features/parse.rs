//! Strict parsing of structured LLM output.
//!
//! The completion must contain one JSON object matching the requested
//! schema. Surrounding prose and a Markdown code fence are tolerated;
//! anything that is not JSON (single-quoted objects, code) or that does
//! not fit the schema is rejected.

use serde::de::DeserializeOwned;

use crate::models::{SymptomAssessment, TreatmentPlanPayload};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("No JSON object found in response")]
    NoJson,
    #[error("JSON parsing error: {0}")]
    Json(String),
    #[error("Response does not match schema: {0}")]
    Schema(String),
}

pub fn parse_symptom_assessment(response: &str) -> Result<SymptomAssessment, ParseError> {
    let assessment: SymptomAssessment = parse_json_object(response)?;

    if assessment.possible_conditions.is_empty() {
        return Err(ParseError::Schema("possible_conditions is empty".into()));
    }
    for condition in &assessment.possible_conditions {
        if condition.name.trim().is_empty() {
            return Err(ParseError::Schema("condition name is blank".into()));
        }
        if !(0.0..=100.0).contains(&condition.likelihood_percent) {
            return Err(ParseError::Schema(format!(
                "likelihood_percent {} outside 0-100",
                condition.likelihood_percent
            )));
        }
    }
    if assessment.next_steps.iter().any(|s| s.trim().is_empty()) {
        return Err(ParseError::Schema("next step is blank".into()));
    }
    Ok(assessment)
}

pub fn parse_treatment_plan(response: &str) -> Result<TreatmentPlanPayload, ParseError> {
    let plan: TreatmentPlanPayload = parse_json_object(response)?;

    if plan.medications.iter().any(|m| m.name.trim().is_empty()) {
        return Err(ParseError::Schema("medication name is blank".into()));
    }
    if plan.duration.trim().is_empty() {
        return Err(ParseError::Schema("duration is blank".into()));
    }
    if plan.medications.is_empty() && plan.lifestyle_changes.is_empty() && plan.follow_up_care.is_empty() {
        return Err(ParseError::Schema("plan has no content".into()));
    }
    Ok(plan)
}

/// Locate the JSON object in `response` and deserialize it into `T`.
fn parse_json_object<T: DeserializeOwned>(response: &str) -> Result<T, ParseError> {
    let json_str = extract_json_object(response)?;
    serde_json::from_str(json_str).map_err(|e| {
        if e.is_data() {
            ParseError::Schema(e.to_string())
        } else {
            ParseError::Json(e.to_string())
        }
    })
}

/// The fenced block if there is one, otherwise the span from the first
/// `{` to the last `}`.
fn extract_json_object(response: &str) -> Result<&str, ParseError> {
    let body = fenced_block(response).unwrap_or(response);
    let start = body.find('{').ok_or(ParseError::NoJson)?;
    let end = body.rfind('}').ok_or(ParseError::NoJson)?;
    if end < start {
        return Err(ParseError::NoJson);
    }
    Ok(&body[start..=end])
}

fn fenced_block(response: &str) -> Option<&str> {
    let open = response.find("```")?;
    let after_fence = &response[open + 3..];
    // Skip an info string such as `json`.
    let content_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let content = &after_fence[content_start..];
    let close = content.find("```")?;
    Some(content[..close].trim())
}
