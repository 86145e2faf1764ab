//! Symptom checker.

use chrono::Utc;
use serde::Serialize;

use crate::core_state::CoreState;
use crate::models::{Feature, SymptomRecord};
use crate::prompts::symptom_check_prompt;
use crate::session_cache::SessionHandle;

use super::parse::parse_symptom_assessment;
use super::{start, FeatureError};

/// Shown to the user when the completion cannot be interpreted.
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response format from AI.";

#[derive(Debug, Clone, Serialize)]
pub struct SymptomOutcome {
    pub record: SymptomRecord,
    /// History length after the append.
    pub history_len: usize,
}

/// Assess free-text symptoms. Only a well-formed assessment is stored.
pub async fn check_symptoms(
    core: &CoreState,
    session: &SessionHandle,
    symptoms: &str,
) -> Result<SymptomOutcome, FeatureError> {
    let symptoms = symptoms.trim();

    let invocation = start(core, session, Feature::SymptomCheck)?;
    let result = invocation.complete(symptom_check_prompt(symptoms)).await;

    let mut state = session.lock()?;
    let response = match result {
        Ok(text) => text,
        Err(e) => {
            invocation.fail(&mut state, &e.to_string())?;
            return Err(e.into());
        }
    };

    let assessment = match parse_symptom_assessment(&response) {
        Ok(assessment) => assessment,
        Err(source) => {
            tracing::warn!(session_id = %session.id(), error = %source, "Symptom assessment rejected");
            invocation.fail(&mut state, INVALID_RESPONSE_MESSAGE)?;
            return Err(FeatureError::InvalidAiResponse {
                message: INVALID_RESPONSE_MESSAGE,
                source,
            });
        }
    };

    let record = SymptomRecord {
        input: symptoms.to_string(),
        response: assessment,
        checked_at: Utc::now(),
    };
    let history_len = state.push_symptom_record(&record)?;
    invocation.resolve(&mut state, None)?;

    Ok(SymptomOutcome {
        record,
        history_len,
    })
}
