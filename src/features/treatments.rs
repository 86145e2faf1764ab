//! Treatment planner. Each successful generation replaces the stored plan.

use chrono::Utc;

use crate::core_state::CoreState;
use crate::models::{Feature, TreatmentPlan};
use crate::prompts::treatment_plan_prompt;
use crate::session_cache::SessionHandle;

use super::parse::parse_treatment_plan;
use super::{start, FeatureError};

pub const INVALID_PLAN_MESSAGE: &str = "Failed to parse treatment plan.";

pub async fn generate_plan(
    core: &CoreState,
    session: &SessionHandle,
    condition: &str,
    details: &str,
) -> Result<TreatmentPlan, FeatureError> {
    let condition = condition.trim();
    let details = details.trim();

    let invocation = start(core, session, Feature::TreatmentPlan)?;
    let result = invocation
        .complete(treatment_plan_prompt(condition, details))
        .await;

    let mut state = session.lock()?;
    let response = match result {
        Ok(text) => text,
        Err(e) => {
            invocation.fail(&mut state, &e.to_string())?;
            return Err(e.into());
        }
    };

    let payload = match parse_treatment_plan(&response) {
        Ok(payload) => payload,
        Err(source) => {
            tracing::warn!(session_id = %session.id(), error = %source, "Treatment plan rejected");
            invocation.fail(&mut state, INVALID_PLAN_MESSAGE)?;
            return Err(FeatureError::InvalidAiResponse {
                message: INVALID_PLAN_MESSAGE,
                source,
            });
        }
    };

    let plan = TreatmentPlan {
        condition: condition.to_string(),
        details: details.to_string(),
        plan: payload,
        generated_at: Utc::now(),
    };
    state.set_treatment_plan(&plan)?;
    invocation.resolve(&mut state, None)?;
    Ok(plan)
}
