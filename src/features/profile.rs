//! Profile save + personalised tip.

use serde::Serialize;

use crate::core_state::CoreState;
use crate::models::{Feature, InvocationStatus, Profile};
use crate::prompts::profile_tips_prompt;
use crate::session_cache::SessionHandle;

use super::{FeatureError, Invocation};

#[derive(Debug, Clone, Serialize)]
pub struct ProfileOutcome {
    pub profile: Profile,
    /// BMI rounded to one decimal place.
    pub bmi: Option<String>,
    /// Tip call status. A failed tip does not undo the save.
    pub tip: InvocationStatus,
}

pub async fn save_profile(
    core: &CoreState,
    session: &SessionHandle,
    profile: Profile,
) -> Result<ProfileOutcome, FeatureError> {
    profile.validate()?;

    let invocation = {
        let mut state = session.lock()?;
        if let Some(running) = state.pending_feature() {
            return Err(FeatureError::Busy(running));
        }
        state.save_profile(&profile)?;
        Invocation::begin(core, session, &mut state, Feature::ProfileTips)?
    };
    tracing::info!(session_id = %session.id(), "Profile saved");

    let result = invocation.complete(profile_tips_prompt(&profile)).await;

    let mut state = session.lock()?;
    let tip = match result {
        Ok(text) => invocation.resolve(&mut state, Some(text))?,
        Err(e) => invocation.fail(&mut state, &e.to_string())?,
    };

    Ok(ProfileOutcome {
        bmi: profile.bmi_display(),
        profile,
        tip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::{core_replying, core_with};
    use crate::llm::{LlmError, MockLlmClient};
    use crate::models::Gender;

    fn profile() -> Profile {
        Profile {
            name: "Ada".into(),
            age: 30,
            gender: Gender::Female,
            height_cm: 165,
            weight_kg: 60,
        }
    }

    #[tokio::test]
    async fn saves_profile_and_returns_tip() {
        let (core, session) = core_replying("Walk daily.");
        let outcome = save_profile(&core, &session, profile()).await.unwrap();

        assert_eq!(outcome.bmi.as_deref(), Some("22.0"));
        assert_eq!(outcome.tip.resolved_text(), Some("Walk daily."));
        assert_eq!(session.lock().unwrap().profile(), Some(profile()));
    }

    #[tokio::test]
    async fn tip_failure_keeps_saved_profile() {
        let (core, session) =
            core_with(MockLlmClient::failing(LlmError::Connection("down".into())));
        let outcome = save_profile(&core, &session, profile()).await.unwrap();

        assert!(matches!(outcome.tip, InvocationStatus::Failed { .. }));
        let state = session.lock().unwrap();
        assert_eq!(state.profile(), Some(profile()));
        assert!(state.pending_feature().is_none());
    }

    #[tokio::test]
    async fn out_of_range_profile_is_rejected_and_not_saved() {
        let (core, session) = core_replying("unused");
        let mut bad = profile();
        bad.height_cm = 20;
        let err = save_profile(&core, &session, bad).await.unwrap_err();

        assert!(matches!(err, FeatureError::InvalidInput(_)));
        assert!(session.lock().unwrap().profile().is_none());
    }

    #[tokio::test]
    async fn prompt_embeds_demographics() {
        let client = std::sync::Arc::new(MockLlmClient::new("ok"));
        let core = CoreState::new(client.clone());
        let session = core.create_session().unwrap();
        save_profile(&core, &session, profile()).await.unwrap();

        assert_eq!(
            client.prompts(),
            vec!["Give general health tips for a 30-year-old Female with height 165 cm and weight 60 kg."]
        );
    }
}
