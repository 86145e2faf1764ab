//! Chronic-condition loggers: glucose, blood pressure, asthma.
//!
//! Each logger validates, appends, confirms, then asks for advice. The
//! entry is stored before the LLM is called, so a failed advice call never
//! loses a reading; the fixed fallback text is returned instead.

use serde::Serialize;

use crate::core_state::CoreState;
use crate::models::{AsthmaEpisode, BloodPressureReading, Feature, GlucoseReading};
use crate::prompts::{
    asthma_advice_prompt, blood_pressure_advice_prompt, glucose_advice_prompt, ADVICE_FALLBACK,
};
use crate::session::{SessionState, StateError};
use crate::session_cache::SessionHandle;

use super::{FeatureError, Invocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceSource {
    Ai,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogOutcome<E> {
    pub entry: E,
    pub confirmation: String,
    /// Tracker length after the append.
    pub entries: usize,
    pub advice: String,
    pub advice_source: AdviceSource,
}

pub async fn log_glucose(
    core: &CoreState,
    session: &SessionHandle,
    mg_dl: u16,
) -> Result<LogOutcome<GlucoseReading>, FeatureError> {
    let reading = GlucoseReading::new(mg_dl)?;
    let confirmation = format!("Logged: {mg_dl} mg/dL");
    log_and_advise(
        core,
        session,
        Feature::GlucoseAdvice,
        reading,
        confirmation,
        glucose_advice_prompt(mg_dl),
        |state, entry| state.push_glucose(entry),
    )
    .await
}

pub async fn log_blood_pressure(
    core: &CoreState,
    session: &SessionHandle,
    systolic: u16,
    diastolic: u16,
) -> Result<LogOutcome<BloodPressureReading>, FeatureError> {
    let reading = BloodPressureReading::new(systolic, diastolic)?;
    let confirmation = format!("Logged: {systolic}/{diastolic} mmHg");
    log_and_advise(
        core,
        session,
        Feature::BloodPressureAdvice,
        reading,
        confirmation,
        blood_pressure_advice_prompt(systolic, diastolic),
        |state, entry| state.push_blood_pressure(entry),
    )
    .await
}

pub async fn log_asthma(
    core: &CoreState,
    session: &SessionHandle,
    triggers: &str,
    severity: u8,
) -> Result<LogOutcome<AsthmaEpisode>, FeatureError> {
    let triggers = triggers.trim();
    let episode = AsthmaEpisode::new(triggers, severity)?;
    log_and_advise(
        core,
        session,
        Feature::AsthmaAdvice,
        episode,
        "Episode logged successfully.".to_string(),
        asthma_advice_prompt(triggers),
        |state, entry| state.push_asthma(entry),
    )
    .await
}

async fn log_and_advise<E, F>(
    core: &CoreState,
    session: &SessionHandle,
    feature: Feature,
    entry: E,
    confirmation: String,
    prompt: String,
    append: F,
) -> Result<LogOutcome<E>, FeatureError>
where
    F: FnOnce(&mut SessionState, &E) -> Result<usize, StateError>,
{
    let (invocation, entries) = {
        let mut state = session.lock()?;
        if let Some(running) = state.pending_feature() {
            return Err(FeatureError::Busy(running));
        }
        let entries = append(&mut *state, &entry)?;
        let invocation = Invocation::begin(core, session, &mut state, feature)?;
        (invocation, entries)
    };
    tracing::info!(session_id = %session.id(), %feature, entries, "Condition entry logged");

    let result = invocation.complete(prompt).await;

    let mut state = session.lock()?;
    let (advice, advice_source) = match result {
        Ok(text) => {
            invocation.resolve(&mut state, Some(text.clone()))?;
            (text, AdviceSource::Ai)
        }
        Err(e) => {
            invocation.fail(&mut state, &e.to_string())?;
            (ADVICE_FALLBACK.to_string(), AdviceSource::Fallback)
        }
    };

    Ok(LogOutcome {
        entry,
        confirmation,
        entries,
        advice,
        advice_source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::{core_replying, core_with};
    use crate::llm::{LlmError, MockLlmClient};

    #[tokio::test]
    async fn glucose_is_logged_with_advice() {
        let (core, session) = core_replying("That is high; contact your doctor.");
        let outcome = log_glucose(&core, &session, 250).await.unwrap();

        assert_eq!(outcome.confirmation, "Logged: 250 mg/dL");
        assert_eq!(outcome.entries, 1);
        assert_eq!(outcome.advice_source, AdviceSource::Ai);
        assert_eq!(session.lock().unwrap().glucose_log()[0].mg_dl, 250);
    }

    #[tokio::test]
    async fn advice_failure_uses_fallback_and_keeps_entry() {
        let (core, session) =
            core_with(MockLlmClient::failing(LlmError::Connection("down".into())));
        let outcome = log_blood_pressure(&core, &session, 120, 80).await.unwrap();

        assert_eq!(outcome.confirmation, "Logged: 120/80 mmHg");
        assert_eq!(outcome.advice, ADVICE_FALLBACK);
        assert_eq!(outcome.advice_source, AdviceSource::Fallback);
        let state = session.lock().unwrap();
        assert_eq!(state.bp_log().len(), 1);
        assert!(state.pending_feature().is_none());
    }

    #[tokio::test]
    async fn asthma_episode_is_logged() {
        let (core, session) = core_replying("Keep windows closed.");
        let outcome = log_asthma(&core, &session, "pollen, dust", 6).await.unwrap();

        assert_eq!(outcome.confirmation, "Episode logged successfully.");
        assert_eq!(outcome.entry.triggers, "pollen, dust");
        assert_eq!(session.lock().unwrap().asthma_log()[0].severity, 6);
    }

    #[tokio::test]
    async fn out_of_range_values_are_not_logged() {
        let (core, session) = core_replying("unused");
        assert!(matches!(
            log_glucose(&core, &session, 401).await,
            Err(FeatureError::InvalidInput(_))
        ));
        assert!(log_blood_pressure(&core, &session, 120, 140).await.is_err());
        assert!(log_asthma(&core, &session, "smoke", 0).await.is_err());

        let state = session.lock().unwrap();
        assert!(state.glucose_log().is_empty());
        assert!(state.bp_log().is_empty());
        assert!(state.asthma_log().is_empty());
    }

    #[tokio::test]
    async fn asthma_episode_without_triggers_is_still_logged() {
        let (core, session) = core_replying("Keep your inhaler close.");
        let outcome = log_asthma(&core, &session, "", 5).await.unwrap();

        assert_eq!(outcome.entries, 1);
        assert_eq!(outcome.entry.triggers, "");
        assert_eq!(outcome.advice_source, AdviceSource::Ai);
        assert_eq!(session.lock().unwrap().asthma_log().len(), 1);
    }

    #[tokio::test]
    async fn trackers_stay_separate() {
        let (core, session) = core_replying("ok");
        log_glucose(&core, &session, 100).await.unwrap();
        log_glucose(&core, &session, 110).await.unwrap();
        log_blood_pressure(&core, &session, 118, 76).await.unwrap();

        let state = session.lock().unwrap();
        assert_eq!(state.glucose_log().len(), 2);
        assert_eq!(state.bp_log().len(), 1);
        assert!(state.asthma_log().is_empty());
        assert!(state.generated_data().is_none());
    }
}
