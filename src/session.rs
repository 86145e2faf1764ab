//! Per-session state store.
//!
//! `SessionStore` is a string-keyed map of JSON values with
//! `get`/`set`/`append`. It is initialised with every known key and its
//! empty default exactly once, when the session is created.
//! `SessionState` layers typed accessors for each entity on top.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::metrics::SyntheticMetrics;
use crate::models::{
    AsthmaEpisode, BloodPressureReading, Feature, GlucoseReading, InvocationStatus, Message,
    Profile, SymptomRecord, TreatmentPlan,
};
use crate::sections::Section;

/// Store keys.
pub mod keys {
    pub const CURRENT_SECTION: &str = "current_section";
    pub const PROFILE: &str = "profile";
    pub const MESSAGES: &str = "messages";
    pub const SYMPTOMS_HISTORY: &str = "symptoms_history";
    pub const TREATMENT_PLAN: &str = "treatment_plan";
    pub const GENERATED_DATA: &str = "generated_data";
    pub const GLUCOSE_LOG: &str = "glucose_log";
    pub const BP_LOG: &str = "bp_log";
    pub const ASTHMA_LOG: &str = "asthma_log";
    pub const INVOCATIONS: &str = "invocations";
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Cannot append to '{0}': value is not a list")]
    NotAList(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ═══════════════════════════════════════════════════════════
// SessionStore: untyped key/value contract
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct SessionStore {
    values: BTreeMap<String, Value>,
}

impl SessionStore {
    /// A store holding every known key with its empty default.
    pub fn new() -> Self {
        let values = [
            (keys::CURRENT_SECTION, json!(Section::Home)),
            (keys::PROFILE, json!({})),
            (keys::MESSAGES, json!([])),
            (keys::SYMPTOMS_HISTORY, json!([])),
            (keys::TREATMENT_PLAN, json!({})),
            (keys::GENERATED_DATA, json!([])),
            (keys::GLUCOSE_LOG, json!([])),
            (keys::BP_LOG, json!([])),
            (keys::ASTHMA_LOG, json!([])),
            (keys::INVOCATIONS, json!({})),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self { values }
    }

    /// Typed read. Returns `default` when the key is absent or holds a
    /// value of a different shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.values.get(key) {
            None => default,
            Some(value) => match serde_json::from_value(value.clone()) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(key, error = %e, "session value has unexpected shape");
                    default
                }
            },
        }
    }

    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), StateError> {
        self.values.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Push onto the list at `key` (created if absent). Returns the new length.
    pub fn append<T: Serialize>(&mut self, key: &str, value: T) -> Result<usize, StateError> {
        let value = serde_json::to_value(value)?;
        let slot = self
            .values
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(items) => {
                items.push(value);
                Ok(items.len())
            }
            _ => Err(StateError::NotAList(key.to_string())),
        }
    }

    /// The whole store, verbatim.
    pub fn snapshot(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// A record stored as an object, or `None` when empty/unset.
    fn get_record<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.values.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) if map.is_empty() => None,
            Some(value) => match serde_json::from_value(value.clone()) {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!(key, error = %e, "session record has unexpected shape");
                    None
                }
            },
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// SessionState: typed view over one session's store
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct SessionState {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    store: SessionStore,
}

impl SessionState {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            store: SessionStore::new(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SessionStore {
        &mut self.store
    }

    // ── Navigation ──────────────────────────────────────────

    pub fn current_section(&self) -> Section {
        self.store.get(keys::CURRENT_SECTION, Section::Home)
    }

    /// Select a section. Returns `false` when it was already selected.
    pub fn navigate(&mut self, section: Section) -> Result<bool, StateError> {
        if self.current_section() == section {
            return Ok(false);
        }
        self.store.set(keys::CURRENT_SECTION, section)?;
        Ok(true)
    }

    // ── Profile ─────────────────────────────────────────────

    pub fn profile(&self) -> Option<Profile> {
        self.store.get_record(keys::PROFILE)
    }

    pub fn save_profile(&mut self, profile: &Profile) -> Result<(), StateError> {
        self.store.set(keys::PROFILE, profile)
    }

    // ── Chat ────────────────────────────────────────────────

    pub fn messages(&self) -> Vec<Message> {
        self.store.get(keys::MESSAGES, Vec::new())
    }

    pub fn push_message(&mut self, message: &Message) -> Result<usize, StateError> {
        self.store.append(keys::MESSAGES, message)
    }

    // ── Symptoms ────────────────────────────────────────────

    pub fn symptom_history(&self) -> Vec<SymptomRecord> {
        self.store.get(keys::SYMPTOMS_HISTORY, Vec::new())
    }

    pub fn push_symptom_record(&mut self, record: &SymptomRecord) -> Result<usize, StateError> {
        self.store.append(keys::SYMPTOMS_HISTORY, record)
    }

    // ── Treatment plan ──────────────────────────────────────

    pub fn treatment_plan(&self) -> Option<TreatmentPlan> {
        self.store.get_record(keys::TREATMENT_PLAN)
    }

    pub fn set_treatment_plan(&mut self, plan: &TreatmentPlan) -> Result<(), StateError> {
        self.store.set(keys::TREATMENT_PLAN, plan)
    }

    // ── Chronic condition logs ──────────────────────────────

    pub fn glucose_log(&self) -> Vec<GlucoseReading> {
        self.store.get(keys::GLUCOSE_LOG, Vec::new())
    }

    pub fn push_glucose(&mut self, reading: &GlucoseReading) -> Result<usize, StateError> {
        self.store.append(keys::GLUCOSE_LOG, reading)
    }

    pub fn bp_log(&self) -> Vec<BloodPressureReading> {
        self.store.get(keys::BP_LOG, Vec::new())
    }

    pub fn push_blood_pressure(
        &mut self,
        reading: &BloodPressureReading,
    ) -> Result<usize, StateError> {
        self.store.append(keys::BP_LOG, reading)
    }

    pub fn asthma_log(&self) -> Vec<AsthmaEpisode> {
        self.store.get(keys::ASTHMA_LOG, Vec::new())
    }

    pub fn push_asthma(&mut self, episode: &AsthmaEpisode) -> Result<usize, StateError> {
        self.store.append(keys::ASTHMA_LOG, episode)
    }

    // ── Synthetic report data ───────────────────────────────

    /// Latest synthetic window. Never holds real measurements.
    pub fn generated_data(&self) -> Option<SyntheticMetrics> {
        match self.store.get_raw(keys::GENERATED_DATA) {
            Some(Value::Array(items)) if items.is_empty() => None,
            _ => self.store.get_record(keys::GENERATED_DATA),
        }
    }

    pub fn set_generated_data(&mut self, metrics: &SyntheticMetrics) -> Result<(), StateError> {
        self.store.set(keys::GENERATED_DATA, metrics)
    }

    // ── LLM invocation status ───────────────────────────────

    pub fn invocation(&self, feature: Feature) -> InvocationStatus {
        self.store
            .get_raw(keys::INVOCATIONS)
            .and_then(|all| all.get(feature.key()))
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    pub fn set_invocation(
        &mut self,
        feature: Feature,
        status: &InvocationStatus,
    ) -> Result<(), StateError> {
        let mut all: BTreeMap<String, Value> =
            self.store.get(keys::INVOCATIONS, BTreeMap::new());
        all.insert(feature.key().to_string(), serde_json::to_value(status)?);
        self.store.set(keys::INVOCATIONS, all)
    }

    /// The feature whose LLM call is in flight, if any.
    pub fn pending_feature(&self) -> Option<Feature> {
        Feature::ALL
            .into_iter()
            .find(|f| self.invocation(*f).is_pending())
    }
}
