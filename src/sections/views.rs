//! Per-section views.
//!
//! A view is a serialisable description of what one section shows, built
//! from a read-only borrow of the session. Rendering never mutates state.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::config::{APP_NAME, APP_VERSION};
use crate::llm_service::LlmSettings;
use crate::metrics::{MetricSummary, SyntheticMetrics};
use crate::models::{
    position_dated, AsthmaEpisode, BloodPressureReading, ChartPoint, ChronicCondition, Feature,
    GlucoseReading, InvocationStatus, Message, Profile, SymptomRecord, TreatmentPlan,
};
use crate::session::SessionState;

use super::Section;

pub const TAGLINE: &str = "A modern health tracking and wellness assistant.";
pub const FOOTER: &str = "© 2025 MyHospital Health Assistant | Built with ❤️ using Rust & Watsonx";

const HIGHLIGHTS: [&str; 5] = [
    "💬 AI-Powered Symptom Checker",
    "📊 Real-Time Health Metrics",
    "🎯 Customizable Wellness Plans",
    "🤖 AI Chatbot for advice",
    "📈 Weekly Reports powered by AI",
];

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum View {
    Home {
        title: String,
        tagline: &'static str,
        highlights: Vec<&'static str>,
        footer: &'static str,
    },
    /// Decorative only. Nothing is submitted or checked.
    Login { fields: Vec<FormField> },
    Profile {
        profile: Option<Profile>,
        bmi: Option<String>,
        tip: InvocationStatus,
    },
    Symptoms {
        history: Vec<SymptomRecord>,
        last_check: InvocationStatus,
    },
    Chat { messages: Vec<Message> },
    Diseases {
        glucose: Tracker<GlucoseReading, u16>,
        blood_pressure: Tracker<BloodPressureReading, BloodPressurePoint>,
        asthma: Tracker<AsthmaEpisode, u8>,
    },
    Reports {
        metrics: Option<SyntheticMetrics>,
        summary: Option<MetricSummary>,
        last_summary: InvocationStatus,
    },
    Treatments {
        plan: Option<TreatmentPlan>,
        last_generation: InvocationStatus,
    },
    Settings {
        app_name: &'static str,
        version: &'static str,
        llm: LlmSettings,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub label: &'static str,
    pub input_type: &'static str,
    pub placeholder: &'static str,
}

/// One chronic-condition tracker: entries in log order plus chart points.
#[derive(Debug, Clone, Serialize)]
pub struct Tracker<E, V> {
    pub condition: ChronicCondition,
    pub entries: Vec<E>,
    pub chart: Vec<ChartPoint<V>>,
    pub last_advice: InvocationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BloodPressurePoint {
    pub systolic: u16,
    pub diastolic: u16,
}

/// Render `section` as of the local calendar date.
pub fn render(section: Section, state: &SessionState, llm: &LlmSettings) -> View {
    render_on(section, state, llm, Local::now().date_naive())
}

/// Render `section`, dating tracker charts back from `today`.
pub fn render_on(
    section: Section,
    state: &SessionState,
    llm: &LlmSettings,
    today: NaiveDate,
) -> View {
    match section {
        Section::Home => View::Home {
            title: format!("🩺 Welcome to Your Personalized {APP_NAME}"),
            tagline: TAGLINE,
            highlights: HIGHLIGHTS.to_vec(),
            footer: FOOTER,
        },
        Section::Login => View::Login {
            fields: vec![
                FormField {
                    label: "Username",
                    input_type: "text",
                    placeholder: "Enter username",
                },
                FormField {
                    label: "Password",
                    input_type: "password",
                    placeholder: "Enter password",
                },
            ],
        },
        Section::Profile => {
            let profile = state.profile();
            View::Profile {
                bmi: profile.as_ref().and_then(Profile::bmi_display),
                profile,
                tip: state.invocation(Feature::ProfileTips),
            }
        }
        Section::Symptoms => View::Symptoms {
            history: state.symptom_history(),
            last_check: state.invocation(Feature::SymptomCheck),
        },
        Section::Chat => View::Chat {
            messages: state.messages(),
        },
        Section::Diseases => diseases(state, today),
        Section::Reports => {
            let metrics = state.generated_data();
            View::Reports {
                summary: metrics.as_ref().map(SyntheticMetrics::summary),
                metrics,
                last_summary: state.invocation(Feature::ReportSummary),
            }
        }
        Section::Treatments => View::Treatments {
            plan: state.treatment_plan(),
            last_generation: state.invocation(Feature::TreatmentPlan),
        },
        Section::Settings => View::Settings {
            app_name: APP_NAME,
            version: APP_VERSION,
            llm: llm.clone(),
        },
    }
}

fn diseases(state: &SessionState, today: NaiveDate) -> View {
    let glucose = state.glucose_log();
    let blood_pressure = state.bp_log();
    let asthma = state.asthma_log();

    View::Diseases {
        glucose: Tracker {
            condition: ChronicCondition::Diabetes,
            chart: position_dated(&glucose, today, |r| r.mg_dl),
            entries: glucose,
            last_advice: state.invocation(Feature::GlucoseAdvice),
        },
        blood_pressure: Tracker {
            condition: ChronicCondition::Hypertension,
            chart: position_dated(&blood_pressure, today, |r| BloodPressurePoint {
                systolic: r.systolic,
                diastolic: r.diastolic,
            }),
            entries: blood_pressure,
            last_advice: state.invocation(Feature::BloodPressureAdvice),
        },
        asthma: Tracker {
            condition: ChronicCondition::Asthma,
            chart: position_dated(&asthma, today, |e| e.severity),
            entries: asthma,
            last_advice: state.invocation(Feature::AsthmaAdvice),
        },
    }
}
