//! Prompt templates, one per LLM-backed feature.
//!
//! Structured features spell out the exact JSON shape they expect back;
//! the parser rejects anything else.

use crate::models::Profile;

/// Substituted when an advice call fails; the log entry itself still lands.
pub const ADVICE_FALLBACK: &str = "AI is currently unavailable for advice.";

pub const SYMPTOM_SCHEMA: &str = r#"{"possible_conditions": [{"name": "condition name", "likelihood_percent": 40}], "next_steps": ["what to do next"]}"#;

pub const TREATMENT_SCHEMA: &str = r#"{"medications": [{"name": "medication", "dosage": "dose or null", "frequency": "how often or null"}], "lifestyle_changes": ["change"], "follow_up_care": ["follow-up step"], "duration": "overall duration"}"#;

pub fn profile_tips_prompt(profile: &Profile) -> String {
    format!(
        "Give general health tips for a {}-year-old {} with height {} cm and weight {} kg.",
        profile.age, profile.gender, profile.height_cm, profile.weight_kg
    )
}

pub fn symptom_check_prompt(symptoms: &str) -> String {
    format!(
        r#"Based on these symptoms: '{symptoms}', provide a list of possible conditions,
their likelihood percentages, and next steps like when to see a doctor or self-care measures.
Format the output as JSON only, with no text before or after it, exactly in this structure:
{SYMPTOM_SCHEMA}
"likelihood_percent" is a number between 0 and 100."#
    )
}

pub fn treatment_plan_prompt(condition: &str, details: &str) -> String {
    format!(
        r#"Create a personalized treatment plan for a patient with:
Condition: {condition}
Details: {details}
Include medications, lifestyle changes, follow-up care, and duration.
Format as JSON only, with no text before or after it, exactly in this structure:
{TREATMENT_SCHEMA}"#
    )
}

pub fn glucose_advice_prompt(mg_dl: u16) -> String {
    format!("My blood sugar is {mg_dl}. Is it normal? What should I do?")
}

pub fn blood_pressure_advice_prompt(systolic: u16, diastolic: u16) -> String {
    format!("My blood pressure is {systolic}/{diastolic} mmHg. What does that mean?")
}

pub fn asthma_advice_prompt(triggers: &str) -> String {
    format!("What are some ways to avoid asthma triggers like {triggers}?")
}

pub fn report_summary_prompt(stats_table: &str) -> String {
    format!(
        "Provide insights based on these health trends: {stats_table}. Give actionable advice."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    #[test]
    fn profile_prompt_embeds_demographics() {
        let profile = Profile {
            name: "Lee".into(),
            age: 52,
            gender: Gender::Male,
            height_cm: 178,
            weight_kg: 90,
        };
        assert_eq!(
            profile_tips_prompt(&profile),
            "Give general health tips for a 52-year-old Male with height 178 cm and weight 90 kg."
        );
    }

    #[test]
    fn symptom_prompt_requests_json_schema() {
        let prompt = symptom_check_prompt("headache and fever");
        assert!(prompt.contains("'headache and fever'"));
        assert!(prompt.contains("JSON"));
        assert!(prompt.contains("possible_conditions"));
    }

    #[test]
    fn treatment_prompt_embeds_condition_and_details() {
        let prompt = treatment_plan_prompt("Type 2 diabetes", "58, female, hypertension");
        assert!(prompt.contains("Condition: Type 2 diabetes"));
        assert!(prompt.contains("Details: 58, female, hypertension"));
        assert!(prompt.contains("lifestyle_changes"));
    }

    #[test]
    fn advice_prompts() {
        assert_eq!(
            glucose_advice_prompt(250),
            "My blood sugar is 250. Is it normal? What should I do?"
        );
        assert_eq!(
            blood_pressure_advice_prompt(140, 90),
            "My blood pressure is 140/90 mmHg. What does that mean?"
        );
        assert!(asthma_advice_prompt("pollen, dust").ends_with("like pollen, dust?"));
    }

    #[test]
    fn schemas_are_valid_json() {
        assert!(serde_json::from_str::<serde_json::Value>(SYMPTOM_SCHEMA).is_ok());
        assert!(serde_json::from_str::<serde_json::Value>(TREATMENT_SCHEMA).is_ok());
    }
}
