//! Health reports over synthetic metrics.
//!
//! The data is generated, never measured. It lives under its own session
//! key and is never mixed with the condition logs.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core_state::CoreState;
use crate::metrics::{MetricSummary, MetricsGenerator, SyntheticMetrics, DEFAULT_WINDOW_DAYS};
use crate::models::Feature;
use crate::prompts::report_summary_prompt;
use crate::session_cache::SessionHandle;

use super::{FeatureError, Invocation};

#[derive(Debug, Clone, Serialize)]
pub struct ReportWindow {
    pub metrics: SyntheticMetrics,
    pub summary: MetricSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummaryOutcome {
    pub window: ReportWindow,
    pub stats_table: String,
    pub insights: String,
}

/// Replace the stored window with a freshly generated one.
pub fn generate_window(
    session: &SessionHandle,
    generator: &mut MetricsGenerator,
    days: Option<u32>,
    today: NaiveDate,
) -> Result<ReportWindow, FeatureError> {
    let metrics = generator.generate(days.unwrap_or(DEFAULT_WINDOW_DAYS), today)?;

    let mut state = session.lock()?;
    state.set_generated_data(&metrics)?;
    tracing::info!(session_id = %session.id(), days = metrics.len(), "Synthetic report window generated");

    Ok(ReportWindow {
        summary: metrics.summary(),
        metrics,
    })
}

/// Ask for insights on the stored window, generating a default one first
/// if the session has none.
pub async fn summarize(
    core: &CoreState,
    session: &SessionHandle,
    generator: &mut MetricsGenerator,
    today: NaiveDate,
) -> Result<ReportSummaryOutcome, FeatureError> {
    let (invocation, metrics) = {
        let mut state = session.lock()?;
        if let Some(running) = state.pending_feature() {
            return Err(FeatureError::Busy(running));
        }
        let metrics = match state.generated_data() {
            Some(metrics) => metrics,
            None => {
                let metrics = generator.generate(DEFAULT_WINDOW_DAYS, today)?;
                state.set_generated_data(&metrics)?;
                metrics
            }
        };
        let invocation = Invocation::begin(core, session, &mut state, Feature::ReportSummary)?;
        (invocation, metrics)
    };

    let stats_table = metrics.stats_table();
    let result = invocation.complete(report_summary_prompt(&stats_table)).await;

    let mut state = session.lock()?;
    match result {
        Ok(insights) => {
            invocation.resolve(&mut state, Some(insights.clone()))?;
            Ok(ReportSummaryOutcome {
                window: ReportWindow {
                    summary: metrics.summary(),
                    metrics,
                },
                stats_table,
                insights,
            })
        }
        Err(e) => {
            invocation.fail(&mut state, &e.to_string())?;
            Err(e.into())
        }
    }
}
