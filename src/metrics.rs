//! Synthetic metrics generator for the reports section.
//!
//! Everything here is randomly generated demonstration data. It is stored
//! under its own session key and never mixed with the chronic-condition
//! logs, which hold what the user actually entered.

use std::ops::RangeInclusive;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::{check_range, ModelError};

pub const WINDOW_DAYS_RANGE: RangeInclusive<u32> = 1..=30;
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

pub const HEART_RATE_RANGE: RangeInclusive<u16> = 60..=100;
pub const GLUCOSE_RANGE: RangeInclusive<f64> = 70.0..=140.0;
pub const SYSTOLIC_RANGE: RangeInclusive<u16> = 110..=130;
pub const DIASTOLIC_RANGE: RangeInclusive<u16> = 70..=90;

/// Column labels, in table order.
const COLUMNS: [&str; 4] = ["Heart Rate", "Glucose Level", "Systolic BP", "Diastolic BP"];

/// One generated window. Every series has the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticMetrics {
    pub dates: Vec<NaiveDate>,
    pub heart_rate: Vec<u16>,
    pub glucose: Vec<f64>,
    pub systolic: Vec<u16>,
    pub diastolic: Vec<u16>,
    pub generated_at: DateTime<Utc>,
}

/// Headline averages shown above the charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub avg_heart_rate_bpm: i64,
    pub avg_glucose_mg_dl: i64,
}

/// count / mean / std / min / quartiles / max of one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN for a single value.
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

pub struct MetricsGenerator {
    rng: StdRng,
}

impl MetricsGenerator {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible output, for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate `days` consecutive days ending at `today`, oldest first.
    pub fn generate(&mut self, days: u32, today: NaiveDate) -> Result<SyntheticMetrics, ModelError> {
        let days = check_range("Days of Trend", days, WINDOW_DAYS_RANGE)?;
        let n = days as usize;

        let dates = (0..days)
            .rev()
            .map(|back| today - Duration::days(i64::from(back)))
            .collect();
        let heart_rate = (0..n).map(|_| self.rng.gen_range(HEART_RATE_RANGE)).collect();
        let glucose = (0..n)
            .map(|_| round1(self.rng.gen_range(GLUCOSE_RANGE)))
            .collect();
        let systolic = (0..n).map(|_| self.rng.gen_range(SYSTOLIC_RANGE)).collect();
        let diastolic = (0..n).map(|_| self.rng.gen_range(DIASTOLIC_RANGE)).collect();

        Ok(SyntheticMetrics {
            dates,
            heart_rate,
            glucose,
            systolic,
            diastolic,
            generated_at: Utc::now(),
        })
    }
}

impl SyntheticMetrics {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn summary(&self) -> MetricSummary {
        MetricSummary {
            avg_heart_rate_bpm: mean(&as_f64(&self.heart_rate)).round_ties_even() as i64,
            avg_glucose_mg_dl: mean(&self.glucose).round_ties_even() as i64,
        }
    }

    /// Per-column statistics, in table order.
    pub fn describe(&self) -> Vec<(&'static str, DescriptiveStats)> {
        let columns = [
            as_f64(&self.heart_rate),
            self.glucose.clone(),
            as_f64(&self.systolic),
            as_f64(&self.diastolic),
        ];
        COLUMNS
            .iter()
            .zip(columns.iter())
            .filter_map(|(name, values)| describe(values).map(|stats| (*name, stats)))
            .collect()
    }

    /// Plain-text statistics table, one row per statistic.
    pub fn stats_table(&self) -> String {
        let described = self.describe();
        let mut out = format!("{:<6}", "");
        for (name, _) in &described {
            out.push_str(&format!("{name:>15}"));
        }
        out.push('\n');

        let rows: [(&str, fn(&DescriptiveStats) -> f64); 8] = [
            ("count", |s| s.count as f64),
            ("mean", |s| s.mean),
            ("std", |s| s.std),
            ("min", |s| s.min),
            ("25%", |s| s.p25),
            ("50%", |s| s.p50),
            ("75%", |s| s.p75),
            ("max", |s| s.max),
        ];
        for (label, pick) in rows {
            out.push_str(&format!("{label:<6}"));
            for (_, stats) in &described {
                out.push_str(&format!("{:>15.6}", pick(stats)));
            }
            out.push('\n');
        }
        out
    }
}

/// Descriptive statistics; `None` for an empty series.
pub fn describe(values: &[f64]) -> Option<DescriptiveStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = mean(&sorted);
    let std = if n > 1 {
        let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        var.sqrt()
    } else {
        f64::NAN
    };

    Some(DescriptiveStats {
        count: n,
        mean,
        std,
        min: sorted[0],
        p25: percentile(&sorted, 0.25),
        p50: percentile(&sorted, 0.50),
        p75: percentile(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// Linear-interpolated percentile of an ascending, non-empty slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn as_f64(values: &[u16]) -> Vec<f64> {
    values.iter().map(|v| f64::from(*v)).collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
