use std::ops::RangeInclusive;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{check_range, ModelError};

pub const GLUCOSE_MG_DL_RANGE: RangeInclusive<u16> = 40..=400;
pub const SYSTOLIC_RANGE: RangeInclusive<u16> = 90..=200;
pub const DIASTOLIC_RANGE: RangeInclusive<u16> = 60..=130;
pub const ASTHMA_SEVERITY_RANGE: RangeInclusive<u8> = 1..=10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlucoseReading {
    pub mg_dl: u16,
    pub logged_at: DateTime<Utc>,
}

impl GlucoseReading {
    pub fn new(mg_dl: u16) -> Result<Self, ModelError> {
        check_range("Blood Glucose Level (mg/dL)", mg_dl, GLUCOSE_MG_DL_RANGE)?;
        Ok(Self {
            mg_dl,
            logged_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureReading {
    pub systolic: u16,
    pub diastolic: u16,
    pub logged_at: DateTime<Utc>,
}

impl BloodPressureReading {
    pub fn new(systolic: u16, diastolic: u16) -> Result<Self, ModelError> {
        check_range("Systolic (mmHg)", systolic, SYSTOLIC_RANGE)?;
        check_range("Diastolic (mmHg)", diastolic, DIASTOLIC_RANGE)?;
        Ok(Self {
            systolic,
            diastolic,
            logged_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsthmaEpisode {
    pub triggers: String,
    pub severity: u8,
    pub logged_at: DateTime<Utc>,
}

impl AsthmaEpisode {
    pub fn new(triggers: impl Into<String>, severity: u8) -> Result<Self, ModelError> {
        check_range("Severity", severity, ASTHMA_SEVERITY_RANGE)?;
        Ok(Self {
            triggers: triggers.into(),
            severity,
            logged_at: Utc::now(),
        })
    }
}

/// One plotted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint<T> {
    pub date: NaiveDate,
    pub value: T,
}

/// Chart points dated by list position: entry `i` is plotted `i` days
/// before `today`, whatever its real log time.
pub fn position_dated<E, T, F>(entries: &[E], today: NaiveDate, value: F) -> Vec<ChartPoint<T>>
where
    F: Fn(&E) -> T,
{
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| ChartPoint {
            date: today - Duration::days(i as i64),
            value: value(entry),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glucose_range_is_enforced() {
        assert!(GlucoseReading::new(39).is_err());
        assert!(GlucoseReading::new(401).is_err());
        assert_eq!(GlucoseReading::new(250).unwrap().mg_dl, 250);
    }

    #[test]
    fn blood_pressure_checks_both_values() {
        assert!(BloodPressureReading::new(120, 80).is_ok());
        assert!(BloodPressureReading::new(89, 80).is_err());
        assert!(BloodPressureReading::new(120, 131).is_err());
    }

    #[test]
    fn asthma_severity_is_one_to_ten() {
        assert!(AsthmaEpisode::new("pollen", 0).is_err());
        assert!(AsthmaEpisode::new("pollen", 11).is_err());
        assert_eq!(AsthmaEpisode::new("dust", 7).unwrap().severity, 7);
    }

    #[test]
    fn chart_points_count_backward_by_position() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let points = position_dated(&[100u16, 110, 120], today, |v| *v);
        let dates: Vec<String> = points.iter().map(|p| p.date.to_string()).collect();
        assert_eq!(dates, vec!["2025-03-10", "2025-03-09", "2025-03-08"]);
        assert_eq!(points[2].value, 120);
    }
}
