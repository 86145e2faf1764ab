use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::enums::Gender;
use super::{check_range, ModelError};

pub const AGE_RANGE: RangeInclusive<u8> = 0..=120;
pub const HEIGHT_CM_RANGE: RangeInclusive<u16> = 50..=250;
pub const WEIGHT_KG_RANGE: RangeInclusive<u16> = 10..=300;

/// Self-reported demographics. Overwritten on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub height_cm: u16,
    pub weight_kg: u16,
}

impl Profile {
    pub fn validate(&self) -> Result<(), ModelError> {
        check_range("Age", self.age, AGE_RANGE)?;
        check_range("Height (cm)", self.height_cm, HEIGHT_CM_RANGE)?;
        check_range("Weight (kg)", self.weight_kg, WEIGHT_KG_RANGE)?;
        Ok(())
    }

    /// Body-mass index, `weight / (height/100)^2`. `None` for zero height.
    pub fn bmi(&self) -> Option<f64> {
        if self.height_cm == 0 {
            return None;
        }
        let height_m = f64::from(self.height_cm) / 100.0;
        Some(f64::from(self.weight_kg) / (height_m * height_m))
    }

    /// BMI rounded to one decimal place, as displayed.
    pub fn bmi_display(&self) -> Option<String> {
        self.bmi().map(|bmi| format!("{bmi:.1}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(height_cm: u16, weight_kg: u16) -> Profile {
        Profile {
            name: "Ada".into(),
            age: 36,
            gender: Gender::Female,
            height_cm,
            weight_kg,
        }
    }

    #[test]
    fn bmi_uses_height_in_metres() {
        let p = profile(180, 81);
        assert!((p.bmi().unwrap() - 25.0).abs() < 1e-9);
        assert_eq!(p.bmi_display().as_deref(), Some("25.0"));
    }

    #[test]
    fn bmi_rounds_to_one_decimal() {
        // 70 / 1.75^2 = 22.857...
        assert_eq!(profile(175, 70).bmi_display().as_deref(), Some("22.9"));
    }

    #[test]
    fn zero_height_has_no_bmi() {
        assert!(profile(0, 70).bmi().is_none());
    }

    #[test]
    fn validate_rejects_out_of_range_height() {
        assert!(profile(49, 70).validate().is_err());
        assert!(profile(251, 70).validate().is_err());
        assert!(profile(50, 70).validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_age_and_weight() {
        let mut p = profile(170, 9);
        assert!(p.validate().is_err());
        p.weight_kg = 60;
        p.age = 121;
        let err = p.validate().unwrap_err();
        assert!(err.to_string().starts_with("Age"));
    }
}
