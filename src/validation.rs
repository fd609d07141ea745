use crate::error::{FieldName, ValidationError};
use crate::models::{
    is_body_fat_in_range, ActivityLevel, BiometricInput, EstimationMode, Gender, Goal,
    StandardMetrics, WeightUnit,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Raw field values as entered in the form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormFields {
    /// Weight in `weight_unit`
    pub weight: String,

    /// Height in centimeters
    pub height: String,

    /// Age in years
    pub age: String,

    /// Body fat percentage, empty when not provided
    pub body_fat: String,

    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
    pub weight_unit: WeightUnit,
}

/// Which set of fields the form currently requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Height, age and gender are required
    Standard,
    /// A body fat percentage in (0, 100) replaces height, age and gender
    BodyFat,
}

impl FormFields {
    /// Body fat percentage if one was entered
    pub fn body_fat_percent(&self) -> Option<f64> {
        parse_non_negative(&self.body_fat)
    }

    pub fn mode(&self) -> FormMode {
        match self.body_fat_percent() {
            Some(body_fat) if is_body_fat_in_range(body_fat) => FormMode::BodyFat,
            _ => FormMode::Standard,
        }
    }
}

/// Validated input, ready for estimation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedInput {
    pub input: BiometricInput,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

/// Entry-time filter for numeric fields.
///
/// Accepts an empty value (clearing the field) or anything that parses as a
/// non-negative finite number.
pub fn accept_numeric_entry(value: &str) -> bool {
    value.trim().is_empty() || parse_non_negative(value).is_some()
}

/// Parse a non-negative finite number, ignoring surrounding whitespace
pub fn parse_non_negative(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn parse_positive(value: &str) -> Option<f64> {
    parse_non_negative(value).filter(|v| *v > 0.0)
}

fn parse_age(value: &str) -> Option<u32> {
    parse_positive(value)
        .filter(|v| v.fract() == 0.0 && *v <= u32::MAX as f64)
        .map(|v| v as u32)
}

/// Gate between form input and estimation
pub struct InputValidator;

impl InputValidator {
    /// Validate form fields and normalize them into estimator input.
    ///
    /// Weight entered in pounds is converted to kilograms. On failure the
    /// error lists every missing or invalid required field in form order.
    pub fn validate(fields: &FormFields) -> Result<ValidatedInput, ValidationError> {
        let mode = fields.mode();
        let mut missing = Vec::new();

        let weight_kg = parse_positive(&fields.weight).map(|w| fields.weight_unit.to_kilograms(w));
        if weight_kg.is_none() {
            missing.push(FieldName::Weight);
        }

        let height_cm = parse_positive(&fields.height);
        let age = parse_age(&fields.age);

        if mode == FormMode::Standard {
            if height_cm.is_none() {
                missing.push(FieldName::Height);
            }
            if age.is_none() {
                missing.push(FieldName::Age);
            }
            if fields.gender.is_none() {
                missing.push(FieldName::Gender);
            }
        }

        if fields.activity_level.is_none() {
            missing.push(FieldName::ActivityLevel);
        }
        if fields.goal.is_none() {
            missing.push(FieldName::Goal);
        }

        let standard = match (height_cm, age, fields.gender) {
            (Some(height_cm), Some(age), Some(gender)) => Some(StandardMetrics {
                height_cm,
                age,
                gender,
            }),
            _ => None,
        };

        match (
            weight_kg,
            EstimationMode::select(fields.body_fat_percent(), standard),
            fields.activity_level,
            fields.goal,
        ) {
            (Some(weight_kg), Some(mode), Some(activity_level), Some(goal)) if missing.is_empty() => {
                debug!(weight_kg, body_fat_mode = mode.is_body_fat(), "Form input validated");
                Ok(ValidatedInput {
                    input: BiometricInput::new(weight_kg, mode),
                    activity_level,
                    goal,
                })
            }
            _ => {
                let err = ValidationError::new(missing);
                warn!(missing = %err.labels().join(", "), "Form validation failed");
                Err(err)
            }
        }
    }
}
