use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TdeeError;

/// Pounds per kilogram used for the kg/lb weight toggle
pub const LBS_PER_KG: f64 = 2.20462;

/// Gender used by the Mifflin-St Jeor equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Default for Gender {
    fn default() -> Self {
        Gender::Male
    }
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn key(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Gender {
    type Err = TdeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(TdeeError::invalid_selection("gender", s)),
        }
    }
}

/// Unit the weight field is entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightUnit {
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "lb")]
    Pounds,
}

impl Default for WeightUnit {
    fn default() -> Self {
        WeightUnit::Kilograms
    }
}

impl WeightUnit {
    /// Convert a weight entered in this unit to kilograms
    pub fn to_kilograms(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kilograms => value,
            WeightUnit::Pounds => value / LBS_PER_KG,
        }
    }

    /// Convert a weight in kilograms back to this unit
    pub fn from_kilograms(&self, kilograms: f64) -> f64 {
        match self {
            WeightUnit::Kilograms => kilograms,
            WeightUnit::Pounds => kilograms * LBS_PER_KG,
        }
    }

    /// The other unit of the kg/lb toggle
    pub fn toggled(&self) -> WeightUnit {
        match self {
            WeightUnit::Kilograms => WeightUnit::Pounds,
            WeightUnit::Pounds => WeightUnit::Kilograms,
        }
    }

    /// Short unit label shown next to the weight field
    pub fn label(&self) -> &'static str {
        match self {
            WeightUnit::Kilograms => "kg",
            WeightUnit::Pounds => "lbs",
        }
    }
}

impl FromStr for WeightUnit {
    type Err = TdeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilograms" => Ok(WeightUnit::Kilograms),
            "lb" | "lbs" | "pounds" => Ok(WeightUnit::Pounds),
            _ => Err(TdeeError::invalid_selection("weight unit", s)),
        }
    }
}

/// Physical activity level, scaling BMR to daily expenditure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Heavy,
    /// Very hard exercise or a physical job
    Athlete,
}

impl Default for ActivityLevel {
    fn default() -> Self {
        ActivityLevel::Sedentary
    }
}

impl ActivityLevel {
    /// Selector order
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Heavy,
        ActivityLevel::Athlete,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Heavy => 1.725,
            ActivityLevel::Athlete => 1.9,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Heavy => "heavy",
            ActivityLevel::Athlete => "athlete",
        }
    }

    pub fn label(&self) -> String {
        capitalize(self.key())
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ActivityLevel {
    type Err = TdeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        ActivityLevel::ALL
            .iter()
            .find(|level| level.key() == key)
            .copied()
            .ok_or_else(|| TdeeError::invalid_selection("activity level", s))
    }
}

/// Energy goal applied on top of maintenance expenditure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Maintenance,
    FatLoss,
    MuscleGain,
}

impl Default for Goal {
    fn default() -> Self {
        Goal::Maintenance
    }
}

impl Goal {
    /// Selector order
    pub const ALL: [Goal; 3] = [Goal::Maintenance, Goal::FatLoss, Goal::MuscleGain];

    pub fn multiplier(&self) -> f64 {
        match self {
            Goal::Maintenance => 1.0,
            Goal::FatLoss => 0.8,
            Goal::MuscleGain => 1.2,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Goal::Maintenance => "maintenance",
            Goal::FatLoss => "fat_loss",
            Goal::MuscleGain => "muscle_gain",
        }
    }

    /// Display label, e.g. "Fat loss"
    pub fn label(&self) -> String {
        capitalize(&self.key().replace('_', " "))
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Goal {
    type Err = TdeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        Goal::ALL
            .iter()
            .find(|goal| goal.key() == key)
            .copied()
            .ok_or_else(|| TdeeError::invalid_selection("goal", s))
    }
}

/// Measurements required by the standard (Mifflin-St Jeor) formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardMetrics {
    /// Height in centimeters
    pub height_cm: f64,

    /// Age in years
    pub age: u32,

    pub gender: Gender,
}

/// Which body measurements drive the BMR estimate.
///
/// The mode decides both which fields the validator requires and which
/// formula the estimator applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EstimationMode {
    /// Height, age and gender based (Mifflin-St Jeor)
    Standard(StandardMetrics),
    /// Lean-mass based (Katch-McArdle); percent is strictly within (0, 100)
    BodyFat { body_fat_percent: f64 },
}

impl EstimationMode {
    /// Pick the mode for the given measurements.
    ///
    /// A body fat percentage outside (0, 100) counts as not provided and falls
    /// back to the standard measurements. Returns `None` when neither mode
    /// has what it needs.
    pub fn select(body_fat_percent: Option<f64>, standard: Option<StandardMetrics>) -> Option<Self> {
        match body_fat_percent {
            Some(body_fat_percent) if is_body_fat_in_range(body_fat_percent) => {
                Some(EstimationMode::BodyFat { body_fat_percent })
            }
            _ => standard.map(EstimationMode::Standard),
        }
    }

    pub fn is_body_fat(&self) -> bool {
        matches!(self, EstimationMode::BodyFat { .. })
    }
}

/// Body fat percentages strictly between 0 and 100 switch to the lean-mass formula
pub fn is_body_fat_in_range(body_fat_percent: f64) -> bool {
    body_fat_percent > 0.0 && body_fat_percent < 100.0
}

/// Normalized biometric input for one estimation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiometricInput {
    /// Body weight in kilograms
    pub weight_kg: f64,

    pub mode: EstimationMode,
}

impl BiometricInput {
    pub fn new(weight_kg: f64, mode: EstimationMode) -> Self {
        BiometricInput { weight_kg, mode }
    }

    /// Input for the standard formula
    pub fn standard(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> Self {
        BiometricInput::new(
            weight_kg,
            EstimationMode::Standard(StandardMetrics {
                height_cm,
                age,
                gender,
            }),
        )
    }
}

/// BMR formula used for an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmrFormula {
    MifflinStJeor,
    #[serde(rename = "katch_mcardle")]
    KatchMcArdle,
}

impl fmt::Display for BmrFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BmrFormula::MifflinStJeor => write!(f, "Mifflin-St Jeor"),
            BmrFormula::KatchMcArdle => write!(f, "Katch-McArdle"),
        }
    }
}

/// Daily macronutrient targets in grams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroBreakdown {
    pub protein_grams: f64,
    pub carb_grams: f64,
    pub fat_grams: f64,
}

impl MacroBreakdown {
    /// Calories contributed by the three macros
    pub fn calories(&self) -> f64 {
        self.protein_grams * 4.0 + self.carb_grams * 4.0 + self.fat_grams * 9.0
    }
}

/// Result of a TDEE estimation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Basal metabolic rate in kcal/day
    pub bmr: f64,

    /// Total daily energy expenditure in kcal/day, goal adjusted
    pub total_energy: f64,

    pub macros: MacroBreakdown,

    pub formula: BmrFormula,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', ' '], "_")
}
