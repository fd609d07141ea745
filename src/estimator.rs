//! TDEE estimation
//!
//! Estimates basal metabolic rate with one of two published equations, scales
//! it by activity level and goal, then splits the total into macronutrient
//! targets.
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting
//!   energy expenditure in healthy individuals.
//! - Katch-McArdle: BMR from lean body mass, for when body fat is known.

use crate::models::{
    ActivityLevel, BiometricInput, BmrFormula, EstimationMode, EstimationResult, Gender, Goal,
    MacroBreakdown, StandardMetrics,
};

/// Share of total calories from protein
pub const PROTEIN_CALORIE_SHARE: f64 = 0.30;
/// Share of total calories from carbohydrate
pub const CARB_CALORIE_SHARE: f64 = 0.40;
/// Share of total calories from fat
pub const FAT_CALORIE_SHARE: f64 = 0.30;

pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARB: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Stateless TDEE calculator
pub struct TdeeEstimator;

impl TdeeEstimator {
    /// Estimate daily energy expenditure and macro targets.
    ///
    /// Input is expected to have passed validation; there is no error path.
    pub fn estimate(input: &BiometricInput, activity: ActivityLevel, goal: Goal) -> EstimationResult {
        let (bmr, formula) = Self::bmr(input);
        let total_energy = bmr * activity.multiplier() * goal.multiplier();

        EstimationResult {
            bmr,
            total_energy,
            macros: Self::macro_split(total_energy),
            formula,
            activity_level: activity,
            goal,
        }
    }

    /// BMR in kcal/day and the formula that produced it
    pub fn bmr(input: &BiometricInput) -> (f64, BmrFormula) {
        match input.mode {
            EstimationMode::BodyFat { body_fat_percent } => {
                let lean_mass = Self::lean_mass(input.weight_kg, body_fat_percent);
                (Self::katch_mcardle(lean_mass), BmrFormula::KatchMcArdle)
            }
            EstimationMode::Standard(metrics) => (
                Self::mifflin_st_jeor(input.weight_kg, &metrics),
                BmrFormula::MifflinStJeor,
            ),
        }
    }

    /// Mifflin-St Jeor equation
    ///
    /// BMR = 10 × weight_kg + 6.25 × height_cm − 5 × age + s
    /// where s = +5 for men and −161 for women.
    pub fn mifflin_st_jeor(weight_kg: f64, metrics: &StandardMetrics) -> f64 {
        let offset = match metrics.gender {
            Gender::Male => 5.0,
            Gender::Female => -161.0,
        };

        10.0 * weight_kg + 6.25 * metrics.height_cm - 5.0 * metrics.age as f64 + offset
    }

    /// Katch-McArdle equation: BMR = 370 + 21.6 × lean_mass_kg
    pub fn katch_mcardle(lean_mass_kg: f64) -> f64 {
        370.0 + 21.6 * lean_mass_kg
    }

    /// Body weight minus fat mass
    pub fn lean_mass(weight_kg: f64, body_fat_percent: f64) -> f64 {
        weight_kg * (1.0 - body_fat_percent / 100.0)
    }

    /// Fixed 30/40/30 protein/carb/fat split of total calories
    pub fn macro_split(total_energy: f64) -> MacroBreakdown {
        MacroBreakdown {
            protein_grams: total_energy * PROTEIN_CALORIE_SHARE / KCAL_PER_GRAM_PROTEIN,
            carb_grams: total_energy * CARB_CALORIE_SHARE / KCAL_PER_GRAM_CARB,
            fat_grams: total_energy * FAT_CALORIE_SHARE / KCAL_PER_GRAM_FAT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    struct EventCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for EventCounter {
        fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn male_70kg() -> BiometricInput {
        BiometricInput::standard(70.0, 175.0, 25, Gender::Male)
    }

    #[test]
    fn test_mifflin_st_jeor_male() {
        let result = TdeeEstimator::estimate(&male_70kg(), ActivityLevel::Sedentary, Goal::Maintenance);

        assert_eq!(result.formula, BmrFormula::MifflinStJeor);
        assert!((result.bmr - 1673.75).abs() < 1e-9);
        assert!((result.total_energy - 2008.5).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_emits_no_events() {
        let events = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(EventCounter(events.clone()));

        tracing::subscriber::with_default(subscriber, || {
            let body_fat = BiometricInput::new(70.0, EstimationMode::BodyFat { body_fat_percent: 15.0 });
            TdeeEstimator::estimate(&male_70kg(), ActivityLevel::Heavy, Goal::FatLoss);
            TdeeEstimator::estimate(&body_fat, ActivityLevel::Athlete, Goal::MuscleGain);
            assert_eq!(events.load(Ordering::SeqCst), 0);

            tracing::info!("counted");
            assert_eq!(events.load(Ordering::SeqCst), 1);
        });
    }

    #[test]
    fn test_mifflin_st_jeor_female_offset() {
        let female = BiometricInput::standard(70.0, 175.0, 25, Gender::Female);
        let (bmr, _) = TdeeEstimator::bmr(&female);
        let (male_bmr, _) = TdeeEstimator::bmr(&male_70kg());

        assert!((bmr - 1507.75).abs() < 1e-9);
        assert!((male_bmr - bmr - 166.0).abs() < 1e-9);
    }

    #[test]
    fn test_katch_mcardle_with_body_fat() {
        let input = BiometricInput::new(70.0, EstimationMode::BodyFat { body_fat_percent: 15.0 });
        let result = TdeeEstimator::estimate(&input, ActivityLevel::Sedentary, Goal::Maintenance);

        assert_eq!(result.formula, BmrFormula::KatchMcArdle);
        assert!((TdeeEstimator::lean_mass(70.0, 15.0) - 59.5).abs() < 1e-9);
        assert!((result.bmr - 1655.2).abs() < 1e-9);
        assert!((result.total_energy - 1986.24).abs() < 1e-9);
    }

    #[test]
    fn test_activity_and_goal_scaling() {
        let result = TdeeEstimator::estimate(&male_70kg(), ActivityLevel::Athlete, Goal::FatLoss);
        assert!((result.total_energy - 1673.75 * 1.9 * 0.8).abs() < 1e-9);

        let result = TdeeEstimator::estimate(&male_70kg(), ActivityLevel::Moderate, Goal::MuscleGain);
        assert!((result.total_energy - 1673.75 * 1.55 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_macro_split() {
        let macros = TdeeEstimator::macro_split(2008.5);

        assert!((macros.protein_grams - 150.6375).abs() < 1e-9);
        assert!((macros.carb_grams - 200.85).abs() < 1e-9);
        assert!((macros.fat_grams - 66.95).abs() < 1e-9);
    }

    // Property-based tests using proptest
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_standard_path_matches_closed_form(
            weight in 30.0f64..250.0,
            height in 120.0f64..230.0,
            age in 15u32..100,
            female in any::<bool>()
        ) {
            let gender = if female { Gender::Female } else { Gender::Male };
            let input = BiometricInput::standard(weight, height, age, gender);
            let result = TdeeEstimator::estimate(&input, ActivityLevel::Light, Goal::Maintenance);

            let offset = if female { -161.0 } else { 5.0 };
            let expected_bmr = 10.0 * weight + 6.25 * height - 5.0 * age as f64 + offset;

            prop_assert_eq!(result.formula, BmrFormula::MifflinStJeor);
            prop_assert!((result.bmr - expected_bmr).abs() < 1e-9);
            prop_assert!((result.total_energy - expected_bmr * 1.375).abs() < 1e-9);
        }

        #[test]
        fn test_body_fat_in_range_uses_lean_mass(
            weight in 30.0f64..250.0,
            body_fat in 0.01f64..99.99
        ) {
            let standard = StandardMetrics { height_cm: 175.0, age: 30, gender: Gender::Male };
            let mode = EstimationMode::select(Some(body_fat), Some(standard)).unwrap();
            let (bmr, formula) = TdeeEstimator::bmr(&BiometricInput::new(weight, mode));

            prop_assert_eq!(formula, BmrFormula::KatchMcArdle);
            prop_assert!((bmr - (370.0 + 21.6 * weight * (1.0 - body_fat / 100.0))).abs() < 1e-9);
        }

        #[test]
        fn test_macro_calories_sum_to_total(total in 500.0f64..8000.0) {
            let macros = TdeeEstimator::macro_split(total);
            prop_assert!((macros.calories() - total).abs() < 1e-6);
        }
    }
}
