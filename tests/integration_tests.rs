use tdeers::{
    ActivityLevel, BmrFormula, FieldName, FormDefaults, FormFields, Gender, Goal, InputValidator,
    TdeeEstimator, WeightUnit,
};
use tdeers::export::text::render_result;

/// End-to-end tests: raw form values through validation, estimation and display

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn standard_fields() -> FormFields {
        FormFields {
            weight: "70".to_string(),
            height: "175".to_string(),
            age: "25".to_string(),
            body_fat: String::new(),
            gender: Some(Gender::Male),
            activity_level: Some(ActivityLevel::Sedentary),
            goal: Some(Goal::Maintenance),
            weight_unit: WeightUnit::Kilograms,
        }
    }

    fn calculate(fields: &FormFields) -> tdeers::EstimationResult {
        let validated = InputValidator::validate(fields).expect("fields should validate");
        TdeeEstimator::estimate(&validated.input, validated.activity_level, validated.goal)
    }

    /// 70 kg, 175 cm, 25 y, male, sedentary, maintenance
    #[test]
    fn test_standard_scenario() {
        let result = calculate(&standard_fields());

        // 10*70 + 6.25*175 - 5*25 + 5
        assert_eq!(result.formula, BmrFormula::MifflinStJeor);
        assert!((result.bmr - 1673.75).abs() < 1e-9);
        assert!((result.total_energy - 2008.5).abs() < 1e-9);
        assert!((result.macros.protein_grams - 150.6375).abs() < 1e-9);
        assert!((result.macros.carb_grams - 200.85).abs() < 1e-9);
        assert!((result.macros.fat_grams - 66.95).abs() < 1e-9);

        assert_eq!(
            render_result(&result),
            "TDEE: 2008.50 kcal/day\nProtein: 150.6g, Carbs: 200.9g, Fats: 66.9g"
        );
    }

    /// Same person with 15% body fat
    #[test]
    fn test_body_fat_scenario() {
        let fields = FormFields {
            body_fat: "15".to_string(),
            ..standard_fields()
        };
        let result = calculate(&fields);

        assert_eq!(result.formula, BmrFormula::KatchMcArdle);
        assert!((result.bmr - 1655.2).abs() < 1e-9);
        assert!((result.total_energy - 1986.24).abs() < 1e-9);
        assert!(render_result(&result).starts_with("TDEE: 1986.24 kcal/day"));
    }

    /// 150 lb is converted to kilograms before anything is computed
    #[test]
    fn test_pound_scenario() {
        let fields = FormFields {
            weight: "150".to_string(),
            weight_unit: WeightUnit::Pounds,
            ..standard_fields()
        };

        let validated = InputValidator::validate(&fields).unwrap();
        assert!((validated.input.weight_kg - 68.04).abs() < 0.005);

        let result = calculate(&fields);
        let expected_bmr = 10.0 * (150.0 / 2.20462) + 6.25 * 175.0 - 5.0 * 25.0 + 5.0;
        assert!((result.bmr - expected_bmr).abs() < 1e-9);
    }

    #[test]
    fn test_body_fat_boundaries_use_standard_formula() {
        let standard = calculate(&standard_fields());

        for body_fat in ["0", "100"] {
            let fields = FormFields {
                body_fat: body_fat.to_string(),
                ..standard_fields()
            };
            let result = calculate(&fields);

            assert_eq!(result.formula, BmrFormula::MifflinStJeor, "body fat {}", body_fat);
            assert!((result.total_energy - standard.total_energy).abs() < 1e-9);
        }

        let fields = FormFields {
            body_fat: "99.5".to_string(),
            ..standard_fields()
        };
        assert_eq!(calculate(&fields).formula, BmrFormula::KatchMcArdle);
    }

    #[test]
    fn test_validation_gates_estimation() {
        let fields = FormFields {
            weight: String::new(),
            height: String::new(),
            age: String::new(),
            ..standard_fields()
        };

        let err = InputValidator::validate(&fields).unwrap_err();
        assert_eq!(err.missing(), &[FieldName::Weight, FieldName::Height, FieldName::Age]);
        assert_eq!(err.prompt(), "Please enter: Weight, Height, Age");
    }

    #[test]
    fn test_macros_account_for_all_calories() {
        for activity in ActivityLevel::ALL {
            for goal in Goal::ALL {
                let fields = FormFields {
                    activity_level: Some(activity),
                    goal: Some(goal),
                    ..standard_fields()
                };
                let result = calculate(&fields);

                assert!((result.macros.calories() - result.total_energy).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_config_defaults_validate() {
        let fields = FormDefaults::default().to_fields();
        let result = calculate(&fields);
        assert!((result.total_energy - 2008.5).abs() < 1e-9);
    }
}
