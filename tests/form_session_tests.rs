//! Integration tests for the interactive form
//!
//! Drives `FormSession` with scripted input and checks what the user sees.

use tdeers::{BmrFormula, FormDefaults, FormSession, FormState, WeightUnit};

fn run_script(script: &str) -> (FormState, String) {
    let mut output = Vec::new();
    let mut session = FormSession::new(
        FormState::new(&FormDefaults::default()),
        script.as_bytes(),
        &mut output,
    );
    session.run().unwrap();
    let state = session.state().clone();

    (state, String::from_utf8(output).unwrap())
}

#[test]
fn test_initial_form_shows_standard_fields() {
    let (_, output) = run_script("quit\n");

    assert!(output.contains("TDEE Calculator"));
    assert!(output.contains("Weight (kg): 70"));
    assert!(output.contains("Height (cm): 175"));
    assert!(output.contains("Age (years): 25"));
    assert!(output.contains("Gender: [Male] Female"));
    assert!(output.contains("Activity Level: Sedentary"));
    assert!(output.contains("Goal: Maintenance"));
}

#[test]
fn test_default_calculation() {
    let (state, output) = run_script("calc\n");

    assert!(state.result().is_some());
    assert!(output.contains("TDEE: 2008.50 kcal/day"));
    assert!(output.contains("Protein: 150.6g, Carbs: 200.9g, Fats: 66.9g"));
}

#[test]
fn test_body_fat_entry_hides_fields_and_switches_formula() {
    let (state, output) = run_script("bodyfat 15\ncalc\nquit\n");

    let redraw = output
        .rsplit("TDEE Calculator")
        .next()
        .unwrap();
    assert!(!redraw.contains("Height (cm)"));
    assert!(!redraw.contains("Gender:"));
    assert!(redraw.contains("Body Fat % (optional): 15"));

    assert_eq!(state.result().unwrap().formula, BmrFormula::KatchMcArdle);
    assert!(output.contains("TDEE: 1986.24 kcal/day"));
}

#[test]
fn test_rejected_entries_are_reported() {
    let (state, output) = run_script("weight -3\nage abc\nquit\n");

    assert!(output.contains("Ignored '-3'"));
    assert!(output.contains("Ignored 'abc'"));
    assert_eq!(state.fields().weight, "70");
    assert_eq!(state.fields().age, "25");
}

#[test]
fn test_missing_fields_prompt() {
    let (state, output) = run_script("weight\nheight\nage\ncalc\n");

    assert!(output.contains("Please enter: Weight, Height, Age"));
    assert!(state.result().is_none());
    assert_eq!(state.error().unwrap().labels(), vec!["Weight", "Height", "Age"]);
}

#[test]
fn test_pound_entry() {
    let (state, output) = run_script("unit\nweight 150\ncalc\n");

    assert!(output.contains("Weight unit: lbs"));
    assert_eq!(state.fields().weight_unit, WeightUnit::Pounds);

    let expected_bmr = 10.0 * (150.0 / 2.20462) + 6.25 * 175.0 - 5.0 * 25.0 + 5.0;
    assert!((state.result().unwrap().bmr - expected_bmr).abs() < 1e-9);
}

#[test]
fn test_unknown_commands_do_not_stop_the_session() {
    let (state, output) = run_script("dance\ngoal bulk\ngoal muscle gain\ncalc\n");

    assert!(output.contains("Unknown command: dance"));
    assert!(output.contains("'bulk' is not a valid goal"));
    assert!((state.result().unwrap().total_energy - 1673.75 * 1.2 * 1.2).abs() < 1e-9);
}
