use super::ExportError;
use crate::models::EstimationResult;
use rust_decimal::{Decimal, RoundingStrategy};
use std::io::Write;
use std::path::Path;

/// Decimal places for total energy
pub const ENERGY_DECIMALS: u32 = 2;
/// Decimal places for macro grams
pub const MACRO_DECIMALS: u32 = 1;

/// Format a value to a fixed number of decimal places.
///
/// Rounds the exact binary value, with exact midpoints going away from zero.
pub fn format_fixed(value: f64, decimal_places: u32) -> String {
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let mut rounded =
                exact.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(decimal_places);
            rounded.to_string()
        }
        None => format!("{:.*}", decimal_places as usize, value),
    }
}

/// The two result lines shown under the form
pub fn render_result(result: &EstimationResult) -> String {
    format!(
        "TDEE: {} kcal/day\nProtein: {}g, Carbs: {}g, Fats: {}g",
        format_fixed(result.total_energy, ENERGY_DECIMALS),
        format_fixed(result.macros.protein_grams, MACRO_DECIMALS),
        format_fixed(result.macros.carb_grams, MACRO_DECIMALS),
        format_fixed(result.macros.fat_grams, MACRO_DECIMALS),
    )
}

/// Result lines preceded by how they were derived
pub fn render_report(result: &EstimationResult) -> String {
    format!(
        "Formula: {}\nBMR: {} kcal/day\nActivity Level: {}\nGoal: {}\n{}",
        result.formula,
        format_fixed(result.bmr, ENERGY_DECIMALS),
        result.activity_level,
        result.goal,
        render_result(result),
    )
}

/// Export an estimate to a human-readable text file
pub fn export_report<P: AsRef<Path>>(
    result: &EstimationResult,
    output_path: P,
) -> Result<(), ExportError> {
    let mut file = std::fs::File::create(output_path)?;
    writeln!(file, "{}", render_report(result))?;
    Ok(())
}
