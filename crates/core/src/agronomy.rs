//! Planting geometry and input-dose calculators.
//!
//! Fields are rhombus shaped; the planting plan derives area, row count,
//! usable area, and the total input dose from the two diagonals and a
//! per-square-metre dosage.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Row spacing for coffee fields, in metres.
pub const COFFEE_ROW_SPACING_M: f64 = 3.6;

/// Row spacing for sugarcane fields, in metres.
pub const SUGARCANE_ROW_SPACING_M: f64 = 1.5;

/// Supported crops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crop {
    Coffee,
    Sugarcane,
}

impl Crop {
    /// Stable lowercase name for log fields and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Crop::Coffee => "coffee",
            Crop::Sugarcane => "sugarcane",
        }
    }

    /// Row spacing used when laying out this crop.
    pub fn row_spacing_m(&self) -> f64 {
        match self {
            Crop::Coffee => COFFEE_ROW_SPACING_M,
            Crop::Sugarcane => SUGARCANE_ROW_SPACING_M,
        }
    }

    /// Input products recommended for this crop.
    pub fn suggested_inputs(&self) -> &'static [&'static str] {
        match self {
            Crop::Coffee => &[
                "Monoammonium phosphate (MAP)",
                "Ammonium sulfate",
                "Dolomitic limestone",
            ],
            Crop::Sugarcane => &["Urea", "Potassium chloride", "Single superphosphate"],
        }
    }
}

impl std::fmt::Display for Crop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Area of a rhombus-shaped field from its diagonals, in square metres.
pub fn rhombus_area(diagonal_major_m: f64, diagonal_minor_m: f64) -> f64 {
    (diagonal_major_m * diagonal_minor_m) / 2.0
}

/// Number of planting rows along the major diagonal.
pub fn row_count(diagonal_major_m: f64, row_spacing_m: f64) -> u32 {
    (diagonal_major_m / row_spacing_m).round() as u32
}

/// Area left for planting after subtracting the row lanes, clamped at zero.
pub fn usable_area(area_m2: f64, rows: u32, row_spacing_m: f64) -> f64 {
    (area_m2 - f64::from(rows) * row_spacing_m).max(0.0)
}

/// Total input required for the usable area, rounded to whole units.
pub fn total_input(usable_area_m2: f64, dose_per_m2: f64) -> f64 {
    (usable_area_m2 * dose_per_m2).round()
}

/// The full set of derived planting figures for one field.
#[derive(Debug, Clone, Serialize)]
pub struct PlantingPlan {
    pub crop: Crop,
    pub diagonal_major_m: f64,
    pub diagonal_minor_m: f64,
    pub area_m2: f64,
    pub row_spacing_m: f64,
    pub row_count: u32,
    pub usable_area_m2: f64,
    pub dose_per_m2: f64,
    pub total_input: f64,
    pub suggested_inputs: Vec<&'static str>,
}

/// Compute the complete planting plan for a field.
pub fn plan(
    crop: Crop,
    diagonal_major_m: f64,
    diagonal_minor_m: f64,
    dose_per_m2: f64,
) -> Result<PlantingPlan, CoreError> {
    if !diagonal_major_m.is_finite() || !diagonal_minor_m.is_finite() || !dose_per_m2.is_finite() {
        return Err(CoreError::validation("planting inputs must be finite"));
    }
    if diagonal_major_m <= 0.0 || diagonal_minor_m <= 0.0 {
        return Err(CoreError::validation("field diagonals must be positive"));
    }
    if dose_per_m2 < 0.0 {
        return Err(CoreError::validation("dose_per_m2 must not be negative"));
    }

    let area_m2 = rhombus_area(diagonal_major_m, diagonal_minor_m);
    let row_spacing_m = crop.row_spacing_m();
    let rows = row_count(diagonal_major_m, row_spacing_m);
    let usable_area_m2 = usable_area(area_m2, rows, row_spacing_m);

    Ok(PlantingPlan {
        crop,
        diagonal_major_m,
        diagonal_minor_m,
        area_m2,
        row_spacing_m,
        row_count: rows,
        usable_area_m2,
        dose_per_m2,
        total_input: total_input(usable_area_m2, dose_per_m2),
        suggested_inputs: crop.suggested_inputs().to_vec(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_of_reference_field() {
        // Diagonals 100 m and 80 m give 4000 m².
        assert_eq!(rhombus_area(100.0, 80.0), 4000.0);
    }

    #[test]
    fn row_count_rounds_to_nearest() {
        // 100 / 3.6 = 27.78 -> 28 rows.
        assert_eq!(row_count(100.0, COFFEE_ROW_SPACING_M), 28);
        // 90 / 1.5 = 60 exactly.
        assert_eq!(row_count(90.0, SUGARCANE_ROW_SPACING_M), 60);
    }

    #[test]
    fn usable_area_clamps_at_zero() {
        assert_eq!(usable_area(10.0, 100, 3.6), 0.0);
    }

    #[test]
    fn coffee_plan_matches_reference_figures() {
        let plan = plan(Crop::Coffee, 100.0, 80.0, 0.5).unwrap();
        assert_eq!(plan.area_m2, 4000.0);
        assert_eq!(plan.row_spacing_m, 3.6);
        assert_eq!(plan.row_count, 28);
        // 4000 - 28 * 3.6 = 3899.2; 3899.2 * 0.5 rounds to 1950.
        assert!((plan.usable_area_m2 - 3899.2).abs() < 1e-9);
        assert_eq!(plan.total_input, 1950.0);
        assert_eq!(plan.suggested_inputs.len(), 3);
    }

    #[test]
    fn sugarcane_plan_uses_narrow_spacing() {
        let plan = plan(Crop::Sugarcane, 60.0, 40.0, 1.0).unwrap();
        assert_eq!(plan.row_spacing_m, 1.5);
        assert_eq!(plan.row_count, 40);
        assert_eq!(plan.suggested_inputs[0], "Urea");
    }

    #[test]
    fn plan_rejects_non_positive_diagonals() {
        assert!(plan(Crop::Coffee, 0.0, 80.0, 0.5).is_err());
        assert!(plan(Crop::Coffee, 100.0, -1.0, 0.5).is_err());
    }

    #[test]
    fn plan_rejects_negative_dose() {
        assert!(plan(Crop::Sugarcane, 100.0, 80.0, -0.1).is_err());
    }
}
