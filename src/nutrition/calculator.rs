//! Pure nutrition math: BMR (Mifflin-St Jeor), TDEE, macro breakdowns and
//! caloric adjustments. No I/O; everything here is deterministic over its
//! arguments.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calories per gram of protein and carbohydrate.
pub const KCAL_PER_G_PROTEIN_CARB: f64 = 4.0;

/// Calories per gram of fat.
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Multiplier applied when an activity label is not recognized (moderate tier).
pub const DEFAULT_ACTIVITY_MULTIPLIER: f64 = 1.55;

/// Allowed drift when checking that a distribution sums to 1.0.
pub const DISTRIBUTION_TOLERANCE: f64 = 0.01;

#[derive(Debug, Error, PartialEq)]
pub enum NutritionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid macro distribution: {0}")]
    InvalidDistribution(String),
}

/// Macro split as fractions of total calories. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroDistribution {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Default for MacroDistribution {
    fn default() -> Self {
        // 30/40/30, the maintenance split
        Self {
            protein: 0.30,
            carbs: 0.40,
            fat: 0.30,
        }
    }
}

/// Grams per macro for a given calorie target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroBreakdown {
    pub protein_g: i32,
    pub carbs_g: i32,
    pub fat_g: i32,
}

lazy_static! {
    /// Activity label → TDEE multiplier. Two synonym sets map onto the same
    /// five tiers; lookups go through `activity_multiplier`, which falls back
    /// to the moderate tier for anything not in this table.
    static ref ACTIVITY_MULTIPLIERS: HashMap<&'static str, f64> = HashMap::from([
        ("sedentary", 1.2),
        ("light", 1.375),
        ("lightly_active", 1.375),
        ("moderate", 1.55),
        ("moderately_active", 1.55),
        ("active", 1.725),
        ("very_active", 1.9),
        ("extra_active", 1.9),
    ]);

    /// Goal label → recommended macro split. Unknown labels resolve to
    /// maintenance.
    static ref MACRO_DISTRIBUTIONS: HashMap<&'static str, MacroDistribution> = HashMap::from([
        ("weight_loss", MacroDistribution { protein: 0.35, carbs: 0.35, fat: 0.30 }),
        ("muscle_gain", MacroDistribution { protein: 0.30, carbs: 0.45, fat: 0.25 }),
        ("maintenance", MacroDistribution { protein: 0.30, carbs: 0.40, fat: 0.30 }),
        ("endurance", MacroDistribution { protein: 0.25, carbs: 0.50, fat: 0.25 }),
        ("strength", MacroDistribution { protein: 0.35, carbs: 0.40, fat: 0.25 }),
    ]);

    /// (weight goal, rate) → daily calorie offset. "maintain" is always 0,
    /// whatever the rate.
    static ref CALORIC_ADJUSTMENTS: HashMap<&'static str, HashMap<&'static str, i32>> =
        HashMap::from([
            ("lose", HashMap::from([("slow", -250), ("moderate", -500), ("fast", -750)])),
            ("gain", HashMap::from([("slow", 250), ("moderate", 500), ("fast", 750)])),
            ("maintain", HashMap::from([("slow", 0), ("moderate", 0), ("fast", 0)])),
        ]);
}

fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Basal metabolic rate per Mifflin-St Jeor, rounded to whole calories.
///
/// `base = 10*weight + 6.25*height - 5*age`, then `+5` for male and `-161`
/// otherwise. Weight in kg, height in cm, age in years; all must be positive.
pub fn calculate_bmr(
    weight_kg: f64,
    height_cm: f64,
    age_years: f64,
    gender: &str,
) -> Result<i32, NutritionError> {
    if weight_kg <= 0.0 {
        return Err(NutritionError::InvalidInput(
            "weight must be positive".into(),
        ));
    }
    if height_cm <= 0.0 {
        return Err(NutritionError::InvalidInput(
            "height must be positive".into(),
        ));
    }
    if age_years <= 0.0 {
        return Err(NutritionError::InvalidInput("age must be positive".into()));
    }
    if gender.trim().is_empty() {
        return Err(NutritionError::InvalidInput("gender is required".into()));
    }

    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years;
    let bmr = if normalize_label(gender) == "male" {
        base + 5.0
    } else {
        base - 161.0
    };
    Ok(bmr.round() as i32)
}

/// Multiplier for an activity label; unknown labels take the moderate tier
/// rather than erroring, since these come from user-editable dropdowns.
pub fn activity_multiplier(label: &str) -> f64 {
    ACTIVITY_MULTIPLIERS
        .get(normalize_label(label).as_str())
        .copied()
        .unwrap_or(DEFAULT_ACTIVITY_MULTIPLIER)
}

/// Total daily energy expenditure: `round(bmr * multiplier)`.
pub fn calculate_tdee(bmr: i32, activity_level: &str) -> i32 {
    (f64::from(bmr) * activity_multiplier(activity_level)).round() as i32
}

/// Splits a calorie target into grams of protein/carbs/fat.
pub fn calculate_macros(
    calories: i32,
    distribution: &MacroDistribution,
) -> Result<MacroBreakdown, NutritionError> {
    if calories <= 0 {
        return Err(NutritionError::InvalidDistribution(
            "calories must be positive".into(),
        ));
    }
    let sum = distribution.protein + distribution.carbs + distribution.fat;
    if (sum - 1.0).abs() > DISTRIBUTION_TOLERANCE {
        return Err(NutritionError::InvalidDistribution(format!(
            "percentages sum to {sum:.2}, expected 1.00"
        )));
    }

    let calories = f64::from(calories);
    Ok(MacroBreakdown {
        protein_g: (calories * distribution.protein / KCAL_PER_G_PROTEIN_CARB).round() as i32,
        carbs_g: (calories * distribution.carbs / KCAL_PER_G_PROTEIN_CARB).round() as i32,
        fat_g: (calories * distribution.fat / KCAL_PER_G_FAT).round() as i32,
    })
}

/// Recommended macro split for a goal label; unknown labels fall back to
/// maintenance.
pub fn recommended_distribution(goal: &str) -> MacroDistribution {
    MACRO_DISTRIBUTIONS
        .get(normalize_label(goal).as_str())
        .copied()
        .unwrap_or_default()
}

/// Daily calorie target for a weight goal: TDEE plus a fixed offset keyed by
/// (goal, rate). Unknown rate takes the moderate offset; unknown goal means
/// maintain, so no adjustment.
pub fn caloric_adjustment(tdee: i32, weight_goal: &str, rate: &str) -> i32 {
    let offset = CALORIC_ADJUSTMENTS
        .get(normalize_label(weight_goal).as_str())
        .map(|rates| {
            rates
                .get(normalize_label(rate).as_str())
                .copied()
                .unwrap_or_else(|| rates["moderate"])
        })
        .unwrap_or(0);
    tdee + offset
}

/// Biometric fields as they arrive from the client, before validation.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NutritionInput {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<f64>,
    pub gender: Option<String>,
}

/// Outcome of the pre-flight presence check. Never errors; callers decide
/// what to do with an incomplete profile.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub missing_fields: Vec<&'static str>,
}

/// Checks that every field needed for a BMR/TDEE run is present and usable.
pub fn validate_nutrition_data(input: &NutritionInput) -> ValidationReport {
    let mut missing = Vec::new();
    if !input.weight_kg.is_some_and(|v| v > 0.0) {
        missing.push("weight_kg");
    }
    if !input.height_cm.is_some_and(|v| v > 0.0) {
        missing.push("height_cm");
    }
    if !input.age.is_some_and(|v| v > 0.0) {
        missing.push("age");
    }
    if !input
        .gender
        .as_deref()
        .is_some_and(|g| !g.trim().is_empty())
    {
        missing.push("gender");
    }
    ValidationReport {
        valid: missing.is_empty(),
        missing_fields: missing,
    }
}
