use serde::{Deserialize, Serialize};

use super::calculator::{MacroBreakdown, MacroDistribution, NutritionInput};

/// Full calculator run: biometrics plus goal labels. `distribution`
/// overrides the goal-derived split when present.
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    #[serde(flatten)]
    pub biometrics: NutritionInput,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub weight_goal: Option<String>,
    pub rate: Option<String>,
    pub distribution: Option<MacroDistribution>,
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub bmr: i32,
    pub tdee: i32,
    pub target_calories: i32,
    pub distribution: MacroDistribution,
    pub macros: MacroBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_flattens_biometrics() {
        let req: CalculateRequest = serde_json::from_str(
            r#"{
                "weight_kg": 70,
                "height_cm": 175,
                "age": 30,
                "gender": "male",
                "activity_level": "light",
                "goal": "weight_loss",
                "weight_goal": "lose",
                "rate": "moderate"
            }"#,
        )
        .expect("deserialize");
        assert_eq!(req.biometrics.weight_kg, Some(70.0));
        assert_eq!(req.goal.as_deref(), Some("weight_loss"));
        assert!(req.distribution.is_none());
    }

    #[test]
    fn response_serialization() {
        let response = CalculateResponse {
            bmr: 1649,
            tdee: 2267,
            target_calories: 1767,
            distribution: MacroDistribution::default(),
            macros: MacroBreakdown {
                protein_g: 133,
                carbs_g: 177,
                fat_g: 59,
            },
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("target_calories"));
        assert!(json.contains("1649"));
    }
}
