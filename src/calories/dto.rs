use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Request body for creating a food entry. `is_included_in_calories`
/// defaults to true; that default is also the column default, so both write
/// boundaries agree.
#[derive(Debug, Deserialize)]
pub struct CreateFoodEntryRequest {
    pub description: String,
    pub calories: i32,
    pub meal_type: Option<String>,
    #[serde(default = "default_included")]
    pub is_included_in_calories: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub logged_at: Option<OffsetDateTime>,
}

fn default_included() -> bool {
    true
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateFoodEntryRequest {
    pub description: Option<String>,
    pub calories: Option<i32>,
    pub meal_type: Option<String>,
    pub is_included_in_calories: Option<bool>,
}

/// Trainer correction: override the logged calories and/or toggle inclusion
/// without rewriting the entry.
#[derive(Debug, Deserialize)]
pub struct PatchFoodCaloriesRequest {
    pub calories: Option<i32>,
    pub is_included_in_calories: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCustomEntryRequest {
    pub description: String,
    pub calories: i32,
    pub meal_type: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub logged_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCustomEntryRequest {
    pub description: Option<String>,
    pub calories: Option<i32>,
    pub meal_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetGoalRequest {
    pub goal: i32,
}

#[derive(Debug, Serialize)]
pub struct GoalResponse {
    pub goal: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn food_entry_inclusion_defaults_to_true() {
        let req: CreateFoodEntryRequest =
            serde_json::from_str(r#"{"description": "oatmeal", "calories": 350}"#)
                .expect("deserialize");
        assert!(req.is_included_in_calories);
        assert!(req.logged_at.is_none());
    }

    #[test]
    fn food_entry_inclusion_can_be_opted_out() {
        let req: CreateFoodEntryRequest = serde_json::from_str(
            r#"{"description": "tasting", "calories": 90, "is_included_in_calories": false}"#,
        )
        .expect("deserialize");
        assert!(!req.is_included_in_calories);
    }

    #[test]
    fn goal_response_serialization() {
        let json = serde_json::to_string(&GoalResponse { goal: 2000 }).unwrap();
        assert!(json.contains("2000"));
        assert!(json.contains("goal"));
    }
}
