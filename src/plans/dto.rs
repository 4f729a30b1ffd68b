use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub description: Option<String>,
    pub daily_calories: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Absent leaves the value untouched; an explicit `null` clears it, so
    /// a plan can stop dictating the calorie goal without being deleted.
    #[serde(default, deserialize_with = "some_if_present")]
    pub daily_calories: Option<Option<i32>>,
}

// Distinguishes a missing field (outer None) from an explicit null
// (Some(None)), which plain Option<Option<T>> cannot.
fn some_if_present<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<i32>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct AssignPlanRequest {
    pub plan_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub client_id: Uuid,
    pub plan_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub assigned_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn update_plan_distinguishes_absent_from_null_calories() {
        let absent: UpdatePlanRequest =
            serde_json::from_str(r#"{"name": "Cut"}"#).expect("deserialize");
        assert_eq!(absent.daily_calories, None);

        let cleared: UpdatePlanRequest =
            serde_json::from_str(r#"{"daily_calories": null}"#).expect("deserialize");
        assert_eq!(cleared.daily_calories, Some(None));

        let set: UpdatePlanRequest =
            serde_json::from_str(r#"{"daily_calories": 1800}"#).expect("deserialize");
        assert_eq!(set.daily_calories, Some(Some(1800)));
    }

    #[test]
    fn assignment_response_serialization() {
        let response = AssignmentResponse {
            client_id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            assigned_at: datetime!(2024-03-15 12:00 UTC),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("plan_id"));
        assert!(json.contains("2024-03-15"));
    }
}
