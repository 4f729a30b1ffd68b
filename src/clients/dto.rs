use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Request body for registering a client under the calling trainer.
/// Biometrics may be filled in later; the nutrition calculator's pre-flight
/// check tells the UI what is still missing.
#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    pub email: String,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
}

/// Partial profile update.
#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub name: String,
    pub email: String,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    pub calorie_goal_override: Option<i32>,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<super::repo::Client> for ClientResponse {
    fn from(c: super::repo::Client) -> Self {
        Self {
            id: c.id,
            trainer_id: c.trainer_id,
            name: c.name,
            email: c.email,
            weight_kg: c.weight_kg,
            height_cm: c.height_cm,
            age: c.age,
            gender: c.gender,
            activity_level: c.activity_level,
            calorie_goal_override: c.calorie_goal_override,
            status: c.status,
            created_at: c.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn client_response_serialization() {
        let response = ClientResponse {
            id: Uuid::new_v4(),
            trainer_id: Uuid::new_v4(),
            name: "Jamie".into(),
            email: "jamie@example.com".into(),
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            age: Some(30),
            gender: Some("female".into()),
            activity_level: Some("moderate".into()),
            calorie_goal_override: None,
            status: "active".into(),
            created_at: datetime!(2024-03-15 12:00 UTC),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("jamie@example.com"));
        assert!(json.contains("active"));
    }
}
