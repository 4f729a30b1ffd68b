use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Allowed lifecycle states; clients are never hard-deleted, the status
/// flips instead.
pub const CLIENT_STATUSES: [&str; 3] = ["active", "inactive", "suspended"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
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

impl Client {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        trainer_id: Uuid,
        name: &str,
        email: &str,
        weight_kg: Option<f64>,
        height_cm: Option<f64>,
        age: Option<i32>,
        gender: Option<&str>,
        activity_level: Option<&str>,
    ) -> anyhow::Result<Client> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients
                (trainer_id, name, email, weight_kg, height_cm, age, gender, activity_level)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, trainer_id, name, email, weight_kg, height_cm, age, gender,
                      activity_level, calorie_goal_override, status, created_at
            "#,
        )
        .bind(trainer_id)
        .bind(name)
        .bind(email)
        .bind(weight_kg)
        .bind(height_cm)
        .bind(age)
        .bind(gender)
        .bind(activity_level)
        .fetch_one(db)
        .await?;
        Ok(client)
    }

    pub async fn list_by_trainer(db: &PgPool, trainer_id: Uuid) -> anyhow::Result<Vec<Client>> {
        let rows = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, trainer_id, name, email, weight_kg, height_cm, age, gender,
                   activity_level, calorie_goal_override, status, created_at
            FROM clients
            WHERE trainer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(trainer_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, trainer_id, name, email, weight_kg, height_cm, age, gender,
                   activity_level, calorie_goal_override, status, created_at
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(client)
    }

    /// Partial profile update; absent fields keep their stored value.
    /// Nullable profile columns can only be replaced here, not cleared.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        weight_kg: Option<f64>,
        height_cm: Option<f64>,
        age: Option<i32>,
        gender: Option<&str>,
        activity_level: Option<&str>,
    ) -> anyhow::Result<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                weight_kg = COALESCE($4, weight_kg),
                height_cm = COALESCE($5, height_cm),
                age = COALESCE($6, age),
                gender = COALESCE($7, gender),
                activity_level = COALESCE($8, activity_level)
            WHERE id = $1
            RETURNING id, trainer_id, name, email, weight_kg, height_cm, age, gender,
                      activity_level, calorie_goal_override, status, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(weight_kg)
        .bind(height_cm)
        .bind(age)
        .bind(gender)
        .bind(activity_level)
        .fetch_optional(db)
        .await?;
        Ok(client)
    }

    /// Lifecycle transition; the only "delete" the platform supports.
    pub async fn set_status(db: &PgPool, id: Uuid, status: &str) -> anyhow::Result<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET status = $2
            WHERE id = $1
            RETURNING id, trainer_id, name, email, weight_kg, height_cm, age, gender,
                      activity_level, calorie_goal_override, status, created_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(db)
        .await?;
        Ok(client)
    }
}
