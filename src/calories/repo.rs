use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// A logged meal/food item for a client. `is_included_in_calories` controls
/// whether it counts toward the daily total.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodEntry {
    pub id: Uuid,
    pub client_id: Uuid,
    pub description: String,
    pub calories: i32,
    pub meal_type: Option<String>,
    pub is_included_in_calories: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
}

/// A manually entered calorie record. Always counts toward the daily total;
/// there is no opt-out flag.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomCalorieEntry {
    pub id: Uuid,
    pub client_id: Uuid,
    pub description: String,
    pub calories: i32,
    pub meal_type: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
}

/// UTC day window for a calendar date, built fresh per call: half-open
/// `[00:00 of date, 00:00 of the next day)`.
pub fn day_window(date: Date) -> (OffsetDateTime, OffsetDateTime) {
    let start = date.midnight().assume_utc();
    (start, start + time::Duration::days(1))
}

impl FoodEntry {
    pub async fn create(
        db: &PgPool,
        client_id: Uuid,
        description: &str,
        calories: i32,
        meal_type: Option<&str>,
        is_included_in_calories: bool,
        logged_at: OffsetDateTime,
    ) -> anyhow::Result<FoodEntry> {
        let row = sqlx::query_as::<_, FoodEntry>(
            r#"
            INSERT INTO food_entries
                (client_id, description, calories, meal_type, is_included_in_calories, logged_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, client_id, description, calories, meal_type,
                      is_included_in_calories, logged_at
            "#,
        )
        .bind(client_id)
        .bind(description)
        .bind(calories)
        .bind(meal_type)
        .bind(is_included_in_calories)
        .bind(logged_at)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Partial update; absent fields keep their stored value. Lets a trainer
    /// override `calories` or flip `is_included_in_calories` without
    /// rewriting the original log. COALESCE means `meal_type` cannot be
    /// cleared through this path, only replaced.
    pub async fn update(
        db: &PgPool,
        client_id: Uuid,
        id: Uuid,
        description: Option<&str>,
        calories: Option<i32>,
        meal_type: Option<&str>,
        is_included_in_calories: Option<bool>,
    ) -> anyhow::Result<Option<FoodEntry>> {
        let row = sqlx::query_as::<_, FoodEntry>(
            r#"
            UPDATE food_entries
            SET description = COALESCE($3, description),
                calories = COALESCE($4, calories),
                meal_type = COALESCE($5, meal_type),
                is_included_in_calories = COALESCE($6, is_included_in_calories)
            WHERE id = $2 AND client_id = $1
            RETURNING id, client_id, description, calories, meal_type,
                      is_included_in_calories, logged_at
            "#,
        )
        .bind(client_id)
        .bind(id)
        .bind(description)
        .bind(calories)
        .bind(meal_type)
        .bind(is_included_in_calories)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, client_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM food_entries WHERE id = $1 AND client_id = $2"#)
            .bind(id)
            .bind(client_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_day(
        db: &PgPool,
        client_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Vec<FoodEntry>> {
        let (start, end) = day_window(date);
        let rows = sqlx::query_as::<_, FoodEntry>(
            r#"
            SELECT id, client_id, description, calories, meal_type,
                   is_included_in_calories, logged_at
            FROM food_entries
            WHERE client_id = $1 AND logged_at >= $2 AND logged_at < $3
            ORDER BY logged_at DESC
            "#,
        )
        .bind(client_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

impl CustomCalorieEntry {
    pub async fn create(
        db: &PgPool,
        client_id: Uuid,
        description: &str,
        calories: i32,
        meal_type: Option<&str>,
        logged_at: OffsetDateTime,
    ) -> anyhow::Result<CustomCalorieEntry> {
        let row = sqlx::query_as::<_, CustomCalorieEntry>(
            r#"
            INSERT INTO custom_calorie_entries
                (client_id, description, calories, meal_type, logged_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, client_id, description, calories, meal_type, logged_at
            "#,
        )
        .bind(client_id)
        .bind(description)
        .bind(calories)
        .bind(meal_type)
        .bind(logged_at)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Partial update; absent fields keep their stored value. `meal_type`
    /// can only be replaced here, not cleared.
    pub async fn update(
        db: &PgPool,
        client_id: Uuid,
        id: Uuid,
        description: Option<&str>,
        calories: Option<i32>,
        meal_type: Option<&str>,
    ) -> anyhow::Result<Option<CustomCalorieEntry>> {
        let row = sqlx::query_as::<_, CustomCalorieEntry>(
            r#"
            UPDATE custom_calorie_entries
            SET description = COALESCE($3, description),
                calories = COALESCE($4, calories),
                meal_type = COALESCE($5, meal_type)
            WHERE id = $2 AND client_id = $1
            RETURNING id, client_id, description, calories, meal_type, logged_at
            "#,
        )
        .bind(client_id)
        .bind(id)
        .bind(description)
        .bind(calories)
        .bind(meal_type)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, client_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result =
            sqlx::query(r#"DELETE FROM custom_calorie_entries WHERE id = $1 AND client_id = $2"#)
                .bind(id)
                .bind(client_id)
                .execute(db)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_day(
        db: &PgPool,
        client_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Vec<CustomCalorieEntry>> {
        let (start, end) = day_window(date);
        let rows = sqlx::query_as::<_, CustomCalorieEntry>(
            r#"
            SELECT id, client_id, description, calories, meal_type, logged_at
            FROM custom_calorie_entries
            WHERE client_id = $1 AND logged_at >= $2 AND logged_at < $3
            ORDER BY logged_at DESC
            "#,
        )
        .bind(client_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn day_window_is_half_open_over_utc() {
        let (start, end) = day_window(date!(2024 - 03 - 15));
        assert_eq!(start, datetime!(2024-03-15 00:00 UTC));
        assert_eq!(end, datetime!(2024-03-16 00:00 UTC));
    }

    #[test]
    fn day_window_is_rebuilt_per_call() {
        let a = day_window(date!(2024 - 03 - 15));
        let b = day_window(date!(2024 - 03 - 15));
        assert_eq!(a, b);
        let next = day_window(date!(2024 - 03 - 16));
        assert_eq!(next.0, a.1);
    }

    #[test]
    fn food_entry_timestamp_serializes_as_rfc3339() {
        let entry = FoodEntry {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            description: "oatmeal".into(),
            calories: 350,
            meal_type: Some("breakfast".into()),
            is_included_in_calories: true,
            logged_at: datetime!(2024-03-15 12:00 UTC),
        };
        let json = serde_json::to_value(&entry).expect("serialize");
        // same wire format as the summary items, not time's component tuple
        assert_eq!(json["logged_at"], "2024-03-15T12:00:00Z");
    }

    #[test]
    fn custom_entry_timestamp_serializes_as_rfc3339() {
        let entry = CustomCalorieEntry {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            description: "protein shake".into(),
            calories: 200,
            meal_type: None,
            logged_at: datetime!(2024-03-15 12:00 UTC),
        };
        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json["logged_at"], "2024-03-15T12:00:00Z");
    }
}
