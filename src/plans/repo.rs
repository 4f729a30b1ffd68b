use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// A trainer-owned plan. `daily_calories`, when set, takes precedence as the
/// assigned client's calorie goal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainingPlan {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub daily_calories: Option<i32>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanAssignment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub plan_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub assigned_at: OffsetDateTime,
}

impl TrainingPlan {
    pub async fn create(
        db: &PgPool,
        trainer_id: Uuid,
        name: &str,
        description: Option<&str>,
        daily_calories: Option<i32>,
    ) -> anyhow::Result<TrainingPlan> {
        let plan = sqlx::query_as::<_, TrainingPlan>(
            r#"
            INSERT INTO training_plans (trainer_id, name, description, daily_calories)
            VALUES ($1, $2, $3, $4)
            RETURNING id, trainer_id, name, description, daily_calories, created_at
            "#,
        )
        .bind(trainer_id)
        .bind(name)
        .bind(description)
        .bind(daily_calories)
        .fetch_one(db)
        .await?;
        Ok(plan)
    }

    pub async fn list_by_trainer(
        db: &PgPool,
        trainer_id: Uuid,
    ) -> anyhow::Result<Vec<TrainingPlan>> {
        let rows = sqlx::query_as::<_, TrainingPlan>(
            r#"
            SELECT id, trainer_id, name, description, daily_calories, created_at
            FROM training_plans
            WHERE trainer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(trainer_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<TrainingPlan>> {
        let plan = sqlx::query_as::<_, TrainingPlan>(
            r#"
            SELECT id, trainer_id, name, description, daily_calories, created_at
            FROM training_plans
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(plan)
    }

    /// Partial update. `daily_calories` is double-optional: outer `None`
    /// keeps the stored value, `Some(None)` clears it so the plan stops
    /// supplying a calorie goal.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        daily_calories: Option<Option<i32>>,
    ) -> anyhow::Result<Option<TrainingPlan>> {
        let plan = sqlx::query_as::<_, TrainingPlan>(
            r#"
            UPDATE training_plans
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                daily_calories = CASE WHEN $4 THEN $5 ELSE daily_calories END
            WHERE id = $1
            RETURNING id, trainer_id, name, description, daily_calories, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(daily_calories.is_some())
        .bind(daily_calories.flatten())
        .fetch_optional(db)
        .await?;
        Ok(plan)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM training_plans WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The plan currently assigned to a client, if any. At most one
    /// assignment row exists per client, so fetch_optional is exact.
    pub async fn active_for_client(
        db: &PgPool,
        client_id: Uuid,
    ) -> anyhow::Result<Option<TrainingPlan>> {
        let plan = sqlx::query_as::<_, TrainingPlan>(
            r#"
            SELECT p.id, p.trainer_id, p.name, p.description, p.daily_calories, p.created_at
            FROM plan_assignments a
            JOIN training_plans p ON p.id = a.plan_id
            WHERE a.client_id = $1
            "#,
        )
        .bind(client_id)
        .fetch_optional(db)
        .await?;
        Ok(plan)
    }
}

impl PlanAssignment {
    /// Replace semantics: one transaction deletes any prior assignment rows
    /// for the client before inserting the new one, so a concurrent read
    /// never observes zero or two active rows mid-swap. Calling this twice
    /// in a row still leaves exactly one row.
    pub async fn replace_for_client(
        db: &PgPool,
        client_id: Uuid,
        plan_id: Uuid,
    ) -> anyhow::Result<PlanAssignment> {
        let mut tx = db.begin().await?;

        sqlx::query(r#"DELETE FROM plan_assignments WHERE client_id = $1"#)
            .bind(client_id)
            .execute(&mut *tx)
            .await?;

        let assignment = sqlx::query_as::<_, PlanAssignment>(
            r#"
            INSERT INTO plan_assignments (client_id, plan_id)
            VALUES ($1, $2)
            RETURNING id, client_id, plan_id, assigned_at
            "#,
        )
        .bind(client_id)
        .bind(plan_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(assignment)
    }

    /// Clears the client's active assignment. Idempotent.
    pub async fn remove_for_client(db: &PgPool, client_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM plan_assignments WHERE client_id = $1"#)
            .bind(client_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn plan_timestamp_serializes_as_rfc3339() {
        let plan = TrainingPlan {
            id: Uuid::new_v4(),
            trainer_id: Uuid::new_v4(),
            name: "Spring cut".into(),
            description: None,
            daily_calories: Some(1800),
            created_at: datetime!(2024-03-15 12:00 UTC),
        };
        let json = serde_json::to_value(&plan).expect("serialize");
        assert_eq!(json["created_at"], "2024-03-15T12:00:00Z");
    }

    #[test]
    fn assignment_timestamp_serializes_as_rfc3339() {
        let assignment = PlanAssignment {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            assigned_at: datetime!(2024-03-15 12:00 UTC),
        };
        let json = serde_json::to_value(&assignment).expect("serialize");
        assert_eq!(json["assigned_at"], "2024-03-15T12:00:00Z");
    }
}
