//! Effective daily calorie goal resolution.
//!
//! Precedence: active training plan's `daily_calories` → client's manual
//! override → hard default. The chain is an explicit ordered list of
//! `Option<i32>` sources short-circuiting on the first hit, so adding a
//! fourth fallback later is a one-line change.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::plans::repo::TrainingPlan;

/// Goal used when neither a plan nor a client override supplies one.
pub const DEFAULT_CALORIE_GOAL: i32 = 2000;

#[derive(Debug, Error)]
pub enum CaloriesError {
    #[error("client {0} not found")]
    ClientNotFound(Uuid),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Pure precedence chain. Zero and negative values never win a tier; a plan
/// with `daily_calories = 0` falls through to the override exactly like a
/// plan without one.
pub fn resolve_goal(plan_daily_calories: Option<i32>, override_goal: Option<i32>) -> i32 {
    let sources = [
        plan_daily_calories.filter(|c| *c > 0),
        override_goal.filter(|c| *c > 0),
    ];
    sources
        .into_iter()
        .flatten()
        .next()
        .unwrap_or(DEFAULT_CALORIE_GOAL)
}

/// Loads the resolution inputs for a client and delegates to [`resolve_goal`].
pub async fn get_calorie_goal(db: &PgPool, client_id: Uuid) -> Result<i32, CaloriesError> {
    let override_goal: Option<i32> =
        sqlx::query_scalar(r#"SELECT calorie_goal_override FROM clients WHERE id = $1"#)
            .bind(client_id)
            .fetch_optional(db)
            .await?
            .ok_or(CaloriesError::ClientNotFound(client_id))?;

    let plan_daily_calories = TrainingPlan::active_for_client(db, client_id)
        .await?
        .and_then(|p| p.daily_calories);

    Ok(resolve_goal(plan_daily_calories, override_goal))
}

/// Writes the client's manual override. Never touches a plan's
/// `daily_calories`; the override is only consulted when no active plan
/// supplies a goal.
pub async fn set_calorie_goal(
    db: &PgPool,
    client_id: Uuid,
    goal: i32,
) -> Result<(), CaloriesError> {
    let result = sqlx::query(r#"UPDATE clients SET calorie_goal_override = $2 WHERE id = $1"#)
        .bind(client_id)
        .bind(goal)
        .execute(db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(CaloriesError::ClientNotFound(client_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_wins_over_override() {
        assert_eq!(resolve_goal(Some(1800), Some(2200)), 1800);
    }

    #[test]
    fn override_wins_when_plan_absent() {
        assert_eq!(resolve_goal(None, Some(2200)), 2200);
    }

    #[test]
    fn default_when_nothing_is_set() {
        assert_eq!(resolve_goal(None, None), DEFAULT_CALORIE_GOAL);
    }

    #[test]
    fn zero_plan_calories_fall_through() {
        assert_eq!(resolve_goal(Some(0), Some(2200)), 2200);
        assert_eq!(resolve_goal(Some(-50), None), DEFAULT_CALORIE_GOAL);
    }

    #[test]
    fn zero_override_falls_through_to_default() {
        assert_eq!(resolve_goal(None, Some(0)), DEFAULT_CALORIE_GOAL);
    }

    #[test]
    fn resolution_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(resolve_goal(Some(1800), Some(2200)), 1800);
        }
    }
}
