use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::AuthUser, state::AppState};

use super::dto::{AssignPlanRequest, AssignmentResponse, CreatePlanRequest, UpdatePlanRequest};
use super::repo::{PlanAssignment, TrainingPlan};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plans", post(create_plan))
        .route("/plans", get(list_plans))
        .route("/plans/:id", get(get_plan))
        .route("/plans/:id", put(update_plan))
        .route("/plans/:id", delete(delete_plan))
        .route("/clients/:id/plan", get(get_active_plan))
        .route("/clients/:id/plan", put(assign_plan))
        .route("/clients/:id/plan", delete(unassign_plan))
}

#[instrument(skip(state, payload))]
pub async fn create_plan(
    State(state): State<AppState>,
    AuthUser(trainer_id): AuthUser,
    Json(payload): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<TrainingPlan>), (StatusCode, String)> {
    if payload.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Name is required".into()));
    }
    if payload.daily_calories.is_some_and(|c| c <= 0) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Daily calories must be positive".into(),
        ));
    }

    let plan = TrainingPlan::create(
        &state.db,
        trainer_id,
        payload.name.trim(),
        payload.description.as_deref(),
        payload.daily_calories,
    )
    .await
    .map_err(internal)?;

    info!(%trainer_id, plan_id = %plan.id, "training plan created");
    Ok((StatusCode::CREATED, Json(plan)))
}

#[instrument(skip(state))]
pub async fn list_plans(
    State(state): State<AppState>,
    AuthUser(trainer_id): AuthUser,
) -> Result<Json<Vec<TrainingPlan>>, (StatusCode, String)> {
    let plans = TrainingPlan::list_by_trainer(&state.db, trainer_id)
        .await
        .map_err(internal)?;
    Ok(Json(plans))
}

#[instrument(skip(state))]
pub async fn get_plan(
    State(state): State<AppState>,
    AuthUser(_trainer_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TrainingPlan>, (StatusCode, String)> {
    let plan = TrainingPlan::find_by_id(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Plan not found".to_string()))?;
    Ok(Json(plan))
}

#[instrument(skip(state, payload))]
pub async fn update_plan(
    State(state): State<AppState>,
    AuthUser(_trainer_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePlanRequest>,
) -> Result<Json<TrainingPlan>, (StatusCode, String)> {
    // Some(None) clears the field and skips the positivity check
    if payload.daily_calories.flatten().is_some_and(|c| c <= 0) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Daily calories must be positive".into(),
        ));
    }

    let plan = TrainingPlan::update(
        &state.db,
        id,
        payload.name.as_deref(),
        payload.description.as_deref(),
        payload.daily_calories,
    )
    .await
    .map_err(internal)?
    .ok_or((StatusCode::NOT_FOUND, "Plan not found".to_string()))?;
    Ok(Json(plan))
}

#[instrument(skip(state))]
pub async fn delete_plan(
    State(state): State<AppState>,
    AuthUser(_trainer_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let deleted = TrainingPlan::delete(&state.db, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err((StatusCode::NOT_FOUND, "Plan not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_active_plan(
    State(state): State<AppState>,
    AuthUser(_trainer_id): AuthUser,
    Path(client_id): Path<Uuid>,
) -> Result<Json<TrainingPlan>, (StatusCode, String)> {
    let plan = TrainingPlan::active_for_client(&state.db, client_id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "No active plan".to_string()))?;
    Ok(Json(plan))
}

/// Assigns a plan to a client, replacing any existing assignment in one
/// transaction.
#[instrument(skip(state, payload))]
pub async fn assign_plan(
    State(state): State<AppState>,
    AuthUser(trainer_id): AuthUser,
    Path(client_id): Path<Uuid>,
    Json(payload): Json<AssignPlanRequest>,
) -> Result<Json<AssignmentResponse>, (StatusCode, String)> {
    // 404 on a dangling plan id rather than surfacing the FK violation
    TrainingPlan::find_by_id(&state.db, payload.plan_id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Plan not found".to_string()))?;

    let assignment = PlanAssignment::replace_for_client(&state.db, client_id, payload.plan_id)
        .await
        .map_err(internal)?;

    info!(%trainer_id, %client_id, plan_id = %payload.plan_id, "plan assigned");
    Ok(Json(AssignmentResponse {
        client_id: assignment.client_id,
        plan_id: assignment.plan_id,
        assigned_at: assignment.assigned_at,
    }))
}

#[instrument(skip(state))]
pub async fn unassign_plan(
    State(state): State<AppState>,
    AuthUser(trainer_id): AuthUser,
    Path(client_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    PlanAssignment::remove_for_client(&state.db, client_id)
        .await
        .map_err(internal)?;
    info!(%trainer_id, %client_id, "plan unassigned");
    Ok(StatusCode::NO_CONTENT)
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    tracing::error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
