use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use time::{macros::format_description, Date, OffsetDateTime};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{auth::AuthUser, state::AppState};

use super::dto::{
    CreateCustomEntryRequest, CreateFoodEntryRequest, GoalResponse, PatchFoodCaloriesRequest,
    SetGoalRequest, UpdateCustomEntryRequest, UpdateFoodEntryRequest,
};
use super::goal::{self, CaloriesError};
use super::repo::{CustomCalorieEntry, FoodEntry};
use super::summary::{self, CalorieSummary};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/calories/summary/:date", get(get_summary))
        .route("/calories/goal", get(get_goal))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/calories/goal", put(set_goal))
        .route("/food-entries", post(create_food_entry))
        .route("/food-entries/:id", put(update_food_entry))
        .route("/food-entries/:id", delete(delete_food_entry))
        .route("/food-entries/:id/calories", patch(patch_food_calories))
        .route("/custom-calories", post(create_custom_entry))
        .route("/custom-calories/:id", put(update_custom_entry))
        .route("/custom-calories/:id", delete(delete_custom_entry))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    AuthUser(client_id): AuthUser,
    Path(date): Path<String>,
) -> Result<Json<CalorieSummary>, (StatusCode, String)> {
    let format = format_description!("[year]-[month]-[day]");
    let date = Date::parse(&date, &format).map_err(|_| {
        warn!(%date, "bad summary date");
        (StatusCode::BAD_REQUEST, "Invalid date, expected YYYY-MM-DD".to_string())
    })?;

    let summary = summary::get_summary_by_date(&state.db, client_id, date)
        .await
        .map_err(calories_error)?;
    Ok(Json(summary))
}

#[instrument(skip(state))]
pub async fn get_goal(
    State(state): State<AppState>,
    AuthUser(client_id): AuthUser,
) -> Result<Json<GoalResponse>, (StatusCode, String)> {
    let goal = goal::get_calorie_goal(&state.db, client_id)
        .await
        .map_err(calories_error)?;
    Ok(Json(GoalResponse { goal }))
}

#[instrument(skip(state, payload))]
pub async fn set_goal(
    State(state): State<AppState>,
    AuthUser(client_id): AuthUser,
    Json(payload): Json<SetGoalRequest>,
) -> Result<Json<GoalResponse>, (StatusCode, String)> {
    if payload.goal <= 0 {
        return Err((StatusCode::BAD_REQUEST, "Goal must be positive".into()));
    }
    goal::set_calorie_goal(&state.db, client_id, payload.goal)
        .await
        .map_err(calories_error)?;
    info!(%client_id, goal = payload.goal, "calorie goal override set");
    Ok(Json(GoalResponse { goal: payload.goal }))
}

#[instrument(skip(state, payload))]
pub async fn create_food_entry(
    State(state): State<AppState>,
    AuthUser(client_id): AuthUser,
    Json(payload): Json<CreateFoodEntryRequest>,
) -> Result<(StatusCode, Json<FoodEntry>), (StatusCode, String)> {
    if payload.description.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Description is required".into()));
    }
    if payload.calories < 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "Calories must not be negative".into(),
        ));
    }

    let logged_at = payload.logged_at.unwrap_or_else(OffsetDateTime::now_utc);
    let entry = FoodEntry::create(
        &state.db,
        client_id,
        payload.description.trim(),
        payload.calories,
        payload.meal_type.as_deref(),
        payload.is_included_in_calories,
        logged_at,
    )
    .await
    .map_err(internal)?;

    info!(%client_id, entry_id = %entry.id, calories = entry.calories, "food entry logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state, payload))]
pub async fn update_food_entry(
    State(state): State<AppState>,
    AuthUser(client_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFoodEntryRequest>,
) -> Result<Json<FoodEntry>, (StatusCode, String)> {
    if let Some(calories) = payload.calories {
        if calories < 0 {
            return Err((
                StatusCode::BAD_REQUEST,
                "Calories must not be negative".into(),
            ));
        }
    }
    if payload.description.as_deref().is_some_and(|d| d.trim().is_empty()) {
        return Err((StatusCode::BAD_REQUEST, "Description must not be empty".into()));
    }

    let entry = FoodEntry::update(
        &state.db,
        client_id,
        id,
        payload.description.as_deref(),
        payload.calories,
        payload.meal_type.as_deref(),
        payload.is_included_in_calories,
    )
    .await
    .map_err(internal)?
    .ok_or((StatusCode::NOT_FOUND, "Food entry not found".to_string()))?;

    Ok(Json(entry))
}

/// Trainer correction path: adjust calories and/or the inclusion flag
/// without touching the rest of the log.
#[instrument(skip(state, payload))]
pub async fn patch_food_calories(
    State(state): State<AppState>,
    AuthUser(client_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PatchFoodCaloriesRequest>,
) -> Result<Json<FoodEntry>, (StatusCode, String)> {
    if payload.calories.is_none() && payload.is_included_in_calories.is_none() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Provide calories and/or is_included_in_calories".into(),
        ));
    }
    if payload.calories.is_some_and(|c| c < 0) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Calories must not be negative".into(),
        ));
    }

    let entry = FoodEntry::update(
        &state.db,
        client_id,
        id,
        None,
        payload.calories,
        None,
        payload.is_included_in_calories,
    )
    .await
    .map_err(internal)?
    .ok_or((StatusCode::NOT_FOUND, "Food entry not found".to_string()))?;

    info!(%client_id, entry_id = %entry.id, calories = entry.calories,
          included = entry.is_included_in_calories, "food entry corrected");
    Ok(Json(entry))
}

#[instrument(skip(state))]
pub async fn delete_food_entry(
    State(state): State<AppState>,
    AuthUser(client_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let deleted = FoodEntry::delete(&state.db, client_id, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err((StatusCode::NOT_FOUND, "Food entry not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn create_custom_entry(
    State(state): State<AppState>,
    AuthUser(client_id): AuthUser,
    Json(payload): Json<CreateCustomEntryRequest>,
) -> Result<(StatusCode, Json<CustomCalorieEntry>), (StatusCode, String)> {
    if payload.description.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Description is required".into()));
    }
    if payload.calories < 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "Calories must not be negative".into(),
        ));
    }

    let logged_at = payload.logged_at.unwrap_or_else(OffsetDateTime::now_utc);
    let entry = CustomCalorieEntry::create(
        &state.db,
        client_id,
        payload.description.trim(),
        payload.calories,
        payload.meal_type.as_deref(),
        logged_at,
    )
    .await
    .map_err(internal)?;

    info!(%client_id, entry_id = %entry.id, calories = entry.calories, "custom calories logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state, payload))]
pub async fn update_custom_entry(
    State(state): State<AppState>,
    AuthUser(client_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomEntryRequest>,
) -> Result<Json<CustomCalorieEntry>, (StatusCode, String)> {
    if payload.calories.is_some_and(|c| c < 0) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Calories must not be negative".into(),
        ));
    }
    if payload.description.as_deref().is_some_and(|d| d.trim().is_empty()) {
        return Err((StatusCode::BAD_REQUEST, "Description must not be empty".into()));
    }

    let entry = CustomCalorieEntry::update(
        &state.db,
        client_id,
        id,
        payload.description.as_deref(),
        payload.calories,
        payload.meal_type.as_deref(),
    )
    .await
    .map_err(internal)?
    .ok_or((StatusCode::NOT_FOUND, "Custom entry not found".to_string()))?;

    Ok(Json(entry))
}

#[instrument(skip(state))]
pub async fn delete_custom_entry(
    State(state): State<AppState>,
    AuthUser(client_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let deleted = CustomCalorieEntry::delete(&state.db, client_id, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err((StatusCode::NOT_FOUND, "Custom entry not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn calories_error(e: CaloriesError) -> (StatusCode, String) {
    match e {
        CaloriesError::ClientNotFound(id) => {
            warn!(client_id = %id, "client not found");
            (StatusCode::NOT_FOUND, "Client not found".into())
        }
        CaloriesError::Db(e) => {
            error!(error = %e, "database error");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        CaloriesError::Internal(e) => internal(e),
    }
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
