use axum::{http::StatusCode, routing::post, Json, Router};
use tracing::{instrument, warn};

use crate::{auth::AuthUser, state::AppState};

use super::calculator::{
    calculate_bmr, calculate_macros, calculate_tdee, caloric_adjustment,
    recommended_distribution, validate_nutrition_data, NutritionError,
};
use super::dto::{CalculateRequest, CalculateResponse};

pub fn routes() -> Router<AppState> {
    Router::new().route("/nutrition/calculate", post(calculate))
}

/// Runs the whole pipeline: pre-flight validation → BMR → TDEE → caloric
/// adjustment → macro split. Unknown activity/goal/rate labels fall back to
/// safe defaults; only genuinely unusable biometrics produce a 400.
#[instrument(skip(payload))]
pub async fn calculate(
    AuthUser(_subject): AuthUser,
    Json(payload): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>, (StatusCode, String)> {
    let report = validate_nutrition_data(&payload.biometrics);
    if !report.valid {
        warn!(missing = ?report.missing_fields, "incomplete biometric profile");
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Missing fields: {}", report.missing_fields.join(", ")),
        ));
    }

    // The report guarantees these are present and positive.
    let (Some(weight), Some(height), Some(age), Some(gender)) = (
        payload.biometrics.weight_kg,
        payload.biometrics.height_cm,
        payload.biometrics.age,
        payload.biometrics.gender.as_deref(),
    ) else {
        return Err((StatusCode::BAD_REQUEST, "Incomplete profile".into()));
    };

    let bmr = calculate_bmr(weight, height, age, gender).map_err(bad_request)?;
    let tdee = calculate_tdee(bmr, payload.activity_level.as_deref().unwrap_or(""));
    let target_calories = caloric_adjustment(
        tdee,
        payload.weight_goal.as_deref().unwrap_or("maintain"),
        payload.rate.as_deref().unwrap_or("moderate"),
    );

    let distribution = payload
        .distribution
        .unwrap_or_else(|| recommended_distribution(payload.goal.as_deref().unwrap_or("")));
    let macros = calculate_macros(target_calories, &distribution).map_err(bad_request)?;

    Ok(Json(CalculateResponse {
        bmr,
        tdee,
        target_calories,
        distribution,
        macros,
    }))
}

fn bad_request(e: NutritionError) -> (StatusCode, String) {
    warn!(error = %e, "calculator input rejected");
    (StatusCode::BAD_REQUEST, e.to_string())
}
