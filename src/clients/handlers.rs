use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{auth::AuthUser, state::AppState};

use super::dto::{ClientResponse, CreateClientRequest, SetStatusRequest, UpdateClientRequest};
use super::repo::{Client, CLIENT_STATUSES};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", post(create_client))
        .route("/clients", get(list_clients))
        .route("/clients/:id", get(get_client))
        .route("/clients/:id", put(update_client))
        .route("/clients/:id/status", patch(set_client_status))
}

#[instrument(skip(state, payload))]
pub async fn create_client(
    State(state): State<AppState>,
    AuthUser(trainer_id): AuthUser,
    Json(payload): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientResponse>), (StatusCode, String)> {
    if payload.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Name is required".into()));
    }
    if payload.email.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Email is required".into()));
    }

    let client = Client::create(
        &state.db,
        trainer_id,
        payload.name.trim(),
        payload.email.trim(),
        payload.weight_kg,
        payload.height_cm,
        payload.age,
        payload.gender.as_deref(),
        payload.activity_level.as_deref(),
    )
    .await
    .map_err(internal)?;

    info!(%trainer_id, client_id = %client.id, "client registered");
    Ok((StatusCode::CREATED, Json(client.into())))
}

#[instrument(skip(state))]
pub async fn list_clients(
    State(state): State<AppState>,
    AuthUser(trainer_id): AuthUser,
) -> Result<Json<Vec<ClientResponse>>, (StatusCode, String)> {
    let clients = Client::list_by_trainer(&state.db, trainer_id)
        .await
        .map_err(internal)?;
    Ok(Json(clients.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_client(
    State(state): State<AppState>,
    AuthUser(_trainer_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ClientResponse>, (StatusCode, String)> {
    let client = Client::find_by_id(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Client not found".to_string()))?;
    Ok(Json(client.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_client(
    State(state): State<AppState>,
    AuthUser(_trainer_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClientRequest>,
) -> Result<Json<ClientResponse>, (StatusCode, String)> {
    let client = Client::update_profile(
        &state.db,
        id,
        payload.name.as_deref(),
        payload.email.as_deref(),
        payload.weight_kg,
        payload.height_cm,
        payload.age,
        payload.gender.as_deref(),
        payload.activity_level.as_deref(),
    )
    .await
    .map_err(internal)?
    .ok_or((StatusCode::NOT_FOUND, "Client not found".to_string()))?;
    Ok(Json(client.into()))
}

#[instrument(skip(state, payload))]
pub async fn set_client_status(
    State(state): State<AppState>,
    AuthUser(_trainer_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetStatusRequest>,
) -> Result<Json<ClientResponse>, (StatusCode, String)> {
    let status = payload.status.trim().to_lowercase();
    if !CLIENT_STATUSES.contains(&status.as_str()) {
        warn!(%status, "rejected unknown client status");
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Status must be one of: {}", CLIENT_STATUSES.join(", ")),
        ));
    }

    let client = Client::set_status(&state.db, id, &status)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Client not found".to_string()))?;

    info!(client_id = %client.id, %status, "client status changed");
    Ok(Json(client.into()))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    tracing::error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
