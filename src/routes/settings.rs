use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson},
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::models::SiteSetting;
use crate::AppState;

/// Public key-value settings as a flat object. Refreshes the cache first;
/// a storage failure falls back to the last good snapshot.
pub async fn public_settings(State(state): State<AppState>) -> impl IntoResponse {
    state.settings.refresh(&state.db).await;
    AxumJson(state.settings.snapshot().await)
}

pub async fn admin_list(State(state): State<AppState>) -> impl IntoResponse {
    match crate::db::list_settings(&state.db).await {
        Ok(rows) => AxumJson(serde_json::json!({ "settings": rows })).into_response(),
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct CreateSettingRequest {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

pub async fn admin_create(
    State(state): State<AppState>,
    Json(req): Json<CreateSettingRequest>,
) -> impl IntoResponse {
    if req.key.trim().is_empty() {
        return (StatusCode::UNPROCESSABLE_ENTITY, "Setting key is required").into_response();
    }

    let now = Utc::now();
    let setting = SiteSetting {
        id: Uuid::new_v4().to_string(),
        key: req.key,
        value: req.value,
        description: req.description,
        is_public: req.is_public,
        created_at: now,
        updated_at: now,
    };

    match crate::db::create_setting(&state.db, &setting).await {
        Ok(()) => (StatusCode::CREATED, AxumJson(setting)).into_response(),
        Err(e) => {
            tracing::error!("Setting create failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateSettingRequest {
    pub value: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

pub async fn admin_update(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<UpdateSettingRequest>,
) -> impl IntoResponse {
    match crate::db::update_setting(
        &state.db,
        &id,
        &req.value,
        &req.description,
        req.is_public,
        Utc::now(),
    )
    .await
    {
        Ok(true) => (StatusCode::OK, AxumJson(serde_json::json!({"status":"updated","id": id})))
            .into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Setting update failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn admin_delete(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match crate::db::delete_setting(&state.db, &id).await {
        Ok(true) => (StatusCode::OK, "Deleted").into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Setting delete failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}
