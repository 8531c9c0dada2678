use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::db::models::{ResponseTime, SiteStat};
use crate::AppState;

#[derive(Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

pub async fn list_site_stats(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    match crate::db::list_site_stats(&state.db, params.page.as_deref(), true).await {
        Ok(rows) => AxumJson(json!({ "stats": rows })).into_response(),
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn list_response_times(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    match crate::db::list_response_times(&state.db, params.page.as_deref(), true).await {
        Ok(rows) => AxumJson(json!({ "response_times": rows })).into_response(),
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn admin_list_site_stats(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    match crate::db::list_site_stats(&state.db, params.page.as_deref(), false).await {
        Ok(rows) => AxumJson(json!({ "stats": rows })).into_response(),
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct SiteStatRequest {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub page: String,
}

fn default_true() -> bool {
    true
}

pub async fn admin_create_site_stat(
    State(state): State<AppState>,
    Json(req): Json<SiteStatRequest>,
) -> impl IntoResponse {
    let stat = SiteStat {
        id: Uuid::new_v4().to_string(),
        key: req.key,
        label: req.label,
        display_order: req.display_order,
        is_active: req.is_active,
        page: req.page,
    };

    match crate::db::create_site_stat(&state.db, &stat).await {
        Ok(()) => (StatusCode::CREATED, AxumJson(stat)).into_response(),
        Err(e) => {
            tracing::error!("Site stat create failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn admin_update_site_stat(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<SiteStatRequest>,
) -> impl IntoResponse {
    let stat = SiteStat {
        id: id.clone(),
        key: req.key,
        label: req.label,
        display_order: req.display_order,
        is_active: req.is_active,
        page: req.page,
    };

    match crate::db::update_site_stat(&state.db, &stat).await {
        Ok(true) => (StatusCode::OK, AxumJson(json!({"status":"updated","id": id})))
            .into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Site stat update failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn admin_delete_site_stat(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match crate::db::delete_site_stat(&state.db, &id).await {
        Ok(true) => (StatusCode::OK, "Deleted").into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Site stat delete failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn admin_list_response_times(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    match crate::db::list_response_times(&state.db, params.page.as_deref(), false).await {
        Ok(rows) => AxumJson(json!({ "response_times": rows })).into_response(),
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct ResponseTimeRequest {
    pub inquiry_type: String,
    pub response_time: String,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub page: String,
}

pub async fn admin_create_response_time(
    State(state): State<AppState>,
    Json(req): Json<ResponseTimeRequest>,
) -> impl IntoResponse {
    let row = ResponseTime {
        id: Uuid::new_v4().to_string(),
        inquiry_type: req.inquiry_type,
        response_time: req.response_time,
        display_order: req.display_order,
        is_active: req.is_active,
        page: req.page,
    };

    match crate::db::create_response_time(&state.db, &row).await {
        Ok(()) => (StatusCode::CREATED, AxumJson(row)).into_response(),
        Err(e) => {
            tracing::error!("Response time create failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn admin_update_response_time(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<ResponseTimeRequest>,
) -> impl IntoResponse {
    let row = ResponseTime {
        id: id.clone(),
        inquiry_type: req.inquiry_type,
        response_time: req.response_time,
        display_order: req.display_order,
        is_active: req.is_active,
        page: req.page,
    };

    match crate::db::update_response_time(&state.db, &row).await {
        Ok(true) => (StatusCode::OK, AxumJson(json!({"status":"updated","id": id})))
            .into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Response time update failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn admin_delete_response_time(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match crate::db::delete_response_time(&state.db, &id).await {
        Ok(true) => (StatusCode::OK, "Deleted").into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Response time delete failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}
