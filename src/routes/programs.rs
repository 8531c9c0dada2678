use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::db::models::Program;
use crate::filter;
use crate::AppState;

#[derive(Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub category: Option<String>,
}

fn apply_filters(rows: Vec<Program>, params: &ListParams) -> Vec<Program> {
    let term = params.q.as_deref().unwrap_or("");
    rows.into_iter()
        .filter(|p| {
            filter::text_match(term, &[&p.title, &p.description])
                && filter::facet_match(params.category.as_deref(), &p.category)
        })
        .collect()
}

pub async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    match crate::db::list_programs(&state.db, true).await {
        Ok(rows) => AxumJson(json!({ "programs": apply_filters(rows, &params) })).into_response(),
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn get_one(Path(id): Path<String>, State(state): State<AppState>) -> impl IntoResponse {
    match crate::db::get_program(&state.db, &id).await {
        Ok(Some(program)) if program.published => AxumJson(program).into_response(),
        Ok(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn admin_list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    match crate::db::list_programs(&state.db, false).await {
        Ok(rows) => AxumJson(json!({ "programs": apply_filters(rows, &params) })).into_response(),
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct ProgramRequest {
    pub title: String,
    pub description: String,
    /// Slug joining projects to this program.
    pub category: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
}

pub async fn admin_create(
    State(state): State<AppState>,
    Json(req): Json<ProgramRequest>,
) -> impl IntoResponse {
    if req.title.trim().is_empty() || req.category.trim().is_empty() {
        return (StatusCode::UNPROCESSABLE_ENTITY, "Title and category are required")
            .into_response();
    }

    let now = Utc::now();
    let program = Program {
        id: Uuid::new_v4().to_string(),
        title: req.title,
        description: req.description,
        category: req.category,
        image_url: req.image_url,
        published: req.published,
        featured: req.featured,
        created_at: now,
        updated_at: now,
    };

    match crate::db::create_program(&state.db, &program).await {
        Ok(()) => (StatusCode::CREATED, AxumJson(program)).into_response(),
        Err(e) => {
            tracing::error!("Program create failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn admin_update(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<ProgramRequest>,
) -> impl IntoResponse {
    let now = Utc::now();
    let program = Program {
        id: id.clone(),
        title: req.title,
        description: req.description,
        category: req.category,
        image_url: req.image_url,
        published: req.published,
        featured: req.featured,
        created_at: now,
        updated_at: now,
    };

    match crate::db::update_program(&state.db, &program).await {
        Ok(true) => (StatusCode::OK, AxumJson(json!({"status":"updated","id": id})))
            .into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Program update failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct PublishRequest {
    pub published: bool,
}

pub async fn admin_set_published(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<PublishRequest>,
) -> impl IntoResponse {
    match crate::db::set_program_published(&state.db, &id, req.published, Utc::now()).await {
        Ok(true) => (StatusCode::OK, AxumJson(json!({"status":"updated","id": id})))
            .into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Program publish toggle failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn admin_delete(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match crate::db::delete_program(&state.db, &id).await {
        Ok(true) => (StatusCode::OK, "Deleted").into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Program delete failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}
