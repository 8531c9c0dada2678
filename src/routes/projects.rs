use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::types::Json as SqlJson;
use uuid::Uuid;

use crate::db::models::Project;
use crate::filter;
use crate::AppState;

/// Project row plus the clamped funding progress the UI displays.
#[derive(Serialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub progress_percent: f64,
}

impl From<Project> for ProjectView {
    fn from(project: Project) -> Self {
        let progress_percent =
            filter::progress_percent(project.raised_amount, project.target_amount);
        ProjectView {
            project,
            progress_percent,
        }
    }
}

#[derive(Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
}

fn apply_filters(rows: Vec<Project>, params: &ListParams) -> Vec<ProjectView> {
    let term = params.q.as_deref().unwrap_or("");
    rows.into_iter()
        .filter(|p| {
            filter::text_match(term, &[&p.title, &p.description, &p.location])
                && filter::facet_match(params.status.as_deref(), &p.status)
                && filter::facet_match(params.category.as_deref(), &p.program_category)
        })
        .map(ProjectView::from)
        .collect()
}

pub async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    match crate::db::list_projects(&state.db, true).await {
        Ok(rows) => AxumJson(json!({ "projects": apply_filters(rows, &params) })).into_response(),
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn get_one(Path(id): Path<String>, State(state): State<AppState>) -> impl IntoResponse {
    match crate::db::get_project(&state.db, &id).await {
        Ok(Some(project)) if project.published => {
            AxumJson(ProjectView::from(project)).into_response()
        }
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
    match crate::db::list_projects(&state.db, false).await {
        Ok(rows) => AxumJson(json!({ "projects": apply_filters(rows, &params) })).into_response(),
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

fn normalize_status(input: &str) -> String {
    let normalized = input.trim().to_lowercase();
    match normalized.as_str() {
        "active" | "completed" | "upcoming" => normalized,
        _ => "upcoming".to_string(),
    }
}

#[derive(Deserialize)]
pub struct ProjectRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    pub target_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_gallery: Vec<String>,
    #[serde(default)]
    pub show_gallery: bool,
    #[serde(default)]
    pub beneficiaries: i64,
    pub program_category: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
}

pub async fn admin_create(
    State(state): State<AppState>,
    Json(req): Json<ProjectRequest>,
) -> impl IntoResponse {
    if req.title.trim().is_empty() || req.program_category.trim().is_empty() {
        return (StatusCode::UNPROCESSABLE_ENTITY, "Title and program category are required")
            .into_response();
    }
    if req.target_amount <= 0.0 {
        return (StatusCode::UNPROCESSABLE_ENTITY, "Target amount must be positive")
            .into_response();
    }

    let now = Utc::now();
    let project = Project {
        id: Uuid::new_v4().to_string(),
        title: req.title,
        description: req.description,
        location: req.location,
        target_amount: req.target_amount,
        raised_amount: 0.0,
        start_date: req.start_date,
        end_date: req.end_date,
        status: normalize_status(&req.status),
        image_url: req.image_url,
        image_gallery: SqlJson(req.image_gallery),
        show_gallery: req.show_gallery,
        beneficiaries: req.beneficiaries,
        program_category: req.program_category,
        published: req.published,
        featured: req.featured,
        created_at: now,
        updated_at: now,
    };

    match crate::db::create_project(&state.db, &project).await {
        Ok(()) => (StatusCode::CREATED, AxumJson(ProjectView::from(project))).into_response(),
        Err(e) => {
            tracing::error!("Project create failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

/// Full-field overwrite; `raised_amount` moves only through the payment
/// webhook and is never writable here.
pub async fn admin_update(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<ProjectRequest>,
) -> impl IntoResponse {
    let now = Utc::now();
    let project = Project {
        id: id.clone(),
        title: req.title,
        description: req.description,
        location: req.location,
        target_amount: req.target_amount,
        raised_amount: 0.0,
        start_date: req.start_date,
        end_date: req.end_date,
        status: normalize_status(&req.status),
        image_url: req.image_url,
        image_gallery: SqlJson(req.image_gallery),
        show_gallery: req.show_gallery,
        beneficiaries: req.beneficiaries,
        program_category: req.program_category,
        published: req.published,
        featured: req.featured,
        created_at: now,
        updated_at: now,
    };

    match crate::db::update_project(&state.db, &project).await {
        Ok(true) => (StatusCode::OK, AxumJson(json!({"status":"updated","id": id})))
            .into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Project update failed: {}", e);
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
    match crate::db::set_project_published(&state.db, &id, req.published, Utc::now()).await {
        Ok(true) => (StatusCode::OK, AxumJson(json!({"status":"updated","id": id})))
            .into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Project publish toggle failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn admin_delete(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match crate::db::delete_project(&state.db, &id).await {
        Ok(true) => (StatusCode::OK, "Deleted").into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Project delete failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}
