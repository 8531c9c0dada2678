use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::filter;
use crate::AppState;

#[derive(Deserialize)]
pub struct AdminListParams {
    pub q: Option<String>,
    pub role: Option<String>,
}

pub async fn admin_list(
    State(state): State<AppState>,
    Query(params): Query<AdminListParams>,
) -> impl IntoResponse {
    match crate::db::list_profiles(&state.db).await {
        Ok(rows) => {
            let term = params.q.as_deref().unwrap_or("");
            let profiles: Vec<_> = rows
                .into_iter()
                .filter(|p| {
                    filter::text_match(term, &[&p.email, &p.full_name])
                        && filter::facet_match(params.role.as_deref(), &p.role)
                })
                .collect();
            AxumJson(json!({ "profiles": profiles })).into_response()
        }
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct RoleRequest {
    pub role: String,
}

pub async fn admin_set_role(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<RoleRequest>,
) -> impl IntoResponse {
    let role = req.role.trim().to_lowercase();
    if role != "admin" && role != "user" {
        return (StatusCode::UNPROCESSABLE_ENTITY, "Role must be admin or user").into_response();
    }

    match crate::db::set_profile_role(&state.db, &id, &role, Utc::now()).await {
        Ok(true) => (StatusCode::OK, AxumJson(json!({"status":"updated","id": id})))
            .into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Role update failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}
