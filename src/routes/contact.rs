use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::db::models::ContactMessage;
use crate::filter;
use crate::AppState;

#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

fn has_blank_field(req: &ContactRequest) -> bool {
    [&req.name, &req.email, &req.subject, &req.message]
        .iter()
        .any(|f| f.trim().is_empty())
}

pub async fn submit(
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> impl IntoResponse {
    if has_blank_field(&req) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Please fill in all required fields",
        )
            .into_response();
    }

    let now = Utc::now();
    let msg = ContactMessage {
        id: Uuid::new_v4().to_string(),
        name: req.name,
        email: req.email,
        subject: req.subject,
        message: req.message,
        status: "new".to_string(),
        assigned_to: None,
        created_at: now,
        updated_at: now,
    };

    match crate::db::insert_contact_message(&state.db, &msg).await {
        Ok(()) => (StatusCode::CREATED, AxumJson(json!({"status":"received","id": msg.id})))
            .into_response(),
        Err(e) => {
            tracing::error!("Contact message insert failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct AdminListParams {
    pub q: Option<String>,
    pub status: Option<String>,
}

pub async fn admin_list(
    State(state): State<AppState>,
    Query(params): Query<AdminListParams>,
) -> impl IntoResponse {
    match crate::db::list_contact_messages(&state.db).await {
        Ok(rows) => {
            let term = params.q.as_deref().unwrap_or("");
            let messages: Vec<_> = rows
                .into_iter()
                .filter(|m| {
                    filter::text_match(term, &[&m.name, &m.email, &m.subject])
                        && filter::facet_match(params.status.as_deref(), &m.status)
                })
                .collect();
            AxumJson(json!({ "messages": messages })).into_response()
        }
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

fn normalize_status(input: &str) -> String {
    let normalized = input.trim().to_lowercase();
    match normalized.as_str() {
        "new" | "in_progress" | "resolved" => normalized,
        _ => "new".to_string(),
    }
}

#[derive(Deserialize)]
pub struct UpdateMessageRequest {
    pub status: String,
    pub assigned_to: Option<String>,
}

pub async fn admin_update(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<UpdateMessageRequest>,
) -> impl IntoResponse {
    let status = normalize_status(&req.status);
    match crate::db::update_contact_message(&state.db, &id, &status, &req.assigned_to, Utc::now())
        .await
    {
        Ok(true) => (StatusCode::OK, AxumJson(json!({"status":"updated","id": id})))
            .into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Contact message update failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn admin_delete(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match crate::db::delete_contact_message(&state.db, &id).await {
        Ok(true) => (StatusCode::OK, "Deleted").into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Contact message delete failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_message_field_is_rejected() {
        let req = ContactRequest {
            name: "Ada".to_string(),
            email: "ada@example.org".to_string(),
            subject: "Volunteering".to_string(),
            message: "   ".to_string(),
        };
        assert!(has_blank_field(&req));
    }

    #[test]
    fn complete_form_passes_validation() {
        let req = ContactRequest {
            name: "Ada".to_string(),
            email: "ada@example.org".to_string(),
            subject: "Volunteering".to_string(),
            message: "I would like to help.".to_string(),
        };
        assert!(!has_blank_field(&req));
    }

    #[test]
    fn status_normalization_defaults_to_new() {
        assert_eq!(normalize_status("In_Progress"), "in_progress");
        assert_eq!(normalize_status("resolved"), "resolved");
        assert_eq!(normalize_status("bogus"), "new");
    }
}
