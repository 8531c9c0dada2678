use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::db::models::NewsletterSubscriber;
use crate::filter;
use crate::AppState;

#[derive(Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    pub name: Option<String>,
    pub user_id: Option<String>,
}

/// Email is the subscriber identity: re-subscribing an existing address
/// reactivates the row instead of duplicating it.
pub async fn subscribe(
    State(state): State<AppState>,
    Json(req): Json<SubscribeRequest>,
) -> impl IntoResponse {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return (StatusCode::UNPROCESSABLE_ENTITY, "A valid email is required").into_response();
    }

    match crate::db::get_subscriber_by_email(&state.db, &email).await {
        Ok(Some(existing)) => {
            if !existing.is_active {
                if let Err(e) = crate::db::set_subscriber_active(&state.db, &existing.id, true).await
                {
                    tracing::error!("Subscriber reactivation failed: {}", e);
                    return (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response();
                }
            }
            (StatusCode::OK, AxumJson(json!({"status":"subscribed","id": existing.id})))
                .into_response()
        }
        Ok(None) => {
            let subscriber = NewsletterSubscriber {
                id: Uuid::new_v4().to_string(),
                email,
                name: req.name,
                user_id: req.user_id,
                subscribed_at: Utc::now(),
                is_active: true,
                unsubscribe_token: Uuid::new_v4().to_string(),
            };
            match crate::db::insert_subscriber(&state.db, &subscriber).await {
                Ok(()) => (
                    StatusCode::CREATED,
                    AxumJson(json!({"status":"subscribed","id": subscriber.id})),
                )
                    .into_response(),
                Err(e) => {
                    tracing::error!("Subscriber insert failed: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
                }
            }
        }
        Err(e) => {
            tracing::error!("Subscriber lookup failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn unsubscribe(
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match crate::db::unsubscribe_by_token(&state.db, &token).await {
        Ok(true) => (StatusCode::OK, AxumJson(json!({"status":"unsubscribed"}))).into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Unsubscribe failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct AdminListParams {
    pub q: Option<String>,
    pub active: Option<bool>,
}

pub async fn admin_list(
    State(state): State<AppState>,
    Query(params): Query<AdminListParams>,
) -> impl IntoResponse {
    match crate::db::list_subscribers(&state.db).await {
        Ok(rows) => {
            let term = params.q.as_deref().unwrap_or("");
            let subscribers: Vec<_> = rows
                .into_iter()
                .filter(|s| {
                    filter::text_match(term, &[&s.email, s.name.as_deref().unwrap_or("")])
                        && params.active.map(|a| s.is_active == a).unwrap_or(true)
                })
                .collect();
            AxumJson(json!({ "subscribers": subscribers })).into_response()
        }
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct ToggleRequest {
    pub is_active: bool,
}

pub async fn admin_toggle(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<ToggleRequest>,
) -> impl IntoResponse {
    match crate::db::set_subscriber_active(&state.db, &id, req.is_active).await {
        Ok(true) => (StatusCode::OK, AxumJson(json!({"status":"updated","id": id})))
            .into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Subscriber toggle failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn admin_delete(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match crate::db::delete_subscriber(&state.db, &id).await {
        Ok(true) => (StatusCode::OK, "Deleted").into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Subscriber delete failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}
