use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::db::models::Event;
use crate::filter::{self, EventScope};
use crate::AppState;

#[derive(Deserialize)]
pub struct PublicListParams {
    pub q: Option<String>,
    /// "upcoming", "past" or anything else for all.
    pub scope: Option<String>,
}

pub async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<PublicListParams>,
) -> impl IntoResponse {
    match crate::db::list_events(&state.db, true).await {
        Ok(rows) => {
            let term = params.q.as_deref().unwrap_or("");
            let scope = EventScope::from_param(params.scope.as_deref());
            let now = Utc::now();
            let events: Vec<_> = rows
                .into_iter()
                .filter(|e| {
                    filter::text_match(term, &[&e.title, &e.description, &e.location])
                        && scope.includes(e.date, now)
                })
                .collect();
            AxumJson(json!({ "events": events })).into_response()
        }
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn get_one(Path(id): Path<String>, State(state): State<AppState>) -> impl IntoResponse {
    match crate::db::get_event(&state.db, &id).await {
        Ok(Some(event)) if event.published => AxumJson(event).into_response(),
        Ok(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

/// Claims a seat via a single conditional increment; a full event is a 409
/// regardless of how many registrations race.
pub async fn register(Path(id): Path<String>, State(state): State<AppState>) -> impl IntoResponse {
    match crate::db::register_attendee(&state.db, &id).await {
        Ok(true) => (StatusCode::OK, AxumJson(json!({"status":"registered","id": id})))
            .into_response(),
        Ok(false) => match crate::db::get_event(&state.db, &id).await {
            Ok(Some(_)) => (StatusCode::CONFLICT, "Event is full").into_response(),
            Ok(None) => (StatusCode::NOT_FOUND, "Not found").into_response(),
            Err(e) => {
                tracing::error!("DB Query Error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
            }
        },
        Err(e) => {
            tracing::error!("Registration failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct AdminListParams {
    pub q: Option<String>,
}

pub async fn admin_list(
    State(state): State<AppState>,
    Query(params): Query<AdminListParams>,
) -> impl IntoResponse {
    match crate::db::list_events(&state.db, false).await {
        Ok(rows) => {
            let term = params.q.as_deref().unwrap_or("");
            let events: Vec<_> = rows
                .into_iter()
                .filter(|e| filter::text_match(term, &[&e.title, &e.description, &e.location]))
                .collect();
            AxumJson(json!({ "events": events })).into_response()
        }
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct EventRequest {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub image_url: Option<String>,
    pub max_attendees: Option<i64>,
    #[serde(default)]
    pub registration_fee: f64,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
}

pub async fn admin_create(
    State(state): State<AppState>,
    Json(req): Json<EventRequest>,
) -> impl IntoResponse {
    if req.title.trim().is_empty() {
        return (StatusCode::UNPROCESSABLE_ENTITY, "Title is required").into_response();
    }

    let event = Event {
        id: Uuid::new_v4().to_string(),
        title: req.title,
        description: req.description,
        date: req.date,
        location: req.location,
        image_url: req.image_url,
        max_attendees: req.max_attendees,
        current_attendees: 0,
        registration_fee: req.registration_fee,
        published: req.published,
        featured: req.featured,
        created_at: Utc::now(),
    };

    match crate::db::create_event(&state.db, &event).await {
        Ok(()) => (StatusCode::CREATED, AxumJson(event)).into_response(),
        Err(e) => {
            tracing::error!("Event create failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

/// Full-field overwrite; last writer wins. The attendee counter is only ever
/// moved by the registration path.
pub async fn admin_update(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<EventRequest>,
) -> impl IntoResponse {
    let event = Event {
        id: id.clone(),
        title: req.title,
        description: req.description,
        date: req.date,
        location: req.location,
        image_url: req.image_url,
        max_attendees: req.max_attendees,
        current_attendees: 0,
        registration_fee: req.registration_fee,
        published: req.published,
        featured: req.featured,
        created_at: Utc::now(),
    };

    match crate::db::update_event(&state.db, &event).await {
        Ok(true) => (StatusCode::OK, AxumJson(json!({"status":"updated","id": id})))
            .into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Event update failed: {}", e);
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
    match crate::db::set_event_published(&state.db, &id, req.published).await {
        Ok(true) => (StatusCode::OK, AxumJson(json!({"status":"updated","id": id})))
            .into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Event publish toggle failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn admin_delete(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match crate::db::delete_event(&state.db, &id).await {
        Ok(true) => (StatusCode::OK, "Deleted").into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Event delete failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}
