use axum::{
    body::Bytes,
    extract::{Json, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json as AxumJson},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::db::models::Donation;
use crate::filter;
use crate::payments::{self, DonationIntent};
use crate::AppState;

const SIGNATURE_HEADER: &str = "stripe-signature";
const COMPLETED_EVENT: &str = "checkout.session.completed";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentRequest {
    /// Minor currency units; 100 is the 1-unit minimum donation.
    pub amount: i64,
    pub donor_name: String,
    pub donor_email: String,
    pub message: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    pub project_id: Option<String>,
    pub program_category: Option<String>,
}

pub async fn create_intent(
    State(state): State<AppState>,
    Json(req): Json<CreateIntentRequest>,
) -> impl IntoResponse {
    if req.amount < 100 {
        return (StatusCode::UNPROCESSABLE_ENTITY, "Minimum donation is 1").into_response();
    }
    if req.donor_name.trim().is_empty() || req.donor_email.trim().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Please fill in all required fields",
        )
            .into_response();
    }

    let intent = DonationIntent {
        amount_minor: req.amount,
        donor_name: req.donor_name,
        donor_email: req.donor_email,
        message: req.message,
        is_anonymous: req.is_anonymous,
        project_id: req.project_id,
        program_category: req.program_category,
    };

    match payments::create_checkout_session(&state.http, &state.config, &intent).await {
        Ok(session) => AxumJson(json!({
            "sessionId": session.id,
            "url": session.url,
            "publishableKey": state.config.stripe_publishable_key,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Checkout session creation failed: {}", e);
            (StatusCode::BAD_GATEWAY, "Payment provider error").into_response()
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub session_id: String,
}

/// Success-page lookup by checkout session id. Returns 404 until the webhook
/// has landed; the caller polls through the read-after-write race.
pub async fn lookup(
    State(state): State<AppState>,
    Json(req): Json<LookupRequest>,
) -> impl IntoResponse {
    match crate::db::get_donation_by_session(&state.db, &req.session_id).await {
        Ok(Some(donation)) => AxumJson(donation).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Donation not found").into_response(),
        Err(e) => {
            tracing::error!("Donation lookup failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

/// Payment-provider webhook. Verifies the signature over the raw body, then
/// records exactly one donation per completed checkout session; every other
/// event type is acknowledged and ignored.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let Some(secret) = state.config.stripe_webhook_secret.as_deref() else {
        tracing::error!("STRIPE_WEBHOOK_SECRET not configured");
        return webhook_error("Webhook secret not configured");
    };

    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|h| h.to_str().ok()) else {
        return webhook_error("Missing signature header");
    };

    if let Err(e) = payments::verify_signature(&body, signature, secret) {
        tracing::warn!("Webhook signature rejected: {}", e);
        return webhook_error(&e.to_string());
    }

    let event: payments::WebhookEvent = match serde_json::from_slice(&body) {
        Ok(ev) => ev,
        Err(e) => return webhook_error(&format!("Malformed event payload: {}", e)),
    };

    if event.event_type != COMPLETED_EVENT {
        return (StatusCode::OK, AxumJson(json!({ "received": true }))).into_response();
    }

    let session: payments::CheckoutSession = match serde_json::from_value(event.data.object) {
        Ok(s) => s,
        Err(e) => return webhook_error(&format!("Malformed session object: {}", e)),
    };

    let Some(amount_total) = session.amount_total else {
        return webhook_error("Session missing amount_total");
    };

    let donor_name = session
        .metadata
        .get("donorName")
        .cloned()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Anonymous".to_string());
    let donor_email = session.donor_email().unwrap_or_default();
    let message = session
        .metadata
        .get("message")
        .cloned()
        .filter(|m| !m.is_empty());
    let is_anonymous = session
        .metadata
        .get("isAnonymous")
        .map(|v| v == "true")
        .unwrap_or(false);

    let donation = Donation {
        id: Uuid::new_v4().to_string(),
        donor_name,
        donor_email,
        amount: payments::amount_major(amount_total),
        currency: session.currency.clone().unwrap_or_else(|| "usd".to_string()),
        message,
        is_anonymous,
        payment_status: "completed".to_string(),
        stripe_session_id: session.id.clone(),
        created_at: Utc::now(),
    };

    match crate::db::insert_donation(&state.db, &donation).await {
        Ok(true) => {
            // Raised totals move only on a fresh insert, so a redelivered
            // event cannot double-count.
            if let Some(project_id) = session.metadata.get("projectId") {
                if let Err(e) = crate::db::increment_raised_amount(
                    &state.db,
                    project_id,
                    donation.amount,
                    Utc::now(),
                )
                .await
                {
                    tracing::error!("Raised amount update failed: {}", e);
                }
            }
        }
        Ok(false) => {
            tracing::info!(
                "Duplicate webhook delivery for session {}, ignoring",
                session.id
            );
        }
        Err(e) => {
            tracing::error!("Donation insert failed: {}", e);
            return webhook_error("Database Error");
        }
    }

    (StatusCode::OK, AxumJson(json!({ "received": true }))).into_response()
}

fn webhook_error(message: &str) -> axum::response::Response {
    (StatusCode::BAD_REQUEST, AxumJson(json!({ "error": message }))).into_response()
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
    match crate::db::list_donations(&state.db).await {
        Ok(rows) => {
            let term = params.q.as_deref().unwrap_or("");
            let donations: Vec<_> = rows
                .into_iter()
                .filter(|d| {
                    filter::text_match(term, &[&d.donor_name, &d.donor_email])
                        && filter::facet_match(params.status.as_deref(), &d.payment_status)
                })
                .collect();
            AxumJson(json!({ "donations": donations })).into_response()
        }
        Err(e) => {
            tracing::error!("DB Query Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}
