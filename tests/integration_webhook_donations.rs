use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use sqlx::types::Json as SqlJson;
use tower::ServiceExt;
use uuid::Uuid;

use nonprofit_site::config::Config;
use nonprofit_site::db::{self, models::Project};
use nonprofit_site::{app, payments, AppState};

const WEBHOOK_SECRET: &str = "whsec_test";

fn test_config() -> Config {
    Config {
        env_mode: "development".to_string(),
        site_base_url: "http://localhost:8080".to_string(),
        auth_domain: "auth.example.org".to_string(),
        auth_client_id: "client".to_string(),
        auth_client_secret: "client-secret".to_string(),
        auth_callback_url: "http://localhost:8080/auth/callback".to_string(),
        stripe_secret_key: None,
        stripe_publishable_key: None,
        stripe_webhook_secret: Some(WEBHOOK_SECRET.to_string()),
    }
}

async fn test_state() -> AppState {
    std::env::set_var("JWT_SECRET", "test-jwt-secret");
    let pool = db::init_pool_for_tests().await;
    AppState::new(pool, test_config())
}

fn completed_event(session_id: &str, amount_total: i64, project_id: Option<&str>) -> String {
    let mut metadata = serde_json::json!({
        "donorName": "Jane Doe",
        "donorEmail": "jane@example.org",
        "message": "Keep up the good work",
        "isAnonymous": "false",
    });
    if let Some(pid) = project_id {
        metadata["projectId"] = serde_json::Value::String(pid.to_string());
    }
    serde_json::json!({
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": session_id,
                "amount_total": amount_total,
                "currency": "usd",
                "metadata": metadata,
            }
        }
    })
    .to_string()
}

fn webhook_request(payload: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/webhooks/payments")
        .header("content-type", "application/json");
    if let Some(sig) = signature {
        builder = builder.header("stripe-signature", sig);
    }
    builder.body(Body::from(payload.to_string())).expect("request")
}

#[tokio::test]
async fn verified_completion_inserts_one_donation() {
    let state = test_state().await;
    let app = app(state.clone());

    let payload = completed_event("cs_test_100", 5000, None);
    let sig = payments::sign_payload(payload.as_bytes(), Utc::now().timestamp(), WEBHOOK_SECRET);

    let resp = app
        .oneshot(webhook_request(&payload, Some(&sig)))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::OK);

    let donation = db::get_donation_by_session(&state.db, "cs_test_100")
        .await
        .expect("lookup")
        .expect("row exists");
    assert_eq!(donation.amount, 50.0);
    assert_eq!(donation.currency, "usd");
    assert_eq!(donation.donor_name, "Jane Doe");
    assert_eq!(donation.donor_email, "jane@example.org");
    assert_eq!(donation.payment_status, "completed");
}

#[tokio::test]
async fn duplicate_delivery_is_a_noop() {
    let state = test_state().await;

    let payload = completed_event("cs_test_dup", 2500, None);
    let sig = payments::sign_payload(payload.as_bytes(), Utc::now().timestamp(), WEBHOOK_SECRET);

    for _ in 0..2 {
        let resp = app(state.clone())
            .oneshot(webhook_request(&payload, Some(&sig)))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let rows = db::list_donations(&state.db).await.expect("list");
    assert_eq!(rows.len(), 1, "replayed event must not create a second row");
}

#[tokio::test]
async fn invalid_signature_is_rejected_without_a_write() {
    let state = test_state().await;

    let payload = completed_event("cs_test_bad", 5000, None);
    let bad_sig =
        payments::sign_payload(payload.as_bytes(), Utc::now().timestamp(), "whsec_wrong");

    let resp = app(state.clone())
        .oneshot(webhook_request(&payload, Some(&bad_sig)))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let missing = app(state.clone())
        .oneshot(webhook_request(&payload, None))
        .await
        .expect("response");
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let rows = db::list_donations(&state.db).await.expect("list");
    assert!(rows.is_empty(), "rejected webhook must not write a row");
}

#[tokio::test]
async fn missing_webhook_secret_is_rejected() {
    std::env::set_var("JWT_SECRET", "test-jwt-secret");
    let pool = db::init_pool_for_tests().await;
    let mut config = test_config();
    config.stripe_webhook_secret = None;
    let state = AppState::new(pool, config);

    let payload = completed_event("cs_test_nosecret", 5000, None);
    let sig = payments::sign_payload(payload.as_bytes(), Utc::now().timestamp(), WEBHOOK_SECRET);

    let resp = app(state.clone())
        .oneshot(webhook_request(&payload, Some(&sig)))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unrelated_event_types_are_acknowledged_and_ignored() {
    let state = test_state().await;

    let payload = serde_json::json!({
        "type": "payment_intent.created",
        "data": { "object": { "id": "pi_123" } }
    })
    .to_string();
    let sig = payments::sign_payload(payload.as_bytes(), Utc::now().timestamp(), WEBHOOK_SECRET);

    let resp = app(state.clone())
        .oneshot(webhook_request(&payload, Some(&sig)))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(json["received"], true);

    let rows = db::list_donations(&state.db).await.expect("list");
    assert!(rows.is_empty());
}

#[tokio::test]
async fn completion_with_project_metadata_moves_raised_amount_once() {
    let state = test_state().await;
    let now = Utc::now();
    let project_id = Uuid::new_v4().to_string();

    let project = Project {
        id: project_id.clone(),
        title: "Clean Water".to_string(),
        description: "Wells for three villages".to_string(),
        location: "Kisumu".to_string(),
        target_amount: 10000.0,
        raised_amount: 0.0,
        start_date: chrono::NaiveDate::from_ymd_opt(2026, 1, 1).expect("date"),
        end_date: chrono::NaiveDate::from_ymd_opt(2026, 12, 31).expect("date"),
        status: "active".to_string(),
        image_url: None,
        image_gallery: SqlJson(vec![]),
        show_gallery: false,
        beneficiaries: 1200,
        program_category: "health".to_string(),
        published: true,
        featured: false,
        created_at: now,
        updated_at: now,
    };
    db::create_project(&state.db, &project).await.expect("create project");

    let payload = completed_event("cs_test_project", 250000, Some(&project_id));
    let sig = payments::sign_payload(payload.as_bytes(), Utc::now().timestamp(), WEBHOOK_SECRET);

    for _ in 0..2 {
        let resp = app(state.clone())
            .oneshot(webhook_request(&payload, Some(&sig)))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let fetched = db::get_project(&state.db, &project_id)
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(fetched.raised_amount, 2500.0, "redelivery must not double-count");

    // Success page sees the clamped progress through the public endpoint.
    let resp = app(state.clone())
        .oneshot(
            Request::builder()
                .uri(format!("/api/projects/{}", project_id))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(json["progress_percent"], 25.0);
}

#[tokio::test]
async fn success_page_lookup_follows_the_webhook() {
    let state = test_state().await;

    // Before the webhook lands the lookup is a 404 the client polls through.
    let early = app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/donations/lookup")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"sessionId":"cs_test_late"}"#))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(early.status(), StatusCode::NOT_FOUND);

    let payload = completed_event("cs_test_late", 1500, None);
    let sig = payments::sign_payload(payload.as_bytes(), Utc::now().timestamp(), WEBHOOK_SECRET);
    let resp = app(state.clone())
        .oneshot(webhook_request(&payload, Some(&sig)))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::OK);

    let found = app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/donations/lookup")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"sessionId":"cs_test_late"}"#))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(found.status(), StatusCode::OK);
    let body = axum::body::to_bytes(found.into_body(), usize::MAX)
        .await
        .expect("body");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(json["amount"], 15.0);
    assert_eq!(json["stripe_session_id"], "cs_test_late");
}

#[tokio::test]
async fn intent_validates_amount_and_donor_fields() {
    let state = test_state().await;

    let too_small = app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/donations/intent")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"amount":50,"donorName":"Jane","donorEmail":"jane@example.org"}"#,
                ))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(too_small.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let blank_name = app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/donations/intent")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"amount":5000,"donorName":"  ","donorEmail":"jane@example.org"}"#,
                ))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(blank_name.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
