use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use tower::ServiceExt;
use uuid::Uuid;

use nonprofit_site::config::Config;
use nonprofit_site::db::{self, models::{Event, Profile, SiteSetting}};
use nonprofit_site::{app, auth, AppState};

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
        stripe_webhook_secret: None,
    }
}

async fn test_state() -> AppState {
    std::env::set_var("JWT_SECRET", "test-jwt-secret");
    let pool = db::init_pool_for_tests().await;
    AppState::new(pool, test_config())
}

fn bearer_token(role: &str) -> String {
    let now = Utc::now();
    let profile = Profile {
        id: format!("user-{}", Uuid::new_v4()),
        email: "staff@example.org".to_string(),
        full_name: "Staff Member".to_string(),
        role: role.to_string(),
        created_at: now,
        updated_at: now,
    };
    auth::create_jwt(&profile).expect("jwt")
}

async fn seed_event(state: &AppState, title: &str, in_days: i64, max: Option<i64>) -> String {
    let event = Event {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        description: "Community gathering".to_string(),
        date: Utc::now() + Duration::days(in_days),
        location: "Town Hall".to_string(),
        image_url: None,
        max_attendees: max,
        current_attendees: 0,
        registration_fee: 0.0,
        published: true,
        featured: false,
        created_at: Utc::now(),
    };
    db::create_event(&state.db, &event).await.expect("create event");
    event.id
}

#[tokio::test]
async fn registration_stops_when_the_event_is_full() {
    let state = test_state().await;
    let id = seed_event(&state, "Charity Gala", 7, Some(2)).await;

    for expected in [StatusCode::OK, StatusCode::OK, StatusCode::CONFLICT] {
        let resp = app(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/events/{}/register", id))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(resp.status(), expected);
    }

    let event = db::get_event(&state.db, &id).await.expect("get").expect("exists");
    assert_eq!(event.current_attendees, 2, "rejected registration must not increment");
}

#[tokio::test]
async fn registering_for_an_unknown_event_is_404() {
    let state = test_state().await;
    let resp = app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/events/no-such-event/register")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn event_list_partitions_and_searches_with_and_semantics() {
    let state = test_state().await;
    seed_event(&state, "Spring Gala", 10, None).await;
    seed_event(&state, "Winter Gala", -10, None).await;
    seed_event(&state, "Book Drive", 5, None).await;

    let resp = app(state.clone())
        .oneshot(
            Request::builder()
                .uri("/api/events?q=gala&scope=upcoming")
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
    let events = json["events"].as_array().expect("array");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "Spring Gala");
}

#[tokio::test]
async fn contact_form_requires_every_field() {
    let state = test_state().await;

    let resp = app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/contact")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"name":"Ada","email":"ada@example.org","subject":"Hello","message":""}"#,
                ))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"Please fill in all required fields");

    let rows = db::list_contact_messages(&state.db).await.expect("list");
    assert!(rows.is_empty(), "rejected form must not insert a row");

    let ok = app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/contact")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"name":"Ada","email":"ada@example.org","subject":"Hello","message":"I want to volunteer."}"#,
                ))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(ok.status(), StatusCode::CREATED);

    let rows = db::list_contact_messages(&state.db).await.expect("list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, "new");
}

#[tokio::test]
async fn public_settings_expose_only_public_rows() {
    let state = test_state().await;
    let now = Utc::now();
    for (key, value, is_public) in [
        ("site_name", "Hope Foundation", true),
        ("smtp_password", "hunter2", false),
    ] {
        db::create_setting(
            &state.db,
            &SiteSetting {
                id: Uuid::new_v4().to_string(),
                key: key.to_string(),
                value: value.to_string(),
                description: None,
                is_public,
                created_at: now,
                updated_at: now,
            },
        )
        .await
        .expect("create setting");
    }

    let resp = app(state.clone())
        .oneshot(Request::builder().uri("/api/settings").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(json["site_name"], "Hope Foundation");
    assert!(json.get("smtp_password").is_none());
}

#[tokio::test]
async fn admin_routes_reject_anonymous_and_non_admin_callers() {
    let state = test_state().await;

    let anonymous = app(state.clone())
        .oneshot(
            Request::builder()
                .uri("/api/admin/donations")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let user = app(state.clone())
        .oneshot(
            Request::builder()
                .uri("/api/admin/donations")
                .header("authorization", format!("Bearer {}", bearer_token("user")))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(user.status(), StatusCode::FORBIDDEN);

    let admin = app(state.clone())
        .oneshot(
            Request::builder()
                .uri("/api/admin/donations")
                .header("authorization", format!("Bearer {}", bearer_token("admin")))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(admin.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_crud_round_trip_for_programs() {
    let state = test_state().await;
    let token = bearer_token("admin");

    let created = app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/programs")
                .header("authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"title":"Education","description":"Schools and scholarships","category":"education","published":false}"#,
                ))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = axum::body::to_bytes(created.into_body(), usize::MAX)
        .await
        .expect("body");
    let program: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    let id = program["id"].as_str().expect("id").to_string();

    // Unpublished rows are invisible to the public listing.
    let public = app(state.clone())
        .oneshot(Request::builder().uri("/api/programs").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let body = axum::body::to_bytes(public.into_body(), usize::MAX)
        .await
        .expect("body");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    assert!(json["programs"].as_array().expect("array").is_empty());

    let publish = app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/admin/programs/{}/publish", id))
                .header("authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"published":true}"#))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(publish.status(), StatusCode::OK);

    let public = app(state.clone())
        .oneshot(Request::builder().uri("/api/programs").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let body = axum::body::to_bytes(public.into_body(), usize::MAX)
        .await
        .expect("body");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(json["programs"].as_array().expect("array").len(), 1);

    let deleted = app(state.clone())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/programs/{}", id))
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(deleted.status(), StatusCode::OK);

    let gone = db::get_program(&state.db, &id).await.expect("get");
    assert!(gone.is_none());
}

#[tokio::test]
async fn newsletter_resubscribe_reactivates_instead_of_duplicating() {
    let state = test_state().await;

    let subscribe = |state: AppState| async move {
        app(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/newsletter/subscribe")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"email":"Friend@Example.org","name":"Friend"}"#))
                    .expect("request"),
            )
            .await
            .expect("response")
    };

    let first = subscribe(state.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let subscriber = db::get_subscriber_by_email(&state.db, "friend@example.org")
        .await
        .expect("lookup")
        .expect("row exists");

    let unsubscribe = app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!(
                    "/api/newsletter/unsubscribe/{}",
                    subscriber.unsubscribe_token
                ))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(unsubscribe.status(), StatusCode::OK);

    let second = subscribe(state.clone()).await;
    assert_eq!(second.status(), StatusCode::OK);

    let rows = db::list_subscribers(&state.db).await.expect("list");
    assert_eq!(rows.len(), 1, "email identity must not duplicate");
    assert!(rows[0].is_active, "resubscribe reactivates the row");
}
