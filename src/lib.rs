use std::sync::Arc;

use axum::{
    http::Method,
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub mod auth;
pub mod config;
pub mod db;
pub mod filter;
pub mod payments;
pub mod routes;
pub mod settings;

use config::Config;
use db::DbPool;
use settings::SettingsCache;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub settings: Arc<SettingsCache>,
    pub config: Arc<Config>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        Self {
            db,
            settings: Arc::new(SettingsCache::new()),
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }
}

pub async fn health_check() -> &'static str {
    "OK"
}

/// Builds the full route tree. Transport-level layers (trace, global CORS,
/// security headers) are attached by the binary.
pub fn app(state: AppState) -> Router {
    // The provider calls the webhook cross-origin; it gets its own
    // wide-open CORS policy instead of the site's.
    let webhook_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let admin = Router::new()
        .route("/donations", get(routes::donations::admin_list))
        .route(
            "/settings",
            get(routes::settings::admin_list).post(routes::settings::admin_create),
        )
        .route(
            "/settings/{id}",
            put(routes::settings::admin_update).delete(routes::settings::admin_delete),
        )
        .route(
            "/events",
            get(routes::events::admin_list).post(routes::events::admin_create),
        )
        .route(
            "/events/{id}",
            put(routes::events::admin_update).delete(routes::events::admin_delete),
        )
        .route("/events/{id}/publish", post(routes::events::admin_set_published))
        .route(
            "/programs",
            get(routes::programs::admin_list).post(routes::programs::admin_create),
        )
        .route(
            "/programs/{id}",
            put(routes::programs::admin_update).delete(routes::programs::admin_delete),
        )
        .route(
            "/programs/{id}/publish",
            post(routes::programs::admin_set_published),
        )
        .route(
            "/projects",
            get(routes::projects::admin_list).post(routes::projects::admin_create),
        )
        .route(
            "/projects/{id}",
            put(routes::projects::admin_update).delete(routes::projects::admin_delete),
        )
        .route(
            "/projects/{id}/publish",
            post(routes::projects::admin_set_published),
        )
        .route("/messages", get(routes::contact::admin_list))
        .route(
            "/messages/{id}",
            put(routes::contact::admin_update).delete(routes::contact::admin_delete),
        )
        .route("/subscribers", get(routes::newsletter::admin_list))
        .route(
            "/subscribers/{id}",
            put(routes::newsletter::admin_toggle).delete(routes::newsletter::admin_delete),
        )
        .route(
            "/stats",
            get(routes::stats::admin_list_site_stats).post(routes::stats::admin_create_site_stat),
        )
        .route(
            "/stats/{id}",
            put(routes::stats::admin_update_site_stat)
                .delete(routes::stats::admin_delete_site_stat),
        )
        .route(
            "/response-times",
            get(routes::stats::admin_list_response_times)
                .post(routes::stats::admin_create_response_time),
        )
        .route(
            "/response-times/{id}",
            put(routes::stats::admin_update_response_time)
                .delete(routes::stats::admin_delete_response_time),
        )
        .route("/profiles", get(routes::profiles::admin_list))
        .route("/profiles/{id}/role", put(routes::profiles::admin_set_role))
        .layer(from_fn(auth::require_admin));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/settings", get(routes::settings::public_settings))
        .route("/api/programs", get(routes::programs::list_public))
        .route("/api/programs/{id}", get(routes::programs::get_one))
        .route("/api/projects", get(routes::projects::list_public))
        .route("/api/projects/{id}", get(routes::projects::get_one))
        .route("/api/events", get(routes::events::list_public))
        .route("/api/events/{id}", get(routes::events::get_one))
        .route("/api/events/{id}/register", post(routes::events::register))
        .route("/api/contact", post(routes::contact::submit))
        .route("/api/newsletter/subscribe", post(routes::newsletter::subscribe))
        .route(
            "/api/newsletter/unsubscribe/{token}",
            post(routes::newsletter::unsubscribe),
        )
        .route("/api/stats", get(routes::stats::list_site_stats))
        .route("/api/response-times", get(routes::stats::list_response_times))
        .route("/api/donations/intent", post(routes::donations::create_intent))
        .route("/api/donations/lookup", post(routes::donations::lookup))
        .route(
            "/api/webhooks/payments",
            post(routes::donations::payment_webhook).layer(webhook_cors),
        )
        .route("/api/me", get(auth::me))
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/logout", post(auth::logout))
        .nest("/api/admin", admin)
        .with_state(state)
}
