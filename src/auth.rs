use std::env;
use std::future::Future;

use axum::{
    body::Body,
    extract::{FromRequestParts, Query, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, RedirectUrl,
    TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::AppState;

const AUTH_COOKIE_NAME: &str = "auth_token";

#[derive(Deserialize)]
pub struct AuthCallback {
    code: String,
    state: String,
}

// Claims for our JWT
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    email: String,
    name: String,
    role: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct StateClaims {
    exp: usize,
    nonce: String,
}

pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync + 'static,
{
    type Rejection = (StatusCode, String);

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let token = extract_token_from_headers(&parts.headers)
                .ok_or((StatusCode::UNAUTHORIZED, "Missing auth token".to_string()))?;
            let claims = validate_token_str(&token).map_err(|e| {
                tracing::error!("Token error: {}", e);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            })?;

            Ok(AuthenticatedUser {
                id: claims.sub,
                email: claims.email,
                name: claims.name,
                role: claims.role,
            })
        }
    }
}

/// Guard for `/api/admin/*`: every admin operation requires a valid token
/// carrying role=admin. Unauthenticated callers get 401, authenticated
/// non-admins get 403.
pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    if req.method() == axum::http::Method::OPTIONS {
        return next.run(req).await;
    }

    let Some(token) = extract_token_from_headers(req.headers()) else {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    };
    match validate_token_str(&token) {
        Ok(claims) if claims.role == "admin" => next.run(req).await,
        Ok(_) => (StatusCode::FORBIDDEN, "Admin access required").into_response(),
        Err(e) => {
            tracing::warn!("Admin token rejected: {}", e);
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}

pub async fn login(State(state): State<AppState>) -> impl IntoResponse {
    let cfg = &state.config;

    let auth_url = format!("https://{}/authorize", cfg.auth_domain);
    let token_url = format!("https://{}/oauth/token", cfg.auth_domain);

    let client = BasicClient::new(ClientId::new(cfg.auth_client_id.clone()))
        .set_client_secret(ClientSecret::new(cfg.auth_client_secret.clone()))
        .set_auth_uri(match AuthUrl::new(auth_url) {
            Ok(u) => u,
            Err(e) => {
                tracing::error!("Bad auth url: {}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Auth misconfigured").into_response();
            }
        })
        .set_token_uri(match TokenUrl::new(token_url) {
            Ok(u) => u,
            Err(e) => {
                tracing::error!("Bad token url: {}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Auth misconfigured").into_response();
            }
        })
        .set_redirect_uri(match RedirectUrl::new(cfg.auth_callback_url.clone()) {
            Ok(u) => u,
            Err(e) => {
                tracing::error!("Bad callback url: {}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Auth misconfigured").into_response();
            }
        });

    let oauth_state = match create_state_token() {
        Ok(s) => s,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };

    let (authorize_url, _csrf_state) = client
        .authorize_url(|| oauth2::CsrfToken::new(oauth_state))
        .url();

    Redirect::to(authorize_url.as_str()).into_response()
}

pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<AuthCallback>,
) -> impl IntoResponse {
    if let Err(e) = validate_state_token(&params.state) {
        tracing::warn!("OAuth state invalid: {}", e);
        return (StatusCode::UNAUTHORIZED, "Invalid state").into_response();
    }

    let cfg = &state.config;
    let token_url = format!("https://{}/oauth/token", cfg.auth_domain);
    let auth_url = format!("https://{}/authorize", cfg.auth_domain);

    let client = match (
        AuthUrl::new(auth_url),
        TokenUrl::new(token_url),
        RedirectUrl::new(cfg.auth_callback_url.clone()),
    ) {
        (Ok(auth), Ok(token), Ok(redirect)) => {
            BasicClient::new(ClientId::new(cfg.auth_client_id.clone()))
                .set_client_secret(ClientSecret::new(cfg.auth_client_secret.clone()))
                .set_auth_uri(auth)
                .set_token_uri(token)
                .set_redirect_uri(redirect)
        }
        _ => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "Auth misconfigured").into_response();
        }
    };

    let http_client = match reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("HTTP client build failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Auth failed").into_response();
        }
    };

    let token_result = match client
        .exchange_code(AuthorizationCode::new(params.code.clone()))
        .request_async(&http_client)
        .await
    {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("OAuth token exchange failed: {}", e);
            return (StatusCode::BAD_GATEWAY, "OAuth token exchange failed").into_response();
        }
    };

    let access_token = token_result.access_token().secret();
    let userinfo_url = format!("https://{}/userinfo", cfg.auth_domain);
    let identity = match fetch_identity(&state.http, &userinfo_url, access_token).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Userinfo fetch failed: {}", e);
            return (StatusCode::BAD_GATEWAY, "Userinfo fetch failed").into_response();
        }
    };

    // Profile row is the durable identity; the role it carries gates the
    // admin surface, so it is re-read on every login.
    let now = Utc::now();
    let profile = match crate::db::upsert_profile(
        &state.db,
        &identity.id,
        &identity.email,
        &identity.name,
        now,
    )
    .await
    {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Profile upsert failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Auth failed").into_response();
        }
    };

    let token = match create_jwt(&profile) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("JWT creation failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Auth failed").into_response();
        }
    };

    let cookie = build_auth_cookie(&token, &state.config.env_mode);
    let mut response = Redirect::to("/").into_response();
    match HeaderValue::from_str(&cookie) {
        Ok(v) => {
            response.headers_mut().insert(header::SET_COOKIE, v);
        }
        Err(e) => {
            tracing::error!("Cookie header invalid: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Auth failed").into_response();
        }
    }
    response
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = clear_auth_cookie(&state.config.env_mode);
    let mut response = (StatusCode::OK, "OK").into_response();
    if let Ok(v) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, v);
    }
    response
}

pub async fn me(State(state): State<AppState>, user: AuthenticatedUser) -> impl IntoResponse {
    match crate::db::get_profile(&state.db, &user.id).await {
        Ok(Some(profile)) => Json(profile).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Profile not found").into_response(),
        Err(e) => {
            tracing::error!("Profile fetch failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub fn create_jwt(profile: &crate::db::models::Profile) -> anyhow::Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(1))
        .ok_or_else(|| anyhow::anyhow!("invalid expiry timestamp"))?
        .timestamp();

    let claims = Claims {
        sub: profile.id.clone(),
        email: profile.email.clone(),
        name: profile.full_name.clone(),
        role: profile.role.clone(),
        exp: expiration as usize,
    };

    let secret = env::var("JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;

    Ok(token)
}

pub fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    if let Some(cookie_header) = headers.get(header::COOKIE).and_then(|h| h.to_str().ok()) {
        for cookie in cookie_header.split(';') {
            let cookie = cookie.trim();
            if let Some((k, v)) = cookie.split_once('=') {
                if k == AUTH_COOKIE_NAME {
                    return Some(v.to_string());
                }
            }
        }
    }
    None
}

fn validate_token_str(token: &str) -> anyhow::Result<Claims> {
    let secret = env::var("JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;
    let mut validation = Validation::default();
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;
    Ok(data.claims)
}

fn build_auth_cookie(token: &str, env_mode: &str) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age=86400",
        AUTH_COOKIE_NAME, token
    );
    if env_mode == "production" {
        cookie.push_str("; Secure");
    }
    cookie
}

fn clear_auth_cookie(env_mode: &str) -> String {
    let mut cookie = format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0",
        AUTH_COOKIE_NAME
    );
    if env_mode == "production" {
        cookie.push_str("; Secure");
    }
    cookie
}

fn create_state_token() -> anyhow::Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::minutes(10))
        .ok_or_else(|| anyhow::anyhow!("invalid expiry timestamp"))?
        .timestamp();
    let state = StateClaims {
        exp: expiration as usize,
        nonce: uuid::Uuid::new_v4().to_string(),
    };
    let secret = env::var("JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;
    let token = encode(
        &Header::default(),
        &state,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}

fn validate_state_token(token: &str) -> anyhow::Result<()> {
    let secret = env::var("JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;
    let mut validation = Validation::default();
    validation.validate_exp = true;
    decode::<StateClaims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;
    Ok(())
}

struct ProviderIdentity {
    id: String,
    email: String,
    name: String,
}

async fn fetch_identity(
    http: &reqwest::Client,
    userinfo_url: &str,
    access_token: &str,
) -> anyhow::Result<ProviderIdentity> {
    let resp = http
        .get(userinfo_url)
        .bearer_auth(access_token)
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(anyhow::anyhow!("userinfo response status {}", resp.status()));
    }

    let json: Value = resp.json().await?;
    let id = json
        .get("sub")
        .or_else(|| json.get("id"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("missing user id"))?
        .to_string();
    let email = json
        .get("email")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown@example.com")
        .to_string();
    let name = json
        .get("name")
        .or_else(|| json.get("nickname"))
        .and_then(|v| v.as_str())
        .unwrap_or("User")
        .to_string();

    Ok(ProviderIdentity { id, email, name })
}
