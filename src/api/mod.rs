//! HTTP surface of the portal.
//!
//! Every `/api` path, unknown ones included, answers with the
//! [`envelope::Envelope`] JSON shape and is charged against the per-address
//! [`rate_limit::RateLimiter`]. Responses carry CORS, compression and
//! security headers. Handlers
//! validate their input, call the [`Repository`] and fold rows through
//! [`crate::aggregate`].

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_sessions::SessionManagerLayer;

use crate::error::PortalError;
use crate::password::PasswordHasher;
use crate::repository::Repository;
use crate::session_store::SqliteSessionStore;

pub mod academics;
pub mod auth;
pub mod dashboard;
pub mod envelope;
pub mod extract;
pub mod notices;
pub mod profile;
pub mod rate_limit;
pub mod validate;

use rate_limit::{RateLimitConfig, RateLimiter};

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub repo: Repository,
    pub hasher: PasswordHasher,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(repo: Repository, hasher: PasswordHasher, limits: RateLimitConfig) -> Self {
        Self {
            repo,
            hasher,
            limiter: Arc::new(RateLimiter::new(limits)),
        }
    }
}

/// Builds the full application router.
pub fn app(state: AppState, sessions: SessionManagerLayer<SqliteSessionStore>) -> Router {
    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/update-password", put(auth::update_password))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::current_user))
        .route(
            "/profile/{hallticketnumber}",
            get(profile::show).put(profile::update),
        )
        .route("/attendance/{hallticketnumber}", get(academics::attendance))
        .route("/marks/{hallticketnumber}", get(academics::marks))
        .route("/fees/{hallticketnumber}", get(academics::fees))
        .route("/timetable", get(academics::timetable))
        .route("/notifications", get(notices::notifications))
        .route("/assignments", get(notices::assignments))
        .route("/assignment-submissions", post(notices::submit))
        .route(
            "/assignment-submissions/{hallticketnumber}",
            get(notices::submissions),
        )
        .route("/dashboard/{hallticketnumber}", get(dashboard::dashboard))
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit,
        ));

    let router = Router::new()
        .nest("/api", api)
        .route("/health", get(health))
        .fallback(route_not_found)
        .layer(sessions)
        .layer(CompressionLayer::new())
        .layer(cors())
        .layer(middleware::from_fn(log_requests))
        .with_state(state);

    with_security_headers(router)
}

/// Echoes the caller's origin and allows credentials, so a browser client on
/// another origin can carry the session cookie.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

fn security_headers() -> [(HeaderName, HeaderValue); 8] {
    [
        (
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ),
        (
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=15552000; includeSubDomains"),
        ),
        (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN")),
        (header::REFERRER_POLICY, HeaderValue::from_static("no-referrer")),
        (header::X_DNS_PREFETCH_CONTROL, HeaderValue::from_static("off")),
        (header::X_XSS_PROTECTION, HeaderValue::from_static("0")),
        (
            HeaderName::from_static("x-permitted-cross-domain-policies"),
            HeaderValue::from_static("none"),
        ),
    ]
}

/// Adds the hardening headers to every response that does not set them itself.
fn with_security_headers(router: Router) -> Router {
    security_headers()
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(name, value))
        })
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Local calendar date, used for due-date and expiry comparisons.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

async fn route_not_found() -> PortalError {
    PortalError::not_found("Route not found")
}

/// One `info` event per request with method, path, status and latency.
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "handled request"
    );
    response
}
