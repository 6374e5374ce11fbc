#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use student_portal::api::rate_limit::RateLimitConfig;
use student_portal::repository::NewUser;
use student_portal::{app, db, AppState, PasswordHasher, Repository, SqliteSessionStore};
use tower::ServiceExt;
use tower_sessions::{Expiry, SessionManagerLayer};

/// bcrypt's minimum cost keeps the tests fast.
pub const TEST_COST: u32 = 4;

pub struct TestApp {
    pub router: Router,
    pub repo: Repository,
    pub hasher: PasswordHasher,
}

pub struct TestResponse {
    pub status: StatusCode,
    /// `name=value` of the first `Set-Cookie` header, if any.
    pub cookie: Option<String>,
    pub body: Value,
}

pub async fn test_app() -> TestApp {
    test_app_with_limits(RateLimitConfig::default()).await
}

pub async fn test_app_with_limits(limits: RateLimitConfig) -> TestApp {
    let conn = db::open_in_memory().await.unwrap();
    let repo = Repository::new(conn.clone());
    let hasher = PasswordHasher::new(TEST_COST);

    let sessions = SessionManagerLayer::new(SqliteSessionStore::new(conn))
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(1)));
    let router = app(AppState::new(repo.clone(), hasher, limits), sessions);

    TestApp {
        router,
        repo,
        hasher,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_owned);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            cookie,
            body,
        }
    }

    /// Sends a prebuilt request and returns the response untouched.
    pub async fn raw(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body), None).await
    }

    /// Inserts a student whose password is `password123`.
    pub async fn add_student(&self, hallticketnumber: &str, branch: &str) {
        let password_hash = self.hasher.hash("password123").await.unwrap();
        let slug = hallticketnumber.to_lowercase();
        self.repo
            .create_user(NewUser {
                name: format!("Student {hallticketnumber}"),
                username: slug.clone(),
                email: format!("{slug}@example.com"),
                phone: "9876500000".into(),
                branch: branch.into(),
                hallticketnumber: hallticketnumber.into(),
                password_hash,
            })
            .await
            .unwrap();
    }
}
