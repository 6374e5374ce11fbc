//! # Student Portal
//!
//! Backend of a student-information portal: registration and login,
//! profiles, attendance, marks, fees, timetable, notifications and
//! assignment submissions, served as JSON over [axum](https://crates.io/crates/axum)
//! with [Sea-ORM](https://crates.io/crates/sea-orm) on SQLite.
//!
//! The crate is layered leaf-first:
//!
//! - [`entity`] and [`migration`]: the schema.
//! - [`Repository`]: parameterized reads and writes, one per resource.
//! - [`aggregate`]: pure grouping and percentage summaries over query rows.
//! - [`api`]: the HTTP handlers, response envelope and rate limiting.
//!
//! Login sessions are kept by tower-sessions in the same database through
//! [`SqliteSessionStore`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use student_portal::api::rate_limit::RateLimitConfig;
//! use student_portal::{app, db, AppState, PasswordHasher, Repository, SqliteSessionStore};
//! use tower_sessions::{Expiry, SessionManagerLayer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = db::open("sqlite://student_portal.db?mode=rwc", 10).await?;
//! let sessions = SessionManagerLayer::new(SqliteSessionStore::new(conn.clone()))
//!     .with_secure(false)
//!     .with_expiry(Expiry::OnInactivity(time::Duration::hours(24)));
//! let state = AppState::new(
//!     Repository::new(conn),
//!     PasswordHasher::default(),
//!     RateLimitConfig::default(),
//! );
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//! axum::serve(listener, app(state, sessions)).await?;
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod migration;
pub mod password;
pub mod repository;
pub mod seed;
mod session_store;

pub use api::{app, AppState};
pub use error::{PortalError, Result};
pub use password::PasswordHasher;
pub use repository::Repository;

/// Sea-ORM backed store for tower-sessions login sessions.
pub use session_store::SqliteSessionStore;
