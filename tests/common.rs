use studio_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::{
        clock::ManualClock,
        factory::{assemble_state, Repositories},
    },
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::Value;

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Noon UTC on Monday 2026-10-19.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub clock: Arc<ManualClock>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            studio_timezone: "UTC".to_string(),
            admin_token: Some(ADMIN_TOKEN.to_string()),
            settings_cache_ttl_secs: 300,
        };

        let clock = Arc::new(ManualClock::new(fixed_now()));
        let state = Arc::new(assemble_state(&config, clock.clone(), Repositories::sqlite(pool.clone())));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            clock,
        }
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.router.clone().oneshot(
            Request::builder().method("GET").uri(uri)
                .body(Body::empty()).unwrap()
        ).await.unwrap()
    }

    pub async fn post(&self, uri: &str, body: Value) -> Response {
        self.send("POST", uri, Some(body), None).await
    }

    pub async fn admin_get(&self, uri: &str) -> Response {
        self.send("GET", uri, None, Some(ADMIN_TOKEN)).await
    }

    pub async fn admin_post(&self, uri: &str, body: Value) -> Response {
        self.send("POST", uri, Some(body), Some(ADMIN_TOKEN)).await
    }

    pub async fn admin_put(&self, uri: &str, body: Value) -> Response {
        self.send("PUT", uri, Some(body), Some(ADMIN_TOKEN)).await
    }

    pub async fn admin_delete(&self, uri: &str) -> Response {
        self.send("DELETE", uri, None, Some(ADMIN_TOKEN)).await
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
