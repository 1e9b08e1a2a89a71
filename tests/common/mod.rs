#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use flashcards_backend::db::config::DbConfig;
use flashcards_backend::db::{schema, Database};
use flashcards_backend::state::AppState;

pub struct TestApp {
    pub app: Router,
    pub db: Database,
    _dir: TempDir,
}

pub fn sqlite_config(dir: &TempDir) -> DbConfig {
    let db_path = dir.path().join("flashcards.db");
    let url = format!("sqlite:{}?mode=rwc", db_path.display());
    let mut config = DbConfig::for_url(url).expect("sqlite url is supported");
    config.pool.max_connections = 2;
    config.pool.acquire_timeout = Duration::from_secs(5);
    config.startup.max_retries = 3;
    config.startup.delay = Duration::from_millis(10);
    config
}

/// Database whose file can never be opened: its parent directory is missing.
pub fn unreachable_config(dir: &TempDir) -> DbConfig {
    let db_path = dir.path().join("missing").join("nested").join("flashcards.db");
    let url = format!("sqlite:{}?mode=rw", db_path.display());
    let mut config = DbConfig::for_url(url).expect("sqlite url is supported");
    config.pool.acquire_timeout = Duration::from_millis(500);
    config.startup.max_retries = 2;
    config.startup.delay = Duration::from_millis(10);
    config
}

/// MySQL endpoint on a port nothing listens on; connecting is refused.
pub fn refused_mysql_config() -> DbConfig {
    let mut config =
        DbConfig::for_url("mysql://root@127.0.0.1:1/anki").expect("mysql url is supported");
    config.pool.acquire_timeout = Duration::from_secs(2);
    config.startup.max_retries = 2;
    config.startup.delay = Duration::from_millis(10);
    config
}

pub async fn create_test_app() -> TestApp {
    let dir = TempDir::new().expect("failed to create temp dir");
    let db = Database::connect_lazy(sqlite_config(&dir)).expect("pool builds");
    schema::ensure_schema(&db).await.expect("schema bootstraps");

    TestApp {
        app: flashcards_backend::create_app(AppState::new(db.clone())),
        db,
        _dir: dir,
    }
}

pub async fn create_unreachable_app() -> TestApp {
    let dir = TempDir::new().expect("failed to create temp dir");
    let db = Database::connect_lazy(unreachable_config(&dir)).expect("pool builds");

    TestApp {
        app: flashcards_backend::create_app(AppState::new(db.clone())),
        db,
        _dir: dir,
    }
}

pub async fn create_refused_mysql_app() -> TestApp {
    let dir = TempDir::new().expect("failed to create temp dir");
    let db = Database::connect_lazy(refused_mysql_config()).expect("pool builds");

    TestApp {
        app: flashcards_backend::create_app(AppState::new(db.clone())),
        db,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, body).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    /// Sends `body` verbatim, for payloads that are not valid JSON.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: &'static str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, json)
    }
}
