#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use blog_api::auth::password::hash_password;
use blog_api::config::AppConfig;
use blog_api::database::{BlogInput, NewUser, TodoInput};
use blog_api::state::AppState;

pub const PASSWORD: &str = "password123";

/// Router over a fresh in-memory database, driven with `oneshot`
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

/// A seeded account and a bearer token for it
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub token: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let state = AppState::connect(AppConfig::for_tests())
            .await
            .expect("failed to open test database");
        let router = blog_api::app(state.clone());
        Self { state, router }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        self.send(request).await
    }

    /// Send a raw body, for malformed-JSON cases
    pub async fn request_raw(&self, method: Method, uri: &str, token: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = builder.body(Body::from(body.to_string())).expect("failed to build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    pub async fn user(&self, name: &str, email: &str, is_admin: bool) -> TestUser {
        let user = self
            .state
            .users()
            .create(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: hash_password(PASSWORD).expect("hashing failed"),
                is_admin,
            })
            .await
            .expect("failed to seed user");
        let token = self.state.tokens.issue(user.id).expect("failed to sign token");
        TestUser {
            id: user.id,
            email: user.email,
            token,
        }
    }

    pub async fn member(&self) -> TestUser {
        self.user("Member", "member@example.com", false).await
    }

    pub async fn other_member(&self) -> TestUser {
        self.user("Other", "other@example.com", false).await
    }

    /// Regular registration followed by promotion, as `blog-admin promote` does
    pub async fn admin(&self) -> TestUser {
        let admin = self.user("Admin", "admin@example.com", false).await;
        self.state
            .users()
            .set_admin(&admin.email, true)
            .await
            .expect("failed to promote admin");
        admin
    }

    pub async fn category(&self, title: &str) -> i64 {
        self.state
            .categories()
            .create(title)
            .await
            .expect("failed to seed category")
            .id
    }

    pub async fn blog(&self, user_id: i64, category_id: i64, title: &str) -> i64 {
        self.state
            .blogs()
            .create(
                user_id,
                BlogInput {
                    category_id,
                    title: title.to_string(),
                    image_url: "https://example.com/cover.png".to_string(),
                    content: "Lorem ipsum".to_string(),
                },
            )
            .await
            .expect("failed to seed blog")
            .id
    }

    pub async fn todo(&self, user_id: i64, title: &str) -> i64 {
        self.state
            .todos()
            .create(
                user_id,
                TodoInput {
                    title: title.to_string(),
                    description: String::new(),
                },
            )
            .await
            .expect("failed to seed todo")
            .id
    }
}

pub fn blog_body(category_id: i64, title: &str) -> Value {
    json!({
        "category_id": category_id,
        "title": title,
        "image_url": "https://example.com/cover.png",
        "content": "Lorem ipsum"
    })
}

pub fn assert_denied(status: StatusCode, body: &Value, expected: StatusCode, message: &str) {
    assert_eq!(status, expected, "unexpected body: {body}");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], message);
}

/// The server binary on a random port with its own SQLite file
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    database_path: PathBuf,
    child: Child,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let server = Self::spawn()?;
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let database_path = std::env::temp_dir().join(format!("blog-api-test-{}.sqlite", port));
        let _ = std::fs::remove_file(&database_path);

        let child = Command::new(env!("CARGO_BIN_EXE_blog-api"))
            .env("PORT", port.to_string())
            .env("DATABASE_URL", format!("sqlite://{}?mode=rwc", database_path.display()))
            .env("JWT_SECRET", "smoke-test-secret")
            .env("APP_ENV", "development")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            database_path,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_file(&self.database_path);
    }
}
