#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use games_catalogue_api::auth::{issue_token, permission, SigningKeys, TokenRequest};
use games_catalogue_api::database::models::NewGame;
use games_catalogue_api::database::{CatalogueStore, MemoryCatalogueStore};
use games_catalogue_api::{router, AppState};

/// Sign a token for `permissions` with `secret`
pub fn mint(secret: &str, permissions: &[&str]) -> String {
    let request = TokenRequest::new("test-runner", permissions.iter().copied());
    issue_token(secret, &request).expect("failed to mint test token")
}

/// The catalogue router over a fresh in-memory store. Each instance signs
/// with its own random secret, so no credential is shared between runs.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryCatalogueStore>,
    pub secret: String,
    pub admin_token: String,
    pub read_only_token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let secret = Uuid::new_v4().to_string();
        let store = MemoryCatalogueStore::new_shared();
        let state = AppState::new(store.clone(), SigningKeys::from_secret(&secret));

        Self {
            router: router(state),
            admin_token: mint(&secret, permission::ALL),
            read_only_token: mint(&secret, permission::READ_ONLY),
            store,
            secret,
        }
    }

    pub fn token(&self, permissions: &[&str]) -> String {
        mint(&self.secret, permissions)
    }

    pub fn token_for(&self, request: &TokenRequest) -> String {
        issue_token(&self.secret, request).expect("failed to mint test token")
    }

    /// Send a request and decode the JSON body (`Null` when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
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
        self.send_request(builder.body(body).expect("valid request")).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn admin(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, Some(&self.admin_token), body).await
    }

    /// Insert games straight into the store, returning their ids
    pub async fn seed_games(&self, count: usize) -> Vec<i32> {
        let mut ids = Vec::with_capacity(count);
        for n in 1..=count {
            let id = self
                .store
                .create_game(NewGame {
                    title: format!("Seed game {}", n),
                    rating: 5,
                    completed: n % 2 == 0,
                })
                .await
                .expect("seed game");
            ids.push(id);
        }
        ids
    }

    pub async fn game_count(&self) -> usize {
        self.store.list_games().await.expect("list games").len()
    }

    pub async fn character_count(&self) -> usize {
        self.store.list_characters().await.expect("list characters").len()
    }
}

/// The real server binary on a free port, killed on drop.
///
/// Uses the in-memory store unless `CATALOGUE_TEST_DATABASE_URL` points at a
/// PostgreSQL database.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub secret: String,
    child: Child,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let server = Self::spawn()?;
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let secret = Uuid::new_v4().to_string();

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_games-catalogue-api"));
        cmd.env("API_HOST", "127.0.0.1")
            .env("API_PORT", port.to_string())
            .env("AUTH_JWT_SECRET", &secret)
            // Blank values keep a developer's .env from pointing at a real IdP
            .env("AUTH_DOMAIN", "")
            .env("AUTH_JWKS_URL", "")
            .env("AUTH_ISSUER", "")
            .env("AUTH_AUDIENCE", "")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        match std::env::var("CATALOGUE_TEST_DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => {
                cmd.env("CATALOGUE_STORE", "postgres")
                    .env("DATABASE_URL", url)
                    .env("DATABASE_AUTO_MIGRATE", "true");
            }
            _ => {
                cmd.env("CATALOGUE_STORE", "memory");
            }
        }

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            secret,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        let url = format!("{}/health", self.base_url);
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn token(&self, permissions: &[&str]) -> String {
        mint(&self.secret, permissions)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
