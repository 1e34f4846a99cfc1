//! Integration tests for Campus Eats.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p campus-eats-integration-tests
//! ```
//!
//! No external services are needed. Tests that exercise the remote backend
//! start a [`StubBackend`] (an axum router on an ephemeral port) and point
//! the storefront at it; [`TestContext`] serves the storefront itself the
//! same way and talks to it with `reqwest`.
//!
//! # Test Categories
//!
//! - `cart` - Cart store behaviour and persistence
//! - `addresses` - Address book invariants
//! - `order_status` - Status machine and the order tracker
//! - `fallback` - Backend failure modes
//! - `storefront_api` - HTTP surface end to end

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use campus_eats_core::MemoryStore;
use campus_eats_storefront::config::{ApiConfig, StorefrontConfig};
use campus_eats_storefront::routes;
use campus_eats_storefront::state::AppState;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Address nothing listens on; connections are refused immediately.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

/// Serve `router` on an ephemeral local port.
async fn serve(router: Router) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let task = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok((addr, task))
}

/// A fake backend answering with whatever the router says.
pub struct StubBackend {
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl StubBackend {
    /// Start serving `router`.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start(router: Router) -> std::io::Result<Self> {
        let (addr, task) = serve(router).await?;
        Ok(Self { addr, task })
    }

    /// Base URL to configure the storefront with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Backend settings pointing at this stub.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        api_config(&self.base_url())
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Backend settings for `base_url` with a short timeout.
#[must_use]
pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(2),
    }
}

/// Storefront settings talking to `api`, with everything else defaulted.
#[must_use]
pub fn storefront_config(api: ApiConfig) -> StorefrontConfig {
    StorefrontConfig {
        api,
        ..StorefrontConfig::default()
    }
}

/// A fresh directory under the system temp dir, unique per call.
#[must_use]
pub fn scratch_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("campus-eats-{label}-{}", uuid::Uuid::new_v4().simple()))
}

/// A running storefront plus an HTTP client for it.
pub struct TestContext {
    pub client: reqwest::Client,
    pub storefront_url: String,
    task: JoinHandle<()>,
}

impl TestContext {
    /// Serve the storefront with in-memory snapshots.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be built or no port is free.
    pub async fn start(config: StorefrontConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let state = AppState::with_stores(
            config,
            Box::new(MemoryStore::new()),
            Box::new(MemoryStore::new()),
        )?;
        let (addr, task) = serve(routes::app(state)).await?;

        Ok(Self {
            client: reqwest::Client::new(),
            storefront_url: format!("http://{addr}"),
            task,
        })
    }

    /// Absolute URL for `path` on the storefront.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.task.abort();
    }
}
