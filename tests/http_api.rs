//! HTTP API tests against the in-memory container runtime.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use startup_api::catalog::{Catalog, ProductEntry};
use startup_api::docker::{
    ContainerRuntime, ContainerSpec, ContainerState, InMemoryRuntime, RuntimeCall, RuntimeError,
};
use startup_api::orchestrator::{LaunchSettings, Orchestrator};
use startup_api::server::{AppState, build_router};

fn product(key: &str, port: u16, image: &str) -> ProductEntry {
    ProductEntry {
        key: key.into(),
        container_name: format!("garfenter-{key}"),
        port,
        image: image.into(),
        env: BTreeMap::new(),
    }
}

/// In-memory runtime whose `stop` takes a while, like a real container
/// honoring its stop timeout.
struct SlowStopRuntime {
    inner: Arc<InMemoryRuntime>,
    delay: Duration,
}

impl ContainerRuntime for SlowStopRuntime {
    fn create(&self, spec: &ContainerSpec) -> Result<(), RuntimeError> {
        self.inner.create(spec)
    }

    fn stop(&self, name: &str, timeout: Duration) -> Result<(), RuntimeError> {
        std::thread::sleep(self.delay);
        self.inner.stop(name, timeout)
    }

    fn remove(&self, name: &str) -> Result<(), RuntimeError> {
        self.inner.remove(name)
    }

    fn state(&self, name: &str) -> Result<ContainerState, RuntimeError> {
        self.inner.state(name)
    }
}

fn router(runtime: Arc<dyn ContainerRuntime>) -> Router {
    let catalog = Catalog::new(vec![
        product("tienda", 8000, "ghcr.io/saleor/saleor:3.19"),
        product("pos", 80, "opensourcepos/opensourcepos:latest"),
    ])
    .expect("valid catalog");
    let orchestrator = Orchestrator::new(Arc::new(catalog), runtime, LaunchSettings::default());
    build_router(Arc::new(AppState::new(orchestrator)))
}

/// Router over a two-product catalog, plus the runtime behind it.
fn setup() -> (Router, Arc<InMemoryRuntime>) {
    let runtime = Arc::new(InMemoryRuntime::new());
    (router(runtime.clone()), runtime)
}

/// Same as [`setup`], but every stop blocks for `delay`.
fn setup_slow(delay: Duration) -> (Router, Arc<InMemoryRuntime>) {
    let inner = Arc::new(InMemoryRuntime::new());
    let slow = SlowStopRuntime {
        inner: inner.clone(),
        delay,
    };
    (router(Arc::new(slow)), inner)
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request");
    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    (status, body.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, method, uri).await;
    let value = serde_json::from_slice(&body).expect("JSON body");
    (status, value)
}

#[tokio::test]
async fn health_returns_plain_ok() {
    let (app, _) = setup();
    let (status, body) = send(&app, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn unknown_product_is_404_on_every_route() {
    let (app, runtime) = setup();
    for (method, uri) in [
        (Method::POST, "/api/start/unknown-key"),
        (Method::GET, "/api/status/unknown-key"),
        (Method::POST, "/api/stop/unknown-key"),
        (Method::POST, "/start/unknown-key"),
    ] {
        let (status, body) = send_json(&app, method, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!({ "error": "Unknown" }), "{uri}");
    }
    assert!(runtime.calls().is_empty());
}

#[tokio::test]
async fn start_then_status_reports_single_running_product() {
    let (app, runtime) = setup();
    runtime.insert_running("garfenter-tienda", "ghcr.io/saleor/saleor:3.19");

    let (status, body) = send_json(&app, Method::POST, "/api/start/pos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "starting", "image": "opensourcepos/opensourcepos:latest" })
    );

    let (status, body) = send_json(&app, Method::GET, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "tienda": { "running": false, "image": "ghcr.io/saleor/saleor:3.19" },
            "pos": { "running": true, "image": "opensourcepos/opensourcepos:latest" },
        })
    );
}

#[tokio::test]
async fn repeated_start_reports_running_without_recreating() {
    let (app, runtime) = setup();
    send_json(&app, Method::POST, "/api/start/tienda").await;
    runtime.clear_calls();

    let (status, body) = send_json(&app, Method::POST, "/api/start/tienda").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert!(
        !runtime
            .calls()
            .iter()
            .any(|c| matches!(c, RuntimeCall::Create(_)))
    );
}

#[tokio::test]
async fn single_status_and_stop() {
    let (app, _) = setup();
    send_json(&app, Method::POST, "/start/pos").await;

    let (status, body) = send_json(&app, Method::GET, "/status/pos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["running"], true);

    let (status, body) = send_json(&app, Method::POST, "/api/stop/pos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "stopped" }));

    let (_, body) = send_json(&app, Method::GET, "/api/status/pos").await;
    assert_eq!(body["running"], false);
}

#[tokio::test]
async fn runtime_failure_is_500_with_message() {
    let (app, runtime) = setup();
    runtime.fail_create("Error response from daemon: pull access denied for hmis/hmis");

    let (status, body) = send_json(&app, Method::POST, "/api/start/pos").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "Error response from daemon: pull access denied for hmis/hmis" })
    );
}

#[tokio::test]
async fn unreachable_runtime_reads_as_nothing_running() {
    let (app, runtime) = setup();
    runtime.set_unreachable(true);

    let (status, body) = send_json(&app, Method::GET, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tienda"]["running"], false);
    assert_eq!(body["pos"]["running"], false);
}

#[tokio::test]
async fn concurrent_starts_leave_one_product_running() {
    let (app, runtime) = setup_slow(Duration::from_millis(100));

    let a = send_json(&app, Method::POST, "/api/start/tienda");
    let b = send_json(&app, Method::POST, "/api/start/pos");
    let ((sa, _), (sb, _)) = tokio::join!(a, b);
    assert_eq!(sa, StatusCode::OK);
    assert_eq!(sb, StatusCode::OK);

    assert_eq!(runtime.running().len(), 1);
}

#[tokio::test]
async fn abandoned_start_keeps_switch_lock_until_it_finishes() {
    let (app, runtime) = setup_slow(Duration::from_millis(150));

    // The client gives up while the first switch is still stopping containers.
    let abandoned = tokio::time::timeout(
        Duration::from_millis(50),
        send(&app, Method::POST, "/api/start/tienda"),
    )
    .await;
    assert!(abandoned.is_err(), "first start should still be in flight");

    let (status, body) = send_json(&app, Method::POST, "/api/start/pos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "starting");

    assert_eq!(runtime.running(), vec!["garfenter-pos"]);
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let (app, _) = setup();
    let (status, _) = send(&app, Method::GET, "/api/start/pos").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
