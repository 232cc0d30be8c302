use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Fire-and-forget sink for named numeric samples. Publishing the same name
/// again overwrites the previous value; nothing is acknowledged.
#[allow(async_fn_in_trait)]
pub trait TelemetrySink {
    async fn put_number(&self, key: &str, value: f64);
}

type Store = Arc<RwLock<BTreeMap<String, Value>>>;

/// Named-value dashboard served over HTTP. The robot publishes samples into
/// it every cycle and reads operator entries back out, so the driver station
/// UI and the robot share one store.
#[derive(Clone, Default)]
pub struct Dashboard {
    values: Store,
}

impl Dashboard {
    /// Store without a server, for wiring and tests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store plus a background server task on the given port.
    pub fn init(port: u16) -> Self {
        let dashboard = Self::new();
        let values = dashboard.values.clone();

        tokio::spawn(async move {
            let app = Router::new()
                .route("/telemetry", get(all_values))
                .route("/telemetry/:key", get(get_value).put(put_value))
                .with_state(values);

            match TcpListener::bind(("0.0.0.0", port)).await {
                Ok(listener) => {
                    info!("telemetry dashboard listening on port {port}");
                    if let Err(e) = axum::serve(listener, app).await {
                        error!("telemetry server stopped: {e}");
                    }
                }
                Err(e) => error!("telemetry server failed to bind port {port}: {e}"),
            }
        });

        dashboard
    }

    /// Reads an operator-entered number, `None` if absent or not numeric.
    pub async fn get_number(&self, key: &str) -> Option<f64> {
        self.values.read().await.get(key).and_then(Value::as_f64)
    }
}

impl TelemetrySink for Dashboard {
    async fn put_number(&self, key: &str, value: f64) {
        self.values.write().await.insert(key.to_owned(), Value::from(value));
    }
}

async fn all_values(State(values): State<Store>) -> Json<BTreeMap<String, Value>> {
    Json(values.read().await.clone())
}

async fn get_value(
    Path(key): Path<String>,
    State(values): State<Store>,
) -> Result<Json<Value>, StatusCode> {
    values
        .read()
        .await
        .get(&key)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn put_value(
    Path(key): Path<String>,
    State(values): State<Store>,
    Json(value): Json<Value>,
) -> StatusCode {
    values.write().await.insert(key, value);
    StatusCode::NO_CONTENT
}

/// Capture sink: records every publish in order so tests can assert on the
/// exact samples a cycle produced.
#[derive(Clone, Default)]
pub struct SimTelemetry {
    samples: Rc<RefCell<Vec<(String, f64)>>>,
}

impl SimTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> Vec<(String, f64)> {
        self.samples.borrow().clone()
    }

    pub fn clear(&self) {
        self.samples.borrow_mut().clear();
    }
}

impl TelemetrySink for SimTelemetry {
    async fn put_number(&self, key: &str, value: f64) {
        self.samples.borrow_mut().push((key.to_owned(), value));
    }
}
