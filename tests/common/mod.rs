#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{http::StatusCode, response::IntoResponse, routing::post, Extension, Json, Router};
use board_core::board::STARTING_FEN;
use reqwest::Client;
use serde_json::{json, Value};
use viewer::clients::analysis::{AnalysisClient, DEFAULT_DEPTH};
use viewer::controller::{AnalysisPolicy, PositionController};
use viewer::{routes, session};

pub const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
pub const AFTER_E5: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2";

/// Canned reply for one FEN.
#[derive(Clone)]
pub struct Reply {
    pub delay: Duration,
    pub best_move: &'static str,
}

#[derive(Clone, Default)]
pub struct MockBehavior {
    pub status: Option<StatusCode>,
    pub replies: HashMap<String, Reply>,
}

#[derive(Clone)]
struct MockState {
    behavior: MockBehavior,
    requests: Arc<Mutex<Vec<Value>>>,
}

/// In-process stand-in for the remote analysis service.
pub struct MockAnalysis {
    pub url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockAnalysis {
    /// Request bodies received so far, in arrival order.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_fens(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|body| body["fen"].as_str().map(String::from))
            .collect()
    }
}

async fn analyze(Extension(state): Extension<MockState>, Json(body): Json<Value>) -> impl IntoResponse {
    let fen = body["fen"].as_str().unwrap_or_default().to_string();
    state.requests.lock().unwrap().push(body);

    let reply = state.behavior.replies.get(&fen).cloned();
    if let Some(reply) = &reply {
        tokio::time::sleep(reply.delay).await;
    }

    if let Some(status) = state.behavior.status {
        return (status, "engine unavailable").into_response();
    }

    let best_move = reply.map(|r| r.best_move).unwrap_or("e2e4");
    Json(json!({
        "evaluation": {"type": "cp", "value": 25},
        "best_move": best_move,
        "pv": [best_move],
        "depth": 15,
    }))
    .into_response()
}

pub async fn spawn_mock(behavior: MockBehavior) -> MockAnalysis {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        behavior,
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/analyze-position", post(analyze))
        .layer(Extension(state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockAnalysis {
        url: format!("http://{addr}/analyze-position"),
        requests,
    }
}

/// Start a viewer wired to `analysis_url` and return its base URL.
pub async fn spawn_viewer(analysis_url: &str, policy: AnalysisPolicy) -> String {
    let controller = PositionController::new(STARTING_FEN, DEFAULT_DEPTH, policy).unwrap();
    let client = AnalysisClient::new(analysis_url, Duration::from_secs(10)).unwrap();
    let handle = session::spawn(controller, client);
    let app = routes::app(handle);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// Build a reqwest client for tests.
pub fn client() -> Client {
    Client::new()
}

pub async fn get_state(client: &Client, base: &str) -> Value {
    client
        .get(format!("{base}/api/state"))
        .send()
        .await
        .expect("Failed to fetch state")
        .json()
        .await
        .expect("State is not JSON")
}

/// Drop a piece; returns the full `{accepted, state}` body.
pub async fn drop_piece(client: &Client, base: &str, from: &str, to: &str) -> Value {
    client
        .post(format!("{base}/api/moves"))
        .json(&json!({ "from": from, "to": to }))
        .send()
        .await
        .expect("Failed to send move")
        .json()
        .await
        .expect("Move response is not JSON")
}

pub async fn click(client: &Client, base: &str, square: &str) -> Value {
    client
        .post(format!("{base}/api/squares/{square}/click"))
        .send()
        .await
        .expect("Failed to send click")
        .json()
        .await
        .expect("Click response is not JSON")
}

pub async fn set_fen(client: &Client, base: &str, fen: &str) -> Value {
    client
        .put(format!("{base}/api/position"))
        .json(&json!({ "fen": fen }))
        .send()
        .await
        .expect("Failed to set position")
        .json()
        .await
        .expect("Position response is not JSON")
}

/// Poll until no analysis is in flight.
pub async fn wait_until_idle(client: &Client, base: &str) -> Value {
    for _ in 0..200 {
        let state = get_state(client, base).await;
        if state["is_loading"] == false {
            return state;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("analysis never settled");
}
