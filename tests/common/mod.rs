//! Common test utilities for integration tests.
//!
//! Fixtures for results payloads, in-process socket servers standing in for
//! the proxy's `/game_running` endpoint, and small waiting helpers.

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::watch;

/// Results URL used with the mock HTTP client.
pub const RESULTS_URL: &str = "http://127.0.0.1:8765/get_results";

/// A results payload with uneven rows, as the proxy produces them.
pub fn sample_results() -> Value {
    json!([
        {"Bot1": "alpha", "Bot2": "beta", "Winner": "alpha", "ReplayPath": "/home/arena/replays/1_alpha_vs_beta.SC2Replay"},
        {"Bot1": "gamma", "Bot2": "delta", "Result": "Tie"},
        {"Bot1": "alpha", "Bot2": "delta", "Winner": null, "ReplayPath": "C:\\arena\\replays\\3_alpha_vs_delta.SC2Replay"}
    ])
}

/// Wait until `rx` satisfies `f`, failing the test after two seconds.
pub async fn wait_until<T, F>(rx: &mut watch::Receiver<T>, f: F)
where
    F: FnMut(&T) -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(f))
        .await
        .expect("timed out waiting for watch value")
        .expect("watch sender dropped");
}

/// How the test socket server behaves once a client connects.
#[derive(Debug, Clone, Copy)]
pub enum ServerMode {
    /// Reflect every text frame back
    Echo,
    /// Send one status message then close cleanly with code 1000
    AnnounceAndClose,
    /// Drop the connection without a closing handshake
    Drop,
}

/// Start a socket server serving `/game_running` on a random port.
pub async fn start_socket_server(mode: ServerMode) -> SocketAddr {
    let app = Router::new().route(
        "/game_running",
        get(move |ws: WebSocketUpgrade| async move {
            ws.on_upgrade(move |socket| serve_socket(socket, mode))
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test socket server");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

async fn serve_socket(mut socket: WebSocket, mode: ServerMode) {
    match mode {
        ServerMode::Echo => {}
        ServerMode::AnnounceAndClose => {
            let _ = socket.send(Message::Text("Idle".to_string())).await;
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: 1000,
                    reason: "".into(),
                })))
                .await;
        }
        ServerMode::Drop => return,
    }

    // Keep reading after a close frame so the reply gets flushed
    while let Some(Ok(msg)) = socket.recv().await {
        if let Message::Text(text) = msg {
            if socket.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    }
}

