//! Page server.
//!
//! Serves the page shell, pushes page updates over a WebSocket and turns the
//! page controls into dashboard actions.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};

use super::html::PAGE_HTML;
use crate::adapters::MemoryPage;
use crate::dashboard::Dashboard;
use crate::error::{ChannelError, DashboardError};

/// Shared state for the page server handlers.
#[derive(Clone)]
pub struct PageServerState {
    pub page: Arc<MemoryPage>,
    pub dashboard: Arc<Dashboard>,
}

/// Body of `POST /send`.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub message: String,
}

/// Body returned by `POST /reconnect`.
#[derive(Debug, Serialize)]
pub struct ChannelStateResponse {
    pub state: String,
}

/// Build the router for `state`.
pub fn router(state: PageServerState) -> Router {
    // Configure CORS for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let replay_path = format!(
        "{}/:file",
        state
            .dashboard
            .config()
            .table
            .replay_route
            .trim_end_matches('/')
    );

    Router::new()
        .route("/", get(page_handler))
        .route("/state", get(state_handler))
        .route("/ws", get(websocket_handler))
        .route("/send", post(send_handler))
        .route("/clear", post(clear_handler))
        .route("/refresh", post(refresh_handler))
        .route("/reconnect", post(reconnect_handler))
        .route(&replay_path, get(replay_handler))
        .route("/signout", get(signout_handler))
        .layer(cors)
        .with_state(state)
}

/// Start the page server on `addr`.
///
/// Returns the server task and the address actually bound, so tests can
/// pass port 0.
pub async fn start_page_server_on(
    addr: SocketAddr,
    state: PageServerState,
) -> color_eyre::Result<(JoinHandle<()>, SocketAddr)> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!("Dashboard page at http://{}", actual_addr);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Page server error: {}", e);
        }
    });

    Ok((handle, actual_addr))
}

fn error_response(err: DashboardError) -> Response {
    let status = match &err {
        DashboardError::Channel(ChannelError::NotConnected) => StatusCode::CONFLICT,
        DashboardError::Channel(_) | DashboardError::Results(_) => StatusCode::BAD_GATEWAY,
        DashboardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string()).into_response()
}

async fn page_handler() -> impl IntoResponse {
    Html(PAGE_HTML)
}

async fn state_handler(State(state): State<PageServerState>) -> impl IntoResponse {
    Json(state.page.snapshot())
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<PageServerState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Forward page updates to one browser until it goes away.
async fn handle_websocket(socket: WebSocket, state: PageServerState) {
    let (mut sender, mut receiver) = socket.split();
    let mut update_rx = state.page.subscribe();

    let send_task = tokio::spawn(async move {
        loop {
            match update_rx.recv().await {
                Ok(update) => match serde_json::to_string(&update) {
                    Ok(json) => {
                        if sender.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to serialize page update: {}", e);
                    }
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // The next update of each element carries its full content
                    tracing::warn!("Page client lagged, missed {} updates", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Close(_)) | Err(_) => break,
            _ => {}
        }
    }

    send_task.abort();
}

async fn send_handler(
    State(state): State<PageServerState>,
    Json(request): Json<SendRequest>,
) -> Response {
    match state.dashboard.send_message(&request.message).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::warn!("Send from page failed: {}", e);
            error_response(e)
        }
    }
}

async fn clear_handler(State(state): State<PageServerState>) -> Response {
    match state.dashboard.clear_results().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::warn!("Clearing results failed: {}", e);
            error_response(e)
        }
    }
}

async fn refresh_handler(State(state): State<PageServerState>) -> StatusCode {
    state.dashboard.refresh();
    StatusCode::NO_CONTENT
}

async fn reconnect_handler(State(state): State<PageServerState>) -> Response {
    match state.dashboard.reconnect().await {
        Ok(channel_state) => Json(ChannelStateResponse {
            state: channel_state.to_string(),
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn replay_handler(
    State(state): State<PageServerState>,
    Path(file): Path<String>,
) -> Redirect {
    Redirect::temporary(&state.dashboard.config().replay_url(&file))
}

async fn signout_handler(State(state): State<PageServerState>) -> Redirect {
    Redirect::temporary(&state.dashboard.config().signout_url())
}
