//! Web server for the landing page.
//!
//! Serves the page, exposes the banner state over REST, and pushes every
//! surface mutation to connected browsers over a WebSocket.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{debug, info, warn};

use crate::display::SurfaceEvent;
use crate::error::{Result, RotatorError};
use crate::rotator::{DisplaySurface, MessageList, Opacity};

/// Landing page served when no web directory is configured
const EMBEDDED_PAGE: &str = include_str!("../web/index.html");

const ELEMENT_PLACEHOLDER: &str = "{{ELEMENT_ID}}";

/// Shared application state
pub struct AppState {
    pub element_id: String,
    pub messages: MessageList,
    pub interval: Duration,
    /// Directory with a custom `index.html`, instead of the embedded page
    pub web_dir: Option<PathBuf>,
    pub text: RwLock<String>,
    pub opacity: RwLock<Opacity>,
    pub broadcast_tx: broadcast::Sender<SurfaceEvent>,
}

/// API status response
#[derive(Serialize)]
struct StatusResponse {
    element: String,
    text: String,
    opacity: Opacity,
    messages: MessageList,
    interval_ms: u64,
}

impl AppState {
    pub fn new(
        element_id: String,
        messages: MessageList,
        interval: Duration,
        web_dir: Option<PathBuf>,
    ) -> Arc<Self> {
        let (broadcast_tx, _) = broadcast::channel(100);

        Arc::new(Self {
            element_id,
            messages,
            interval,
            web_dir,
            text: RwLock::new(String::new()),
            opacity: RwLock::new(Opacity::Opaque),
            broadcast_tx,
        })
    }

    /// Render the embedded page for this state's element id
    pub fn embedded_page(&self) -> String {
        EMBEDDED_PAGE.replace(ELEMENT_PLACEHOLDER, &self.element_id)
    }

    /// Current surface state, as the events a new client needs to catch up
    pub async fn snapshot(&self) -> Vec<SurfaceEvent> {
        vec![
            SurfaceEvent::text(&self.element_id, &self.text.read().await),
            SurfaceEvent::opacity(&self.element_id, *self.opacity.read().await),
        ]
    }

    fn broadcast(&self, event: SurfaceEvent) {
        // No subscribers is fine, nobody has the page open
        let _ = self.broadcast_tx.send(event);
    }
}

/// Look up the banner element on the served page and return a surface for it
pub async fn locate_surface(state: &Arc<AppState>) -> Result<WebSurface> {
    if !is_valid_element_id(&state.element_id) {
        return Err(RotatorError::SurfaceNotFound(state.element_id.clone()));
    }

    let page = match &state.web_dir {
        Some(dir) => tokio::fs::read_to_string(dir.join("index.html")).await?,
        None => state.embedded_page(),
    };

    if !find_element(&page, &state.element_id) {
        return Err(RotatorError::SurfaceNotFound(state.element_id.clone()));
    }

    Ok(WebSurface {
        state: state.clone(),
    })
}

/// Whether `id` is safe to use as an HTML id and a CSS `#id` selector.
///
/// Accepts `[A-Za-z][A-Za-z0-9_-]*`.
pub fn is_valid_element_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
        _ => false,
    }
}

/// Check whether `html` declares an element with the given id
pub fn find_element(html: &str, id: &str) -> bool {
    !id.is_empty()
        && (html.contains(&format!("id=\"{}\"", id)) || html.contains(&format!("id='{}'", id)))
}

/// Display surface backed by the landing page in every connected browser
#[derive(Clone)]
pub struct WebSurface {
    state: Arc<AppState>,
}

#[async_trait]
impl DisplaySurface for WebSurface {
    async fn set_opacity(&mut self, opacity: Opacity) -> Result<()> {
        *self.state.opacity.write().await = opacity;
        self.state
            .broadcast(SurfaceEvent::opacity(&self.state.element_id, opacity));
        Ok(())
    }

    async fn set_text(&mut self, text: &str) -> Result<()> {
        *self.state.text.write().await = text.to_string();
        self.state
            .broadcast(SurfaceEvent::text(&self.state.element_id, text));
        Ok(())
    }
}

/// Create the web server router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/api/status", get(get_status))
        .route("/ws", get(websocket_handler));

    let router = match &state.web_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.route("/", get(get_index)),
    };

    router.layer(cors).with_state(state)
}

/// Start the web server
pub async fn start_server(state: Arc<AppState>, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let router = create_router(state);

    info!("Web server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

// API Handlers

async fn get_index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.embedded_page())
}

async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        element: state.element_id.clone(),
        text: state.text.read().await.clone(),
        opacity: *state.opacity.read().await,
        messages: state.messages.clone(),
        interval_ms: state.interval.as_millis() as u64,
    })
}

// WebSocket handler

async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_websocket(socket, state))
}

async fn handle_websocket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before the snapshot so nothing falls between the two
    let mut rx = state.broadcast_tx.subscribe();

    for event in state.snapshot().await {
        if let Ok(json) = serde_json::to_string(&event) {
            if sender.send(Message::Text(json)).await.is_err() {
                return;
            }
        }
    }

    debug!("WebSocket client connected");

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Ok(event) => {
                        if let Ok(json) = serde_json::to_string(&event) {
                            if sender.send(Message::Text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("WebSocket client lagged, skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sender.send(Message::Pong(data)).await;
                    }
                    _ => {}
                }
            }
        }
    }

    debug!("WebSocket client disconnected");
}
