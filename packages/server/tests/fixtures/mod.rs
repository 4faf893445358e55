//! Shared test fixtures: an in-process server and websocket helpers.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use hearth_server::{
    config::ServerConfig,
    ui::{router, state::AppState},
};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A relay bound to an ephemeral port, serving for the lifetime of the
/// test process.
pub struct TestServer {
    addr: SocketAddr,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let state = Arc::new(AppState::new(config));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, router(state))
                .await
                .expect("Test server crashed");
        });

        Self { addr }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, query: &str) -> String {
        format!("ws://{}/ws?{}", self.addr, query)
    }
}

/// Connect a websocket client with the given query string.
pub async fn connect(server: &TestServer, query: &str) -> WsClient {
    let (ws, _) = connect_async(server.ws_url(query))
        .await
        .expect("Failed to connect websocket");
    ws
}

/// Send one JSON frame.
pub async fn send_json(ws: &mut WsClient, value: serde_json::Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("Failed to send frame");
}

/// Send one raw text frame, JSON or not.
pub async fn send_raw(ws: &mut WsClient, text: &str) {
    ws.send(Message::Text(text.to_string().into()))
        .await
        .expect("Failed to send frame");
}

/// Receive the next text frame as JSON, failing after two seconds.
pub async fn recv_json(ws: &mut WsClient) -> serde_json::Value {
    let frame = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match ws.next().await.expect("Connection closed") {
                Ok(Message::Text(text)) => break text,
                Ok(_) => continue,
                Err(e) => panic!("WebSocket error: {e}"),
            }
        }
    })
    .await
    .expect("Timed out waiting for a frame");

    serde_json::from_str(&frame).expect("Frame is not valid JSON")
}

/// Assert that no frame arrives within a short window.
pub async fn assert_silent(ws: &mut WsClient) {
    let result = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(result.is_err(), "Expected silence, got {result:?}");
}

/// Assert that the server has closed the connection.
pub async fn assert_closed(ws: &mut WsClient) {
    let outcome = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match ws.next().await {
                None => break,
                Some(Err(_)) => break,
                Some(Ok(Message::Close(_))) => break,
                Some(Ok(frame)) => panic!("expected close, got {frame:?}"),
            }
        }
    })
    .await;
    assert!(
        outcome.is_ok(),
        "Timed out waiting for the connection to close"
    );
}
