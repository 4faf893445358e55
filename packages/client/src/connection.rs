//! WebSocket connection wrapper.

use std::collections::VecDeque;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, Message},
};

use hearth_server::infrastructure::dto::websocket::{ClientAction, ServerEvent};

/// Connect-time credential. The server accepts exactly one of the two.
#[derive(Debug, Clone)]
pub enum Credential {
    /// JWT from the login service, sent as `bearer=<token>`
    Bearer(String),
    /// Ephemeral identity, sent as `name=<displayName>`
    Name(String),
}

impl Credential {
    fn query(&self) -> String {
        match self {
            Credential::Bearer(token) => format!("bearer={token}"),
            Credential::Name(name) => format!("name={name}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("undecodable event: {0}")]
    BadEvent(#[from] serde_json::Error),

    #[error("connection closed by the server")]
    Closed,
}

/// One live connection to the relay.
pub struct ClientConnection {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    /// Events decoded ahead of the caller (servers may batch frames with
    /// newlines)
    pending: VecDeque<ServerEvent>,
}

impl ClientConnection {
    /// Open a connection to `url` (e.g. `ws://localhost:8080/ws`) with
    /// the given credential.
    pub async fn connect(url: &str, credential: &Credential) -> Result<Self, ClientError> {
        let full_url = format!("{}?{}", url, credential.query());
        let (ws, _) = connect_async(&full_url).await?;
        tracing::debug!("Connected to {}", url);
        Ok(Self {
            ws,
            pending: VecDeque::new(),
        })
    }

    /// Send one action frame.
    pub async fn send(&mut self, action: &ClientAction) -> Result<(), ClientError> {
        let frame = serde_json::to_string(action)?;
        self.ws.send(Message::Text(frame.into())).await?;
        Ok(())
    }

    /// Receive the next server event. Frames batched into one websocket
    /// message are split and drained in order.
    pub async fn next_event(&mut self) -> Result<ServerEvent, ClientError> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(event);
            }

            let msg = match self.ws.next().await {
                Some(msg) => msg?,
                None => return Err(ClientError::Closed),
            };

            match msg {
                Message::Text(text) => {
                    for line in text.lines().filter(|line| !line.trim().is_empty()) {
                        match serde_json::from_str::<ServerEvent>(line) {
                            Ok(event) => self.pending.push_back(event),
                            Err(e) => {
                                tracing::warn!("Skipping undecodable event: {}", e);
                            }
                        }
                    }
                }
                Message::Close(_) => return Err(ClientError::Closed),
                _ => {}
            }
        }
    }

    /// Close the connection cleanly.
    pub async fn close(&mut self) -> Result<(), ClientError> {
        self.ws.close(None).await?;
        Ok(())
    }
}
