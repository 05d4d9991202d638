//! WebSocket transport: the client's implementation of the session core's
//! outbound seam.
//!
//! Owns the writer half of the socket behind a mutex so the reconciler and
//! the read loop (pong replies, close frames) can share it safely. The
//! reader half stays with the connection loop in `app`.

use async_trait::async_trait;
use bingo_protocol::ClientCommand;
use bingo_session::{CommandSink, SessionError};
use futures_util::sink::SinkExt;
use futures_util::stream::SplitSink;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::{Bytes, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;

/// The writer half of a client WebSocket connection.
pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Sends protocol frames over one WebSocket connection.
///
/// A `send` returning `Ok` means the socket-level send call completed - the
/// reconciler commits its goal transition on that, so commands are never
/// merely queued here.
pub struct WsTransport {
    writer: Mutex<WsWriter>,
}

impl WsTransport {
    /// Wraps the writer half of a freshly split connection.
    pub fn new(writer: WsWriter) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    async fn send_message(&self, message: Message) -> Result<(), SessionError> {
        self.writer
            .lock()
            .await
            .send(message)
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))
    }

    /// Replies to a server ping.
    pub async fn pong(&self, payload: Bytes) -> Result<(), SessionError> {
        self.send_message(Message::Pong(payload)).await
    }

    /// Sends a close frame. Failures are irrelevant at this point - the
    /// connection is going away either way.
    pub async fn close(&self) {
        let _ = self.send_message(Message::Close(None)).await;
    }
}

#[async_trait]
impl CommandSink for WsTransport {
    async fn send(&self, commands: Vec<ClientCommand>) -> Result<(), SessionError> {
        if commands.is_empty() {
            return Ok(());
        }
        let json =
            serde_json::to_string(&commands).map_err(|e| SessionError::Internal(e.to_string()))?;
        debug!(frame = %json, "sending command frame");
        self.send_message(Message::Text(json.into())).await
    }
}
