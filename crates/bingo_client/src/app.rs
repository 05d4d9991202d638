//! Main application logic and lifecycle management.
//!
//! This module contains the core `Application` struct that orchestrates
//! connection establishment, the per-session event loop, and reconnection.
//! Each connection gets a fresh reconciler; disconnecting discards all
//! session state and the server's full item resend rebuilds it.

use crate::{
    cli::CliArgs, config::AppConfig, logging::display_banner, signals, transport::WsTransport,
};
use anyhow::Context;
use bingo_protocol::{parse_server_events, ClientCommand, ConnectVersion, ServerEvent, GAME_NAME};
use bingo_session::{CommandSink, Reconciler, SessionError, SessionPhase, ITEMS_HANDLING_ALL};
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// How one connection session ended.
enum SessionOutcome {
    /// The user asked the process to stop
    Shutdown,
    /// The server went away; the application reconnects with fresh state
    Disconnected,
}

/// Main application struct.
///
/// The `Application` manages the complete lifecycle of the bingo client:
/// configuration loading, connection management, event dispatch into the
/// session core, and graceful shutdown handling.
pub struct Application {
    /// Loaded application configuration
    config: AppConfig,
}

impl Application {
    /// Creates a new application instance.
    ///
    /// Loads configuration, applies CLI overrides, validates settings, and
    /// displays the startup banner.
    ///
    /// # Arguments
    ///
    /// * `args` - Parsed command-line arguments
    pub async fn new(args: CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Loading configuration from: {}", args.config_path.display());
        let mut config = AppConfig::load_from_file(&args.config_path).await?;

        // Apply CLI overrides
        if let Some(url) = args.url {
            config.server.url = url;
        }

        if let Some(slot_name) = args.slot_name {
            config.server.slot_name = slot_name;
        }

        if args.password.is_some() {
            config.server.password = args.password;
        }

        if let Some(log_level) = args.log_level {
            config.logging.level = log_level;
        }

        if args.json_logs {
            config.logging.json_format = true;
        }

        // Validate configuration
        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        }
        info!("Configuration loaded and validated successfully");

        display_banner();
        info!(
            "Server: {} | Slot: {}",
            config.server.url, config.server.slot_name
        );

        Ok(Self { config })
    }

    /// Runs the connection loop until shutdown.
    ///
    /// A dropped connection is retried after the configured delay; every
    /// attempt starts a brand-new session with no carried-over board state.
    pub async fn run(&self) -> anyhow::Result<()> {
        loop {
            match self.run_session().await {
                Ok(SessionOutcome::Shutdown) => break,
                Ok(SessionOutcome::Disconnected) => {
                    warn!(
                        "Disconnected from server; reconnecting in {}s",
                        self.config.server.reconnect_delay_secs
                    );
                }
                Err(e) => {
                    error!(
                        "Session error: {e:#}; reconnecting in {}s",
                        self.config.server.reconnect_delay_secs
                    );
                }
            }

            let delay = Duration::from_secs(self.config.server.reconnect_delay_secs);
            tokio::select! {
                _ = signals::shutdown_signal() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!("Bingo client shut down");
        Ok(())
    }

    /// Runs one connection session to completion.
    async fn run_session(&self) -> anyhow::Result<SessionOutcome> {
        info!("Connecting to {}", self.config.server.url);
        let (ws_stream, _) = connect_async(self.config.server.url.as_str())
            .await
            .with_context(|| format!("failed to connect to {}", self.config.server.url))?;
        let (writer, mut reader) = ws_stream.split();

        let transport = Arc::new(WsTransport::new(writer));
        let reconciler = Reconciler::new(transport.clone());
        info!(session = %reconciler.session_id(), "🔗 Connection established");

        let mut requirement_announced = false;

        loop {
            tokio::select! {
                _ = signals::shutdown_signal() => {
                    info!("📡 Received shutdown signal - closing connection");
                    transport.close().await;
                    return Ok(SessionOutcome::Shutdown);
                }
                msg = reader.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        for event in parse_server_events(text.as_str()) {
                            let is_room_info = matches!(event, ServerEvent::RoomInfo { .. });
                            match reconciler.handle_event(event).await {
                                Ok(()) => {}
                                Err(SessionError::Transport(e)) => {
                                    warn!("Send failed mid-session: {e}");
                                    return Ok(SessionOutcome::Disconnected);
                                }
                                Err(SessionError::Internal(e)) => {
                                    // Malformed handshake data; the session
                                    // limps on and the next event may recover.
                                    warn!("Event rejected: {e}");
                                }
                            }
                            // RoomInfo opens the auth window: respond with
                            // the connect handshake once the seed is stored.
                            if is_room_info {
                                if let Err(e) = self.send_handshake(transport.as_ref()).await {
                                    warn!("Handshake send failed: {e}");
                                    return Ok(SessionOutcome::Disconnected);
                                }
                            }
                        }
                        if !requirement_announced
                            && reconciler.phase().await != SessionPhase::AwaitingBootstrap
                        {
                            info!("{}", reconciler.bingo_info().await);
                            requirement_announced = true;
                        }
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        if let Err(e) = transport.pong(payload).await {
                            warn!("Pong failed: {e}");
                            return Ok(SessionOutcome::Disconnected);
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        info!("Server closed the connection: {frame:?}");
                        return Ok(SessionOutcome::Disconnected);
                    }
                    Some(Ok(other)) => {
                        debug!("Ignoring non-text frame: {other:?}");
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {e}");
                        return Ok(SessionOutcome::Disconnected);
                    }
                    None => {
                        info!("Connection stream ended");
                        return Ok(SessionOutcome::Disconnected);
                    }
                }
            }
        }
    }

    /// Sends the connect/auth handshake for the configured slot.
    async fn send_handshake(&self, transport: &WsTransport) -> Result<(), SessionError> {
        transport
            .send(vec![ClientCommand::Connect {
                password: self.config.server.password.clone(),
                game: GAME_NAME.to_string(),
                name: self.config.server.slot_name.clone(),
                uuid: uuid::Uuid::new_v4().to_string(),
                version: ConnectVersion::default(),
                items_handling: ITEMS_HANDLING_ALL,
                tags: Vec::new(),
            }])
            .await
    }
}
