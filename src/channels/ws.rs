//! WebSocket conversation channel — one live conversation per connection.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use futures::stream;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

use crate::actions::{ActionDescriptor, ActionRegistry};
use crate::channels::{
    ActionResult, Channel, InboundEvent, InboundStream, Role, Turn, Utterance, UtteranceContent,
};
use crate::conversation::{ConversationSession, prompts};
use crate::error::ChannelError;
use crate::rooms::{RoomLease, RoomRegistry};

// ── JSON Protocol ───────────────────────────────────────────────────────

/// Message from client → server.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    Message {
        content: UtteranceContent,
    },
    ActionCall {
        call_id: String,
        name: String,
        #[serde(default)]
        arguments: serde_json::Value,
    },
}

impl From<ClientMessage> for InboundEvent {
    fn from(msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::Message { content } => InboundEvent::Utterance(Utterance {
                role: Role::User,
                content,
            }),
            ClientMessage::ActionCall {
                call_id,
                name,
                arguments,
            } => InboundEvent::ActionCall(crate::channels::ActionCall {
                call_id,
                name,
                arguments,
            }),
        }
    }
}

/// Message from server → client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    SessionStarted {
        room: String,
        instructions: &'static str,
        actions: Vec<ActionDescriptor>,
    },
    Turn {
        role: Role,
        content: String,
        at: DateTime<Utc>,
    },
    ActionResult {
        call_id: String,
        name: String,
        output: String,
        success: bool,
    },
    Error {
        message: String,
    },
}

// ── Shared State ────────────────────────────────────────────────────────

/// Axum handler state (cloneable).
#[derive(Clone)]
pub struct WsState {
    pub registry: Arc<ActionRegistry>,
    pub rooms: RoomRegistry,
}

#[derive(Debug, Deserialize)]
struct ConnectParams {
    room: Option<String>,
}

/// Build the router with the `/ws/conversation` endpoint.
pub fn conversation_routes(state: WsState) -> Router {
    Router::new()
        .route("/ws/conversation", get(ws_conversation_handler))
        .with_state(state)
}

// ── WsChannel ───────────────────────────────────────────────────────────

/// Channel half of one WebSocket connection.
///
/// The socket task pushes parsed client frames into `incoming`; the session
/// emits through `outgoing`, which the socket task drains to the client.
struct WsChannel {
    room: String,
    incoming_rx: Mutex<Option<mpsc::UnboundedReceiver<InboundEvent>>>,
    outgoing_tx: mpsc::UnboundedSender<ServerMessage>,
}

impl WsChannel {
    fn send(&self, msg: ServerMessage) -> Result<(), ChannelError> {
        self.outgoing_tx
            .send(msg)
            .map_err(|_| ChannelError::SendFailed {
                name: format!("ws:{}", self.room),
                reason: "client connection closed".to_string(),
            })
    }
}

#[async_trait]
impl Channel for WsChannel {
    fn name(&self) -> &str {
        "ws"
    }

    async fn start(&self) -> Result<InboundStream, ChannelError> {
        let rx = self
            .incoming_rx
            .lock()
            .await
            .take()
            .ok_or_else(|| ChannelError::StartupFailed {
                name: "ws".to_string(),
                reason: "start() already called".to_string(),
            })?;

        let stream = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        });

        Ok(Box::pin(stream))
    }

    async fn emit_turn(&self, turn: &Turn) -> Result<(), ChannelError> {
        self.send(ServerMessage::Turn {
            role: turn.role,
            content: turn.content.clone(),
            at: turn.at,
        })
    }

    async fn emit_action_result(&self, result: &ActionResult) -> Result<(), ChannelError> {
        self.send(ServerMessage::ActionResult {
            call_id: result.call_id.clone(),
            name: result.name.clone(),
            output: result.output.clone(),
            success: result.success,
        })
    }
}

// ── WebSocket Handler ───────────────────────────────────────────────────

async fn ws_conversation_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<WsState>,
) -> Response {
    let lease = match state.rooms.reserve(params.room.as_deref()) {
        Ok(lease) => lease,
        Err(taken) => {
            warn!(room = %taken.0, "Rejected connection to busy room");
            return (
                StatusCode::CONFLICT,
                Json(serde_json::json!({"error": taken.to_string()})),
            )
                .into_response();
        }
    };

    info!(room = lease.name(), "Conversation client connecting");
    ws.on_upgrade(move |socket| handle_conversation_socket(socket, state.registry, lease))
        .into_response()
}

async fn handle_conversation_socket(
    mut socket: WebSocket,
    registry: Arc<ActionRegistry>,
    lease: RoomLease,
) {
    let room = lease.name().to_string();
    info!(room = %room, "Conversation client connected");

    let started = ServerMessage::SessionStarted {
        room: room.clone(),
        instructions: prompts::INSTRUCTIONS,
        actions: registry.descriptors(),
    };
    if send_json(&mut socket, &started).await.is_err() {
        debug!(room = %room, "Client left before session start");
        return;
    }

    let (incoming_tx, incoming_rx) = mpsc::unbounded_channel();
    let (outgoing_tx, mut outgoing_rx) = mpsc::unbounded_channel();
    let channel = Arc::new(WsChannel {
        room: room.clone(),
        incoming_rx: Mutex::new(Some(incoming_rx)),
        outgoing_tx,
    });
    let session = ConversationSession::new(registry, channel)
        .with_label(room.clone())
        .spawn();

    loop {
        tokio::select! {
            // Forward conversation output to the client
            msg = outgoing_rx.recv() => {
                let Some(msg) = msg else {
                    debug!(room = %room, "Conversation output closed");
                    break;
                };
                if send_json(&mut socket, &msg).await.is_err() {
                    debug!(room = %room, "Client disconnected during send");
                    break;
                }
            }

            // Receive frames from the client
            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Text(text))) => {
                        match parse_client_frame(&text) {
                            Ok(event) => {
                                if incoming_tx.send(event).is_err() {
                                    warn!(room = %room, "Conversation input closed");
                                    break;
                                }
                            }
                            Err(e) => {
                                debug!(room = %room, error = %e, "Invalid frame from client");
                                let reply = ServerMessage::Error {
                                    message: e.to_string(),
                                };
                                if send_json(&mut socket, &reply).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(room = %room, "Conversation client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(room = %room, error = %e, "Conversation WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    // Ends the session's inbound stream; queued turns still drain.
    drop(incoming_tx);
    match session.await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => debug!(room = %room, error = %e, "Conversation ended early"),
        Err(e) => warn!(room = %room, error = %e, "Conversation task failed"),
    }

    drop(lease);
    info!(room = %room, "Conversation connection closed");
}

/// Parse one client text frame into an inbound event.
fn parse_client_frame(text: &str) -> Result<InboundEvent, ChannelError> {
    serde_json::from_str::<ClientMessage>(text)
        .map(InboundEvent::from)
        .map_err(|e| ChannelError::InvalidMessage(e.to_string()))
}

async fn send_json(socket: &mut WebSocket, msg: &ServerMessage) -> Result<(), axum::Error> {
    match serde_json::to_string(msg) {
        Ok(json) => socket.send(Message::Text(json.into())).await,
        Err(e) => {
            warn!(error = %e, "Failed to serialize server message");
            Ok(())
        }
    }
}
