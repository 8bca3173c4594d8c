//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use hiroba_shared::protocol::{
    ClientFrame, Decoded, MessagePayload, RequestId, ServerFrame, decode_client_frame,
    encode_frame,
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{PusherChannel, RoomId, UserId},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Forwards queued frames to the WebSocket until the queue or the socket closes.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Per-connection state: who is connected and which room they are in.
struct Connection {
    state: Arc<AppState>,
    user_id: UserId,
    current_room: Option<RoomId>,
    /// Same channel the MessagePusher uses, so replies and broadcasts stay ordered
    outbound: PusherChannel,
}

impl Connection {
    fn reply(&self, frame: &ServerFrame) {
        match encode_frame(frame) {
            Ok(json) => {
                if self.outbound.send(json).is_err() {
                    tracing::debug!("User '{}' is gone, reply dropped", self.user_id);
                }
            }
            Err(e) => tracing::error!("{}", e),
        }
    }

    fn reply_error(&self, request_id: Option<RequestId>, message: String) {
        self.reply(&ServerFrame::Error {
            request_id,
            message,
        });
    }

    async fn handle_text(&mut self, text: &str) {
        match decode_client_frame(text) {
            Ok(Decoded::Frame(frame)) => self.handle_frame(frame).await,
            Ok(Decoded::Unknown(tag)) => {
                tracing::warn!("Unknown frame type '{}' from '{}'", tag, self.user_id);
                self.reply_error(None, format!("unknown frame type '{}'", tag));
            }
            Err(e) => {
                tracing::warn!("Rejected frame from '{}': {}", self.user_id, e);
                self.reply_error(None, e.to_string());
            }
        }
    }

    async fn handle_frame(&mut self, frame: ClientFrame) {
        match frame {
            ClientFrame::CreateChatRoom {
                request_id,
                nickname,
                user_icon: _,
            } => match self.state.create_room_usecase.execute(nickname).await {
                Ok(room_id) => self.reply(&ServerFrame::RoomCreated {
                    request_id,
                    room_id: room_id.into_string(),
                }),
                Err(e) => {
                    tracing::warn!("Create room failed for '{}': {}", self.user_id, e);
                    self.reply_error(Some(request_id), e.to_string());
                }
            },
            ClientFrame::JoinChatRoom {
                request_id,
                nickname,
                room_id,
                user_icon,
            } => {
                let result = self
                    .state
                    .join_room_usecase
                    .execute(
                        &self.user_id,
                        nickname,
                        user_icon,
                        room_id,
                        self.current_room.as_ref(),
                    )
                    .await;
                match result {
                    Ok(joined) => {
                        self.current_room = Some(joined.room_id.clone());
                        self.reply(&ServerFrame::RoomJoined {
                            request_id,
                            room_id: joined.room_id.as_str().to_string(),
                            messages: joined.messages.iter().map(MessagePayload::from).collect(),
                        });
                        self.state
                            .join_room_usecase
                            .broadcast_user_list(&joined.room_id)
                            .await;
                    }
                    Err(e) => {
                        tracing::warn!("Join room failed for '{}': {}", self.user_id, e);
                        self.reply_error(Some(request_id), e.to_string());
                    }
                }
            }
            ClientFrame::SendMessage {
                request_id,
                room_id,
                body,
                is_system_message,
                user_icon,
            } => {
                let result = self
                    .state
                    .send_message_usecase
                    .execute(
                        &self.user_id,
                        self.current_room.as_ref(),
                        &room_id,
                        body,
                        is_system_message,
                        user_icon,
                    )
                    .await;
                match (result, request_id) {
                    (Ok(sent), Some(request_id)) => {
                        tracing::debug!(
                            "Message from '{}' delivered to {} members",
                            self.user_id,
                            sent.recipients.len()
                        );
                        self.reply(&ServerFrame::Ack { request_id });
                    }
                    (Ok(_), None) => {}
                    (Err(e), request_id) => {
                        tracing::warn!("Send message failed for '{}': {}", self.user_id, e);
                        self.reply_error(request_id, e.to_string());
                    }
                }
            }
            ClientFrame::SetTypingPresence { room_id } => {
                if let Err(e) = self
                    .state
                    .typing_usecase
                    .execute(&self.user_id, self.current_room.as_ref(), &room_id)
                    .await
                {
                    tracing::debug!("Typing signal from '{}' ignored: {}", self.user_id, e);
                }
            }
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    // The userId frame is queued before the pusher loop starts, so it goes out first
    let user_id = state.connect_user_usecase.execute(tx.clone()).await;
    tracing::info!("User '{}' connected", user_id);

    let mut send_task = pusher_loop(rx, sender);
    let mut connection = Connection {
        state: state.clone(),
        user_id,
        current_room: None,
        outbound: tx,
    };

    loop {
        tokio::select! {
            msg = receiver.next() => {
                let msg = match msg {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                };
                match msg {
                    Message::Text(text) => {
                        tracing::debug!("Received from '{}': {}", connection.user_id, text.as_str());
                        connection.handle_text(text.as_str()).await;
                    }
                    Message::Close(_) => {
                        tracing::info!("User '{}' requested close", connection.user_id);
                        break;
                    }
                    _ => {}
                }
            }
            _ = &mut send_task => break,
        }
    }

    let Connection {
        user_id,
        current_room,
        outbound,
        ..
    } = connection;
    drop(outbound);
    state
        .disconnect_user_usecase
        .execute(&user_id, current_room.as_ref())
        .await;
    send_task.abort();
    tracing::info!("User '{}' disconnected", user_id);
}
