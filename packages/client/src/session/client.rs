//! WebSocket session client.

use std::sync::{Arc, Mutex};

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::{
    net::TcpStream,
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use hiroba_shared::protocol::{ClientFrame, encode_frame};

use crate::{config::SessionConfig, error::SessionError};

use super::{
    context::SessionContext,
    dispatch::Dispatcher,
    event::{JoinedRoom, RoomId, SessionEvent},
    lock,
    pending::{AckCallback, PendingGuard, PendingRequest, PendingRequests},
    state::ConnectionState,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Client side of one chat session.
///
/// Holds at most one connection. Every inbound notification is delivered,
/// in arrival order, on the receiver returned by [`connect`](Self::connect).
/// The connection is released by [`teardown`](Self::teardown) or on drop.
///
/// # Example
///
/// ```no_run
/// use hiroba_client::{SessionClient, SessionConfig, SessionEvent};
///
/// # async fn demo() -> Result<(), hiroba_client::SessionError> {
/// let mut client = SessionClient::new(SessionConfig::new("ws://127.0.0.1:8080/ws", "alice"));
/// let mut events = client.connect().await;
/// if let Some(SessionEvent::Ready) = events.recv().await {
///     let room_id = client.create_room("alice", None).await?;
///     let joined = client.join_room("alice", room_id.as_str()).await?;
///     client.send_message(&joined.room_id, "hello", false);
/// }
/// client.teardown();
/// # Ok(())
/// # }
/// ```
pub struct SessionClient {
    config: SessionConfig,
    state: Arc<watch::Sender<ConnectionState>>,
    context: Arc<Mutex<SessionContext>>,
    pending: Arc<Mutex<PendingRequests>>,
    /// Outbound queue drained by the writer task; `None` unless connected
    outbound: Option<mpsc::UnboundedSender<ClientFrame>>,
    reader_task: Option<JoinHandle<()>>,
}

impl SessionClient {
    /// Create a session in the `Disconnected` state.
    pub fn new(config: SessionConfig) -> Self {
        let context = SessionContext::from_config(&config);
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            config,
            state: Arc::new(state),
            context: Arc::new(Mutex::new(context)),
            pending: Arc::new(Mutex::new(PendingRequests::default())),
            outbound: None,
            reader_task: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Watch connection state changes
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Snapshot of the session context
    pub fn context(&self) -> SessionContext {
        lock(&self.context).clone()
    }

    /// Establish the connection and return the session's event receiver.
    ///
    /// Yields `Ready` once connected and `Closed` when the transport closes.
    /// A failed attempt is reported as `Closed` and is not retried. Called in
    /// any state other than `Disconnected`, the existing connection is left
    /// alone and the returned receiver yields a single `Closed`.
    pub async fn connect(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let current = self.state();
        if current != ConnectionState::Disconnected {
            tracing::warn!(
                "connect() called while {}; a session holds at most one connection",
                current
            );
            let _ = event_tx.send(SessionEvent::Closed {
                reason: Some(format!("session is already {}", current)),
            });
            return event_rx;
        }

        transition(&self.state, ConnectionState::Connecting);
        tracing::info!(
            "Connecting to {} as '{}'",
            self.config.url,
            self.config.nickname
        );

        let ws_stream = match connect_async(self.config.url.as_str()).await {
            Ok((ws_stream, _response)) => ws_stream,
            Err(e) => {
                let error = SessionError::Connection(e.to_string());
                tracing::error!("{}", error);
                transition(&self.state, ConnectionState::Closed);
                let _ = event_tx.send(SessionEvent::Closed {
                    reason: Some(error.to_string()),
                });
                return event_rx;
            }
        };

        let (write, read) = ws_stream.split();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(writer_loop(write, outbound_rx));
        self.outbound = Some(outbound_tx);

        transition(&self.state, ConnectionState::Ready);
        tracing::info!("Connected to chat server!");
        let _ = event_tx.send(SessionEvent::Ready);

        let dispatcher = Dispatcher::new(self.pending.clone(), self.context.clone(), event_tx);
        self.reader_task = Some(tokio::spawn(reader_loop(
            read,
            dispatcher,
            self.state.clone(),
        )));

        event_rx
    }

    /// Ask the server for a new room.
    ///
    /// The returned id is also recorded in the context's created rooms.
    ///
    /// # Errors
    ///
    /// `RoomCreation` if the nickname is blank, the session is not `Ready`, or
    /// the server refuses; `Connection` if the session closes while waiting.
    pub async fn create_room(
        &self,
        nickname: &str,
        icon: Option<&str>,
    ) -> Result<RoomId, SessionError> {
        let result = self.request_room_creation(nickname, icon).await;
        match &result {
            Ok(room_id) => tracing::info!("Room {} created", room_id),
            Err(e) => tracing::warn!("{}", e),
        }
        result
    }

    async fn request_room_creation(
        &self,
        nickname: &str,
        icon: Option<&str>,
    ) -> Result<RoomId, SessionError> {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(SessionError::RoomCreation(
                "nickname must not be empty".to_string(),
            ));
        }
        let outbound = self.ready_outbound().ok_or_else(|| {
            SessionError::RoomCreation(format!("connection is {}", self.state()))
        })?;

        let (tx, rx) = oneshot::channel();
        let request_id = lock(&self.pending).register(PendingRequest::CreateRoom(tx));
        let _guard = PendingGuard::new(&self.pending, request_id);
        let frame = ClientFrame::CreateChatRoom {
            request_id,
            nickname: nickname.to_string(),
            user_icon: icon.map(str::to_string),
        };
        if outbound.send(frame).is_err() {
            return Err(SessionError::RoomCreation(
                "connection is closed".to_string(),
            ));
        }

        match rx.await {
            Ok(Ok(room_id)) => {
                lock(&self.context).record_created_room(room_id.clone());
                Ok(room_id)
            }
            Ok(Err(reason)) => Err(SessionError::RoomCreation(reason)),
            Err(_) => Err(SessionError::Connection(
                "session closed before the room was created".to_string(),
            )),
        }
    }

    /// Join an existing room and fetch its history.
    ///
    /// On success the room becomes the session's current room, replacing any
    /// previous one. Only one join may be in flight at a time.
    ///
    /// # Errors
    ///
    /// `RoomJoin` if the room id is blank, the session is not `Ready`, another
    /// join is in flight, or the server refuses (unknown room, room full);
    /// `Connection` if the session closes while waiting.
    pub async fn join_room(
        &self,
        nickname: &str,
        room_id: &str,
    ) -> Result<JoinedRoom, SessionError> {
        let result = self.request_room_join(nickname, room_id).await;
        match &result {
            Ok(joined) => tracing::info!(
                "Joined room {} ({} prior messages)",
                joined.room_id,
                joined.prior_messages.len()
            ),
            Err(e) => tracing::warn!("{}", e),
        }
        result
    }

    async fn request_room_join(
        &self,
        nickname: &str,
        room_id: &str,
    ) -> Result<JoinedRoom, SessionError> {
        let room_id = RoomId::new(room_id)
            .ok_or_else(|| SessionError::RoomJoin("room id must not be empty".to_string()))?;
        let nickname = nickname.trim();
        let outbound = self
            .ready_outbound()
            .ok_or_else(|| SessionError::RoomJoin(format!("connection is {}", self.state())))?;

        let (tx, rx) = oneshot::channel();
        let request_id = {
            let mut pending = lock(&self.pending);
            if pending.has_join_in_flight() {
                return Err(SessionError::RoomJoin(
                    "another join is already in flight".to_string(),
                ));
            }
            pending.register(PendingRequest::JoinRoom(tx))
        };
        let _guard = PendingGuard::new(&self.pending, request_id);
        let user_icon = lock(&self.context).icon.clone();
        let frame = ClientFrame::JoinChatRoom {
            request_id,
            nickname: nickname.to_string(),
            room_id: room_id.into_string(),
            user_icon,
        };
        if outbound.send(frame).is_err() {
            return Err(SessionError::RoomJoin("connection is closed".to_string()));
        }

        match rx.await {
            Ok(Ok(joined)) => {
                lock(&self.context).enter_room(joined.room_id.clone(), nickname);
                Ok(joined)
            }
            Ok(Err(reason)) => Err(SessionError::RoomJoin(reason)),
            Err(_) => Err(SessionError::Connection(
                "session closed before the room was joined".to_string(),
            )),
        }
    }

    /// Send a chat message to the joined room.
    ///
    /// Dropped with a log line when the session is not `Ready`, `room_id` is
    /// not the joined room, or the body is blank.
    pub fn send_message(&self, room_id: &RoomId, body: &str, is_system: bool) {
        self.send_chat(room_id, body, is_system, None);
    }

    /// Like [`send_message`](Self::send_message), running `ack` once the
    /// server acknowledges the message. `ack` never runs if the message is
    /// dropped or rejected, if the session is torn down first, or if more than
    /// [`MAX_PENDING_ACKS`](super::MAX_PENDING_ACKS) newer acks are waiting.
    pub fn send_message_with_ack(
        &self,
        room_id: &RoomId,
        body: &str,
        is_system: bool,
        ack: AckCallback,
    ) {
        self.send_chat(room_id, body, is_system, Some(ack));
    }

    fn send_chat(&self, room_id: &RoomId, body: &str, is_system: bool, ack: Option<AckCallback>) {
        let Some(outbound) = self.ready_outbound() else {
            tracing::warn!("Dropping message: connection is {}", self.state());
            return;
        };
        let Some(user_icon) = self.icon_if_joined(room_id) else {
            tracing::warn!("Dropping message: not a member of room {}", room_id);
            return;
        };
        if body.trim().is_empty() {
            tracing::debug!("Dropping empty message");
            return;
        }

        let request_id = ack.map(|callback| {
            lock(&self.pending).register(PendingRequest::Acknowledge(callback))
        });
        let frame = ClientFrame::SendMessage {
            request_id,
            room_id: room_id.as_str().to_string(),
            body: body.to_string(),
            is_system_message: is_system,
            user_icon,
        };
        if outbound.send(frame).is_err() {
            if let Some(request_id) = request_id {
                lock(&self.pending).take(request_id);
            }
            tracing::warn!("Dropping message: connection is closed");
        }
    }

    /// Tell the room this user is typing. Same drop policy as `send_message`.
    pub fn send_typing_signal(&self, room_id: &RoomId) {
        let Some(outbound) = self.ready_outbound() else {
            tracing::warn!("Dropping typing signal: connection is {}", self.state());
            return;
        };
        if self.icon_if_joined(room_id).is_none() {
            tracing::warn!("Dropping typing signal: not a member of room {}", room_id);
            return;
        }

        let frame = ClientFrame::SetTypingPresence {
            room_id: room_id.as_str().to_string(),
        };
        if outbound.send(frame).is_err() {
            tracing::warn!("Dropping typing signal: connection is closed");
        }
    }

    /// Release the connection. Safe to call repeatedly.
    ///
    /// Stops reading, lets the writer flush and close the socket, and
    /// abandons in-flight requests without completing them. Leaves the state
    /// `Closed`.
    pub fn teardown(&mut self) {
        if let Some(reader_task) = self.reader_task.take() {
            reader_task.abort();
        }
        // Dropping the sender ends the writer loop, which then closes the sink
        self.outbound = None;

        let abandoned = lock(&self.pending).abandon();
        if abandoned > 0 {
            tracing::debug!("Abandoned {} in-flight request(s)", abandoned);
        }

        if transition(&self.state, ConnectionState::Closed) {
            tracing::info!("Session closed");
        } else {
            tracing::debug!("teardown(): session already closed");
        }
    }

    fn ready_outbound(&self) -> Option<&mpsc::UnboundedSender<ClientFrame>> {
        if self.state().is_ready() {
            self.outbound.as_ref()
        } else {
            None
        }
    }

    /// `Some(icon)` when `room_id` is the joined room.
    fn icon_if_joined(&self, room_id: &RoomId) -> Option<Option<String>> {
        let context = lock(&self.context);
        context
            .is_in_room(room_id)
            .then(|| context.icon.clone())
    }
}

impl Drop for SessionClient {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Apply a state transition if it is legal.
///
/// Returns `true` only when the state actually changed.
fn transition(state: &watch::Sender<ConnectionState>, next: ConnectionState) -> bool {
    state.send_if_modified(|current| {
        if !current.can_transition_to(next) {
            tracing::warn!("Ignoring illegal state transition {} -> {}", current, next);
            return false;
        }
        if *current == next {
            return false;
        }
        tracing::debug!("Connection state {} -> {}", current, next);
        *current = next;
        true
    })
}

/// Serialize outbound frames in queue order.
async fn writer_loop(
    mut write: SplitSink<WsStream, Message>,
    mut outbound: mpsc::UnboundedReceiver<ClientFrame>,
) {
    while let Some(frame) = outbound.recv().await {
        let json = match encode_frame(&frame) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("{}", e);
                continue;
            }
        };
        if let Err(e) = write.send(Message::Text(json.into())).await {
            tracing::warn!("Failed to send frame: {}", e);
            break;
        }
    }

    if let Err(e) = write.close().await {
        tracing::debug!("Closing websocket failed: {}", e);
    }
}

/// Read until the transport closes, then report `Closed` once.
async fn reader_loop(
    mut read: SplitStream<WsStream>,
    dispatcher: Dispatcher,
    state: Arc<watch::Sender<ConnectionState>>,
) {
    let reason = loop {
        match read.next().await {
            Some(Ok(Message::Text(text))) => dispatcher.handle_text(text.as_str()),
            Some(Ok(Message::Binary(data))) => {
                tracing::warn!("Ignoring {} bytes of binary data", data.len());
            }
            Some(Ok(Message::Close(frame))) => {
                tracing::info!("Server closed the connection");
                break frame
                    .map(|frame| frame.reason.as_str().to_string())
                    .filter(|reason| !reason.is_empty());
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                tracing::warn!("WebSocket read error: {}", e);
                break Some(e.to_string());
            }
            None => break None,
        }
    };

    if transition(&state, ConnectionState::Closed) {
        dispatcher.abandon_pending();
        dispatcher.notify(SessionEvent::Closed { reason });
    }
}
