//! In-flight requests awaiting a response frame.

use std::{collections::HashMap, sync::Mutex};

use tokio::sync::oneshot;

use hiroba_shared::protocol::RequestId;

use super::{
    event::{JoinedRoom, RoomId},
    lock,
};

/// Upper bound on acknowledgements awaiting the server.
///
/// Registering beyond it drops the oldest one; its callback never runs.
pub const MAX_PENDING_ACKS: usize = 256;

/// Invoked once when the server acknowledges a message.
pub type AckCallback = Box<dyn FnOnce() + Send + 'static>;

pub(crate) enum PendingRequest {
    CreateRoom(oneshot::Sender<Result<RoomId, String>>),
    JoinRoom(oneshot::Sender<Result<JoinedRoom, String>>),
    Acknowledge(AckCallback),
}

impl PendingRequest {
    fn kind(&self) -> &'static str {
        match self {
            PendingRequest::CreateRoom(_) => "createChatRoom",
            PendingRequest::JoinRoom(_) => "joinChatRoom",
            PendingRequest::Acknowledge(_) => "sendMessage",
        }
    }
}

/// Response frame reduced to what a pending request needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Response {
    RoomCreated {
        request_id: RequestId,
        room_id: RoomId,
    },
    RoomJoined {
        request_id: RequestId,
        joined: JoinedRoom,
    },
    Ack {
        request_id: RequestId,
    },
    Rejected {
        request_id: RequestId,
        message: String,
    },
}

impl Response {
    pub(crate) fn request_id(&self) -> RequestId {
        match self {
            Response::RoomCreated { request_id, .. }
            | Response::RoomJoined { request_id, .. }
            | Response::Ack { request_id }
            | Response::Rejected { request_id, .. } => *request_id,
        }
    }
}

/// Request table keyed by a monotonically increasing id.
#[derive(Default)]
pub(crate) struct PendingRequests {
    last_id: RequestId,
    requests: HashMap<RequestId, PendingRequest>,
}

impl PendingRequests {
    pub(crate) fn register(&mut self, request: PendingRequest) -> RequestId {
        if matches!(request, PendingRequest::Acknowledge(_)) {
            self.evict_acks_over(MAX_PENDING_ACKS - 1);
        }
        self.last_id += 1;
        self.requests.insert(self.last_id, request);
        self.last_id
    }

    pub(crate) fn take(&mut self, request_id: RequestId) -> Option<PendingRequest> {
        self.requests.remove(&request_id)
    }

    pub(crate) fn has_join_in_flight(&self) -> bool {
        self.requests
            .values()
            .any(|request| matches!(request, PendingRequest::JoinRoom(_)))
    }

    pub(crate) fn len(&self) -> usize {
        self.requests.len()
    }

    fn evict_acks_over(&mut self, limit: usize) {
        let mut ack_ids: Vec<RequestId> = self
            .requests
            .iter()
            .filter(|(_, request)| matches!(request, PendingRequest::Acknowledge(_)))
            .map(|(request_id, _)| *request_id)
            .collect();
        if ack_ids.len() <= limit {
            return;
        }
        ack_ids.sort_unstable();
        for request_id in &ack_ids[..ack_ids.len() - limit] {
            self.requests.remove(request_id);
            tracing::warn!("Gave up waiting for ack of message {}", request_id);
        }
    }

    /// Drop every pending request without completing it.
    ///
    /// Awaiting callers observe a closed channel; ack callbacks never run.
    pub(crate) fn abandon(&mut self) -> usize {
        let count = self.requests.len();
        self.requests.clear();
        count
    }
}

/// Removes a request from the table when dropped.
///
/// Held across the await of a response so that a cancelled caller does not
/// leave its entry behind. Removing an already answered request is a no-op.
pub(crate) struct PendingGuard<'a> {
    pending: &'a Mutex<PendingRequests>,
    request_id: RequestId,
}

impl<'a> PendingGuard<'a> {
    pub(crate) fn new(pending: &'a Mutex<PendingRequests>, request_id: RequestId) -> Self {
        Self {
            pending,
            request_id,
        }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if lock(self.pending).take(self.request_id).is_some() {
            tracing::debug!("Request {} withdrawn before a response", self.request_id);
        }
    }
}

/// Complete `request` with `response`.
///
/// Must be called without holding the table lock: ack callbacks are caller code.
pub(crate) fn fulfil(request: PendingRequest, response: Response) {
    let kind = request.kind();
    match (request, response) {
        (PendingRequest::CreateRoom(tx), Response::RoomCreated { room_id, .. }) => {
            let _ = tx.send(Ok(room_id));
        }
        (PendingRequest::JoinRoom(tx), Response::RoomJoined { joined, .. }) => {
            let _ = tx.send(Ok(joined));
        }
        (PendingRequest::Acknowledge(callback), Response::Ack { .. }) => callback(),
        (PendingRequest::CreateRoom(tx), Response::Rejected { message, .. }) => {
            let _ = tx.send(Err(message));
        }
        (PendingRequest::JoinRoom(tx), Response::Rejected { message, .. }) => {
            let _ = tx.send(Err(message));
        }
        (PendingRequest::Acknowledge(_), Response::Rejected { request_id, message }) => {
            tracing::warn!("Message {} was rejected: {}", request_id, message);
        }
        (request, response) => {
            let message = format!(
                "unexpected response to {} request {}",
                kind,
                response.request_id()
            );
            tracing::warn!("{}", message);
            match request {
                PendingRequest::CreateRoom(tx) => {
                    let _ = tx.send(Err(message));
                }
                PendingRequest::JoinRoom(tx) => {
                    let _ = tx.send(Err(message));
                }
                PendingRequest::Acknowledge(_) => {}
            }
        }
    }
}
