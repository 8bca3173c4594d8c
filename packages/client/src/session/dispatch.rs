//! Inbound frame dispatch.
//!
//! Runs on the reader task: every text frame is decoded at the boundary, then
//! either forwarded to the caller as a [`SessionEvent`] or used to complete a
//! pending request. Nothing here can close the session.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use hiroba_shared::protocol::{Decoded, ServerFrame, decode_server_frame};

use crate::error::SessionError;

use super::{
    context::SessionContext,
    event::{ChatMessage, JoinedRoom, RoomId, SessionEvent, User, UserId},
    lock,
    pending::{PendingRequests, Response, fulfil},
};

pub(crate) struct Dispatcher {
    pending: Arc<Mutex<PendingRequests>>,
    context: Arc<Mutex<SessionContext>>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl Dispatcher {
    pub(crate) fn new(
        pending: Arc<Mutex<PendingRequests>>,
        context: Arc<Mutex<SessionContext>>,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            pending,
            context,
            events,
        }
    }

    pub(crate) fn handle_text(&self, text: &str) {
        match decode_server_frame(text) {
            Ok(Decoded::Frame(frame)) => self.handle_frame(frame),
            Ok(Decoded::Unknown(tag)) => {
                tracing::warn!("Ignoring unrecognized notification '{}'", tag);
            }
            Err(e) => {
                let error = SessionError::from(e);
                tracing::warn!("Dropping inbound frame: {}", error);
            }
        }
    }

    fn handle_frame(&self, frame: ServerFrame) {
        match frame {
            ServerFrame::UserId { user_id } => {
                let user_id = UserId::new(user_id);
                tracing::debug!("Assigned user id '{}'", user_id);
                lock(&self.context).user_id = Some(user_id.clone());
                self.notify(SessionEvent::UserIdAssigned(user_id));
            }
            ServerFrame::UserList { users } => {
                let users = users.into_iter().map(User::from).collect();
                self.notify(SessionEvent::UserListUpdated(users));
            }
            ServerFrame::SendMessage(payload) => {
                self.notify(SessionEvent::MessageReceived(ChatMessage::from(payload)));
            }
            ServerFrame::SetTypingPresence { room_id, user_id } => {
                self.notify(SessionEvent::TypingSignalReceived {
                    room_id: room_id.and_then(RoomId::new),
                    user_id: user_id.map(UserId::new),
                });
            }
            ServerFrame::RoomCreated {
                request_id,
                room_id,
            } => {
                let response = match RoomId::new(room_id) {
                    Some(room_id) => Response::RoomCreated {
                        request_id,
                        room_id,
                    },
                    None => blank_room_id(request_id),
                };
                self.complete(response);
            }
            ServerFrame::RoomJoined {
                request_id,
                room_id,
                messages,
            } => {
                let response = match RoomId::new(room_id) {
                    Some(room_id) => Response::RoomJoined {
                        request_id,
                        joined: JoinedRoom {
                            room_id,
                            prior_messages: messages.into_iter().map(ChatMessage::from).collect(),
                        },
                    },
                    None => blank_room_id(request_id),
                };
                self.complete(response);
            }
            ServerFrame::Ack { request_id } => self.complete(Response::Ack { request_id }),
            ServerFrame::Error {
                request_id: Some(request_id),
                message,
            } => self.complete(Response::Rejected {
                request_id,
                message,
            }),
            ServerFrame::Error {
                request_id: None,
                message,
            } => {
                tracing::warn!("Server reported an error: {}", message);
            }
        }
    }

    fn complete(&self, response: Response) {
        let request_id = response.request_id();
        let request = lock(&self.pending).take(request_id);
        match request {
            Some(request) => fulfil(request, response),
            None => tracing::debug!("Response to unknown or abandoned request {}", request_id),
        }
    }

    pub(crate) fn notify(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("Event receiver dropped; discarding notification");
        }
    }

    pub(crate) fn abandon_pending(&self) {
        let abandoned = lock(&self.pending).abandon();
        if abandoned > 0 {
            tracing::debug!("Abandoned {} in-flight request(s)", abandoned);
        }
    }
}

fn blank_room_id(request_id: u64) -> Response {
    Response::Rejected {
        request_id,
        message: "server returned a blank room id".to_string(),
    }
}
