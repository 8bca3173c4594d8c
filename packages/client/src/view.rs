//! Chat view state rendered by the front-end.
//!
//! A pure reducer over [`SessionEvent`]s and join results; it performs no I/O.

use crate::session::{ChatMessage, JoinedRoom, RoomId, SessionEvent, User, UserId};

/// What the user currently sees
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatView {
    rooms: Vec<RoomId>,
    selected_room: Option<RoomId>,
    messages: Vec<ChatMessage>,
    users: Vec<User>,
    typing: bool,
    user_id: Option<UserId>,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rooms known to this client, in the order they were added
    pub fn rooms(&self) -> &[RoomId] {
        &self.rooms
    }

    pub fn selected_room(&self) -> Option<&RoomId> {
        self.selected_room.as_ref()
    }

    /// Messages of the selected room, in arrival order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn is_someone_typing(&self) -> bool {
        self.typing
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    /// Add a room to the room list if it is not there yet.
    pub fn add_room(&mut self, room_id: RoomId) {
        if !self.rooms.contains(&room_id) {
            self.rooms.push(room_id);
        }
    }

    /// Switch to a freshly joined room.
    ///
    /// Clears messages, presence and the typing flag before appending the
    /// room's history.
    pub fn enter_room(&mut self, joined: JoinedRoom) {
        self.messages.clear();
        self.users.clear();
        self.typing = false;

        self.add_room(joined.room_id.clone());
        self.selected_room = Some(joined.room_id);
        self.messages.extend(joined.prior_messages);
    }

    /// Apply one session notification.
    pub fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::UserIdAssigned(user_id) => self.user_id = Some(user_id.clone()),
            SessionEvent::UserListUpdated(users) => self.users = users.clone(),
            SessionEvent::MessageReceived(message) => self.push_message(message),
            SessionEvent::TypingSignalReceived { room_id, .. } => {
                if self.is_for_selected_room(room_id.as_ref()) {
                    self.typing = true;
                }
            }
            SessionEvent::Ready | SessionEvent::Closed { .. } => {}
        }
    }

    fn push_message(&mut self, message: &ChatMessage) {
        if !self.is_for_selected_room(message.room_id.as_ref()) {
            tracing::debug!("Ignoring message for a room that is not selected");
            return;
        }
        self.messages.push(message.clone());
        // Typing stays visible until the next message arrives
        self.typing = false;
    }

    /// Untagged notifications are assumed to belong to the selected room.
    fn is_for_selected_room(&self, room_id: Option<&RoomId>) -> bool {
        match (&self.selected_room, room_id) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(selected), Some(room_id)) => selected == room_id,
        }
    }
}
