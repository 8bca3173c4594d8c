//! Parsing of lines typed at the client prompt.

/// A line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/create`: create a room with the session nickname
    Create,
    /// `/join <room-id>`
    Join(String),
    /// `/rooms`: list known rooms
    Rooms,
    /// `/users`: show the presence list
    Users,
    /// `/typing`: send a typing signal to the selected room
    Typing,
    /// `/quit`
    Quit,
    /// Any other text: a chat message for the selected room
    Message(String),
    /// A slash command that does not exist or lacks its argument
    Invalid(String),
}

/// Parse one trimmed input line. Returns `None` for blank input.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if !line.starts_with('/') {
        return Some(Command::Message(line.to_string()));
    }

    let mut parts = line.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let argument = parts.next().map(str::trim).unwrap_or_default();

    let command = match (name, argument) {
        ("/create", _) => Command::Create,
        ("/join", "") => Command::Invalid("usage: /join <room-id>".to_string()),
        ("/join", room_id) => Command::Join(room_id.to_string()),
        ("/rooms", _) => Command::Rooms,
        ("/users", _) => Command::Users,
        ("/typing", _) => Command::Typing,
        ("/quit" | "/exit", _) => Command::Quit,
        (unknown, _) => Command::Invalid(format!("unknown command: {}", unknown)),
    };
    Some(command)
}
