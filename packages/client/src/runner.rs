//! Interactive terminal front-end driving one chat session.

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    command::{Command, parse_command},
    config::SessionConfig,
    error::SessionError,
    formatter::MessageFormatter,
    session::{SessionClient, SessionEvent},
    ui::redisplay_prompt,
    view::ChatView,
};

/// Run the client until the user quits or the session closes.
///
/// There is no reconnection: a closed session ends the run with a
/// `Connection` error.
pub async fn run_client(
    config: SessionConfig,
    initial_room: Option<String>,
) -> Result<(), SessionError> {
    let mut client = SessionClient::new(config);
    let mut events = client.connect().await;

    match events.recv().await {
        Some(SessionEvent::Ready) => {}
        Some(SessionEvent::Closed { reason }) => {
            return Err(SessionError::Connection(
                reason.unwrap_or_else(|| "connection closed".to_string()),
            ));
        }
        other => {
            return Err(SessionError::Connection(format!(
                "unexpected first event: {:?}",
                other
            )));
        }
    }

    let nickname = client.config().nickname.clone();
    println!(
        "\nYou are '{}'. Type /create, /join <room-id>, /rooms, /users, /typing or a message. Press Ctrl+C to exit.\n",
        nickname
    );

    let mut view = ChatView::new();
    if let Some(room_id) = initial_room {
        join_room(&client, &mut view, &room_id).await;
    }

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    spawn_readline(nickname.clone(), input_tx);

    let result = loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(SessionEvent::Closed { reason }) => {
                    break Err(SessionError::Connection(
                        reason.unwrap_or_else(|| "connection closed".to_string()),
                    ));
                }
                Some(event) => render_event(&mut view, &event, &nickname),
                None => break Err(SessionError::Connection("event channel closed".to_string())),
            },
            line = input_rx.recv() => match line.as_deref().map(parse_command) {
                Some(Some(Command::Quit)) | None => break Ok(()),
                Some(Some(command)) => {
                    handle_command(&client, &mut view, command).await;
                    redisplay_prompt(&nickname);
                }
                Some(None) => {}
            },
        }
    };

    client.teardown();
    result
}

/// Read lines on a blocking thread and forward them to the session loop.
///
/// The thread ends on Ctrl+C / Ctrl+D, which closes the channel.
fn spawn_readline(nickname: String, input_tx: mpsc::UnboundedSender<String>) {
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", nickname);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });
}

async fn handle_command(client: &SessionClient, view: &mut ChatView, command: Command) {
    match command {
        Command::Create => {
            let context = client.context();
            match client
                .create_room(&context.nickname, context.icon.as_deref())
                .await
            {
                Ok(room_id) => {
                    println!("Room {} created. Join it with /join {}", room_id, room_id);
                    view.add_room(room_id);
                }
                Err(e) => println!("! {}", e),
            }
        }
        Command::Join(room_id) => join_room(client, view, &room_id).await,
        Command::Rooms => {
            print!(
                "{}",
                MessageFormatter::format_room_list(view.rooms(), view.selected_room())
            );
        }
        Command::Users => {
            print!(
                "{}",
                MessageFormatter::format_user_list(view.users(), &client.context().nickname)
            );
        }
        Command::Typing => match view.selected_room() {
            Some(room_id) => client.send_typing_signal(room_id),
            None => println!("! Join a room first"),
        },
        Command::Message(body) => match view.selected_room() {
            Some(room_id) => client.send_message(room_id, &body, false),
            None => println!("! Join a room first"),
        },
        Command::Invalid(reason) => println!("! {}", reason),
        // Handled by the session loop
        Command::Quit => {}
    }
}

async fn join_room(client: &SessionClient, view: &mut ChatView, room_id: &str) {
    let nickname = client.context().nickname;
    match client.join_room(&nickname, room_id).await {
        Ok(joined) => {
            print!(
                "{}",
                MessageFormatter::format_room_joined(&joined.room_id, joined.prior_messages.len())
            );
            view.enter_room(joined);
            for message in view.messages() {
                println!("{}", MessageFormatter::format_message(message));
            }
        }
        Err(e) => println!("! {}", e),
    }
}

fn render_event(view: &mut ChatView, event: &SessionEvent, nickname: &str) {
    view.apply(event);

    match event {
        SessionEvent::MessageReceived(message) => {
            if view.messages().last() == Some(message) {
                println!("\n{}", MessageFormatter::format_message(message));
                redisplay_prompt(nickname);
            }
        }
        SessionEvent::TypingSignalReceived { .. } if view.is_someone_typing() => {
            println!("\n{}", MessageFormatter::format_typing_indicator());
            redisplay_prompt(nickname);
        }
        SessionEvent::UserListUpdated(users) => {
            tracing::debug!("{} user(s) in the room", users.len());
        }
        SessionEvent::UserIdAssigned(user_id) => {
            tracing::debug!("Assigned user id '{}'", user_id);
        }
        _ => {}
    }
}
