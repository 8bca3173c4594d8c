//! UseCase 層
//!
//! 各ユースケースは `RoomRepository` と `MessagePusher` の trait にのみ依存します。

mod connect_user;
mod create_room;
mod disconnect_user;
pub mod error;
mod get_rooms;
mod join_room;
mod presence;
mod send_message;
mod typing;

pub use connect_user::ConnectUserUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect_user::DisconnectUserUseCase;
pub use error::{CreateRoomError, JoinRoomError, SendMessageError, TypingError};
pub use get_rooms::GetRoomsUseCase;
pub use join_room::{JoinRoomUseCase, JoinedRoom};
pub use send_message::{SendMessageUseCase, SentMessage};
pub use typing::TypingUseCase;
