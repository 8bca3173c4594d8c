//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ConnectUserUseCase, CreateRoomUseCase, DisconnectUserUseCase, GetRoomsUseCase,
    JoinRoomUseCase, SendMessageUseCase, TypingUseCase,
};

/// ハンドラーから利用するユースケース
pub struct AppState {
    pub connect_user_usecase: Arc<ConnectUserUseCase>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub typing_usecase: Arc<TypingUseCase>,
    pub disconnect_user_usecase: Arc<DisconnectUserUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
}
