//! Repository trait 定義
//!
//! UseCase 層はこの trait に依存し、具体的な実装（Infrastructure 層）には依存しません。

use async_trait::async_trait;

use super::{ChatMessage, Member, RepositoryError, Room, RoomId, UserId};

/// 全ルームへのアクセスを抽象化した Repository
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 新しいルームを保存
    async fn create_room(&self, room: Room) -> Result<(), RepositoryError>;

    /// ルームを取得
    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError>;

    /// 全ルームを作成日時順で取得
    async fn list_rooms(&self) -> Vec<Room>;

    /// 参加者を追加し、追加後の参加者リストを返す
    async fn add_member(
        &self,
        room_id: &RoomId,
        member: Member,
    ) -> Result<Vec<Member>, RepositoryError>;

    /// 参加者を削除し、削除後の参加者リストを返す
    ///
    /// 参加していないユーザーの削除はエラーになりません。
    async fn remove_member(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Vec<Member>, RepositoryError>;

    /// メッセージをルームの履歴に追加
    async fn add_message(
        &self,
        room_id: &RoomId,
        message: ChatMessage,
    ) -> Result<(), RepositoryError>;

    /// ルームの参加者リストを取得
    async fn get_members(&self, room_id: &RoomId) -> Result<Vec<Member>, RepositoryError>;
}
