use revmix_core::{RoomData, RoomResultsData};
use validator::Validate;

use crate::{serialized::RoomList, ApiClient, ApiResult, Message, NewRoomSchema};

impl ApiClient {
    pub async fn rooms(&self) -> ApiResult<Vec<RoomData>> {
        let result: RoomList = self.get(self.url(&["rooms"])?).await?;
        Ok(result.rooms)
    }

    pub async fn room(&self, room_id: &str) -> ApiResult<RoomData> {
        self.get(self.url(&["rooms", room_id])?).await
    }

    pub async fn create_room(&self, body: &NewRoomSchema) -> ApiResult<RoomData> {
        body.validate()?;
        self.post(self.url(&["rooms"])?, body).await
    }

    pub async fn join_room(&self, room_id: &str) -> ApiResult<Message> {
        self.post_empty(self.url(&["rooms", room_id, "join"])?).await
    }

    pub async fn room_results(&self, room_id: &str) -> ApiResult<RoomResultsData> {
        self.get(self.url(&["rooms", room_id, "results"])?).await
    }

    /// Closes the room and announces its results. Only the host may do this.
    pub async fn close_room(&self, room_id: &str) -> ApiResult<Message> {
        self.post_empty(self.url(&["rooms", room_id, "close"])?).await
    }
}
