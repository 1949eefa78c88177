use log::{error, info};
use revmix_api::{ApiClient, ApiError, NewRoomSchema};
use revmix_core::{RoomData, RoomKind};
use thiserror::Error;

use crate::errors::failure_message;

/// The performance lengths a room can be created with, in seconds
pub const TIMER_CHOICES: [u32; 4] = [60, 120, 180, 300];

/// The room sizes a room can be created with
pub const PARTICIPANT_CHOICES: [u32; 4] = [4, 6, 8, 12];

#[derive(Debug, Error)]
pub enum CreateRoomError {
    #[error("Please fill in room name and prompt")]
    MissingFields,
    #[error("Timer must be one of {:?} seconds", TIMER_CHOICES)]
    InvalidTimer(u32),
    #[error("Max participants must be one of {:?}", PARTICIPANT_CHOICES)]
    InvalidParticipants(u32),
    #[error("{}", failure_message(.0, "Error creating room"))]
    Failed(ApiError),
}

#[derive(Debug, Clone)]
pub struct CreateRoomForm {
    pub name: String,
    pub kind: RoomKind,
    pub prompt: String,
    pub timer_duration: u32,
    pub max_participants: u32,
}

impl Default for CreateRoomForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: RoomKind::Challenge,
            prompt: String::new(),
            timer_duration: 300,
            max_participants: 8,
        }
    }
}

impl CreateRoomForm {
    pub fn validate(&self) -> Result<(), CreateRoomError> {
        if self.name.trim().is_empty() || self.prompt.trim().is_empty() {
            return Err(CreateRoomError::MissingFields);
        }

        if !TIMER_CHOICES.contains(&self.timer_duration) {
            return Err(CreateRoomError::InvalidTimer(self.timer_duration));
        }

        if !PARTICIPANT_CHOICES.contains(&self.max_participants) {
            return Err(CreateRoomError::InvalidParticipants(self.max_participants));
        }

        Ok(())
    }

    pub fn to_schema(&self, host_id: &str) -> NewRoomSchema {
        NewRoomSchema {
            name: self.name.clone(),
            kind: self.kind,
            prompt: self.prompt.clone(),
            timer_duration: self.timer_duration,
            max_participants: self.max_participants,
            host_id: host_id.to_string(),
        }
    }

    /// Creates the room, with the given user as its host
    pub async fn submit(&self, api: &ApiClient, host_id: &str) -> Result<RoomData, CreateRoomError> {
        self.validate()?;

        let room = api
            .create_room(&self.to_schema(host_id))
            .await
            .map_err(|e| {
                error!("Error creating room: {}", e);
                CreateRoomError::Failed(e)
            })?;

        info!("Created room {} ({})", room.name, room.id);
        Ok(room)
    }
}
