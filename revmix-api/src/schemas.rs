//! The bodies sent to the backend. Each is validated before it leaves the client.

use revmix_core::{RoomKind, TimelineClipData, VOTE_REACTION};
use serde::Serialize;
use serde_json::{Map, Value};
use validator::Validate;

#[derive(Debug, Clone, Validate, Serialize)]
pub struct LoginSchema {
    #[validate(length(min = 1, max = 128))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Validate, Serialize)]
pub struct RegisterSchema {
    #[validate(length(min = 1, max = 128))]
    pub username: String,
    #[validate(length(max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Validate, Serialize)]
pub struct NewRoomSchema {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RoomKind,
    #[validate(length(min = 1, max = 1024))]
    pub prompt: String,
    #[validate(range(min = 1, max = 3600))]
    pub timer_duration: u32,
    #[validate(range(min = 2, max = 100))]
    pub max_participants: u32,
    pub host_id: String,
}

/// How the audio of a performance was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceSource {
    Record,
    Upload,
    Timeline,
}

#[derive(Debug, Clone, Validate, Serialize)]
pub struct NewPerformanceSchema {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub room_id: String,
    /// Base64 audio, or the timeline placeholder
    #[validate(length(min = 1))]
    pub audio_data: String,
    #[validate(range(min = 0.0))]
    pub duration: f64,
    pub timeline_marks: Vec<f64>,
    pub audio_timeline: Vec<TimelineClipData>,
    pub source: PerformanceSource,
}

#[derive(Debug, Clone, Validate, Serialize)]
pub struct NewVoteSchema {
    #[validate(length(min = 1))]
    pub voter_id: String,
    #[validate(length(min = 1))]
    pub performance_id: String,
    #[validate(length(min = 1))]
    pub room_id: String,
    #[validate(range(min = 1, max = 10))]
    pub flow: u8,
    #[validate(range(min = 1, max = 10))]
    pub lyrics: u8,
    #[validate(range(min = 1, max = 10))]
    pub creativity: u8,
    pub emoji_reaction: String,
}

impl NewVoteSchema {
    pub fn new(
        voter_id: impl Into<String>,
        performance_id: impl Into<String>,
        room_id: impl Into<String>,
        (flow, lyrics, creativity): (u8, u8, u8),
    ) -> Self {
        Self {
            voter_id: voter_id.into(),
            performance_id: performance_id.into(),
            room_id: room_id.into(),
            flow,
            lyrics,
            creativity,
            emoji_reaction: VOTE_REACTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Validate, Serialize)]
pub struct NewChallengeSchema {
    #[validate(length(min = 1, max = 128))]
    pub title: String,
    pub description: String,
    /// Either `public` or `private`
    #[serde(rename = "type")]
    pub kind: String,
    pub rules: Map<String, Value>,
}

#[derive(Debug, Clone, Validate, Serialize)]
pub struct NewEffectSchema {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 1))]
    pub audio_data: String,
    #[validate(range(min = 0.0))]
    pub duration: f64,
}
