//! The data the backend owns. The client only ever holds denormalized copies of it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The type the backend uses for identifiers.
pub type PrimaryKey = String;

pub type UserId = PrimaryKey;
pub type RoomId = PrimaryKey;
pub type PerformanceId = PrimaryKey;

/// The marker submitted in place of audio data when a performance is a timeline.
pub const TIMELINE_PLACEHOLDER: &str = "timeline_placeholder";

/// The only reaction the client sends along with a vote
pub const VOTE_REACTION: &str = "🔥";

/// A RevMix account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub battles: u32,
}

/// The session handed out by the backend on login.
///
/// Only the access token is interpreted. Everything else is kept verbatim so the
/// persisted blob round-trips without losing refresh metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The result of logging in or registering
#[derive(Debug, Clone, Deserialize)]
pub struct AuthData {
    pub user: UserData,
    /// Registering may not hand out a session, for example when an email needs confirming
    pub session: Option<SessionData>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[default]
    Waiting,
    Active,
    Judging,
    Closed,
    Completed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    #[default]
    Challenge,
    Collab,
    Solo,
    #[serde(other)]
    Other,
}

/// A time-boxed battle room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomData {
    pub id: RoomId,
    pub name: String,
    #[serde(default)]
    pub host_id: UserId,
    #[serde(rename = "type", default)]
    pub kind: RoomKind,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub participants: Vec<UserId>,
    #[serde(default)]
    pub status: RoomStatus,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub expires_at: DateTime<Utc>,
    /// How long a performance may be, in seconds
    #[serde(default = "default_timer_duration")]
    pub timer_duration: u32,
    #[serde(default = "default_max_participants")]
    pub max_participants: u32,
    #[serde(default)]
    pub results_announced: bool,
    #[serde(default)]
    pub winner_id: Option<UserId>,
}

/// The three axes a performance is judged on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteScores {
    pub flow: Option<u8>,
    pub lyrics: Option<u8>,
    pub creativity: Option<u8>,
}

/// One clip of a submitted timeline, as metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineClipData {
    pub name: String,
    #[serde(default)]
    pub audio_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_id: Option<String>,
    /// Where the clip starts, in seconds
    #[serde(default)]
    pub position: f64,
    #[serde(default)]
    pub duration: f64,
}

/// A user's entry in a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceData {
    pub id: PerformanceId,
    pub user_id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub room_id: RoomId,
    #[serde(default)]
    pub audio_data: Option<String>,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub timeline_marks: Vec<f64>,
    #[serde(default)]
    pub audio_timeline: Vec<TimelineClipData>,
    /// Scores keyed by voter
    #[serde(default)]
    pub votes: HashMap<UserId, VoteScores>,
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub vote_count: u32,
}

/// A submitted vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteData {
    #[serde(default)]
    pub id: PrimaryKey,
    pub voter_id: UserId,
    #[serde(default)]
    pub voter_username: String,
    pub performance_id: PerformanceId,
    #[serde(default)]
    pub room_id: Option<RoomId>,
    pub flow: u8,
    pub lyrics: u8,
    pub creativity: u8,
    #[serde(default)]
    pub emoji_reaction: String,
}

/// A longer running challenge shown in the feed next to rooms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeData {
    pub id: PrimaryKey,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub creator_id: UserId,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub participants: Vec<UserId>,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub starts_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectCategory {
    #[default]
    Builtin,
    Custom,
}

/// A clip from the backend's effect catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioEffectData {
    pub id: PrimaryKey,
    pub name: String,
    #[serde(default)]
    pub category: EffectCategory,
    #[serde(default)]
    pub audio_data: String,
    #[serde(default)]
    pub duration: f64,
}

/// The outcome of a room, as announced by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct RoomResultsData {
    pub room: RoomData,
    #[serde(default)]
    pub performances: Vec<PerformanceData>,
    #[serde(default)]
    pub results_announced: bool,
    #[serde(default)]
    pub winner_id: Option<UserId>,
}

impl RoomData {
    /// Returns true if the room is past its expiry or reported closed
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at || self.status == RoomStatus::Closed
    }

    /// Returns true if more participants can join
    pub fn has_room_for_more(&self) -> bool {
        (self.participants.len() as u32) < self.max_participants
    }
}

impl PerformanceData {
    /// Returns true if the performance carries playable audio rather than a timeline marker
    pub fn has_audio(&self) -> bool {
        self.audio_data
            .as_deref()
            .is_some_and(|d| !d.is_empty() && d != TIMELINE_PLACEHOLDER)
    }

    /// Returns true if the performance was composed on the timeline
    pub fn is_timeline(&self) -> bool {
        !self.audio_timeline.is_empty()
    }

    /// Returns true if the given user has a vote recorded on this performance
    pub fn voted_by(&self, user_id: &str) -> bool {
        self.votes.contains_key(user_id)
    }
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Waiting => "waiting",
            RoomStatus::Active => "active",
            RoomStatus::Judging => "judging",
            RoomStatus::Closed => "closed",
            RoomStatus::Completed => "completed",
            RoomStatus::Unknown => "unknown",
        }
    }
}

impl From<&str> for RoomStatus {
    /// Reads a status the way the backend spells it, challenges included
    fn from(value: &str) -> Self {
        match value {
            "waiting" => RoomStatus::Waiting,
            "active" => RoomStatus::Active,
            "judging" => RoomStatus::Judging,
            "closed" => RoomStatus::Closed,
            "completed" => RoomStatus::Completed,
            _ => RoomStatus::Unknown,
        }
    }
}

impl RoomKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomKind::Challenge => "challenge",
            RoomKind::Collab => "collab",
            RoomKind::Solo => "solo",
            RoomKind::Other => "other",
        }
    }
}

fn default_level() -> u32 {
    1
}

fn default_timer_duration() -> u32 {
    300
}

fn default_max_participants() -> u32 {
    10
}

/// The backend stores naive UTC datetimes, so offsets may be missing from timestamps.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|d| d.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|d| d.and_utc())
            })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        parse(&value).ok_or_else(|| D::Error::custom(format!("invalid timestamp {value}")))
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(value) => parse(&value)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp {value}"))),
            None => Ok(None),
        }
    }
}
