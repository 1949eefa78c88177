//! The envelopes the backend wraps its listings in

use revmix_core::{AudioEffectData, ChallengeData, PerformanceData, RoomData, UserData, VoteData};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct RoomList {
    pub rooms: Vec<RoomData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PerformanceList {
    pub performances: Vec<PerformanceData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EffectList {
    pub effects: Vec<AudioEffectData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChallengeList {
    pub challenges: Vec<ChallengeData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VoteList {
    pub votes: Vec<VoteData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Leaderboard {
    pub leaderboard: Vec<UserData>,
}

/// The acknowledgement returned by actions that produce no resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub message: String,
}
