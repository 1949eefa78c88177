use crossbeam::channel::{Receiver, Sender};
use revmix_core::{PerformanceId, RoomId, UserData};

use crate::{FeedItem, RoomSnapshot, Screen};

pub type EventSender = Sender<CollabEvent>;
pub type EventReceiver = Receiver<CollabEvent>;

/// Events emitted by the collab system as state changes
#[derive(Debug, Clone)]
pub enum CollabEvent {
    /// The user signed in or a stored session was restored
    SignedIn { user: UserData },
    /// The session was cleared
    SignedOut,
    /// The current screen was replaced
    ScreenChanged { screen: Screen },
    /// The home feed was refreshed
    FeedUpdated { items: Vec<FeedItem> },
    /// A battle room was refreshed
    RoomUpdated { snapshot: RoomSnapshot },
    /// The user's performance was accepted
    PerformanceSubmitted {
        room_id: RoomId,
        performance_id: PerformanceId,
    },
    /// The user's vote was accepted
    VoteSubmitted {
        room_id: RoomId,
        performance_id: PerformanceId,
    },
    /// A background refresh failed. The message is fit for showing to the user.
    RefreshFailed { message: String },
}
