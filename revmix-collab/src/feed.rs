use futures_util::future::try_join;
use log::debug;
use parking_lot::Mutex;
use revmix_api::ApiError;
use revmix_core::{ChallengeData, RoomData, RoomStatus};

use crate::{CollabContext, CollabEvent};

/// A card of the home feed
#[derive(Debug, Clone, PartialEq)]
pub enum FeedItem {
    Room(RoomData),
    Challenge(ChallengeData),
}

impl FeedItem {
    pub fn id(&self) -> &str {
        match self {
            Self::Room(room) => &room.id,
            Self::Challenge(challenge) => &challenge.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Room(room) => &room.name,
            Self::Challenge(challenge) => &challenge.title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Room(room) => &room.prompt,
            Self::Challenge(challenge) => &challenge.description,
        }
    }

    pub fn status(&self) -> RoomStatus {
        match self {
            Self::Room(room) => room.status,
            Self::Challenge(challenge) => challenge.status.as_str().into(),
        }
    }

    /// The status as the backend spelled it
    pub fn status_text(&self) -> &str {
        match self {
            Self::Room(room) => room.status.as_str(),
            Self::Challenge(challenge) => &challenge.status,
        }
    }

    pub fn participant_count(&self) -> usize {
        match self {
            Self::Room(room) => room.participants.len(),
            Self::Challenge(challenge) => challenge.participants.len(),
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Room(_) => "🎤 Battle Room",
            Self::Challenge(_) => "🏆 Challenge",
        }
    }

    pub fn action_label(&self) -> &'static str {
        self.status().action_label()
    }

    /// Returns true if the card's action can be used
    pub fn is_enterable(&self) -> bool {
        self.status().is_enterable()
    }
}

/// The list of rooms and challenges shown on the home screen
pub struct HomeFeed {
    context: CollabContext,
    items: Mutex<Vec<FeedItem>>,
}

impl HomeFeed {
    pub fn new(context: &CollabContext) -> Self {
        Self {
            context: context.clone(),
            items: Default::default(),
        }
    }

    /// Fetches rooms and challenges at the same time. Rooms come first.
    pub async fn refresh(&self) -> Result<Vec<FeedItem>, ApiError> {
        let api = self.context.api();
        let (rooms, challenges) = try_join(api.rooms(), api.challenges()).await?;

        let items: Vec<_> = rooms
            .into_iter()
            .map(FeedItem::Room)
            .chain(challenges.into_iter().map(FeedItem::Challenge))
            .collect();

        debug!("Feed refreshed with {} items", items.len());

        *self.items.lock() = items.clone();
        self.context.emit(CollabEvent::FeedUpdated {
            items: items.clone(),
        });

        Ok(items)
    }

    /// Returns the items of the last refresh
    pub fn items(&self) -> Vec<FeedItem> {
        self.items.lock().clone()
    }
}
