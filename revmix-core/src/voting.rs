use thiserror::Error;

use crate::PerformanceData;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;
pub const DEFAULT_SCORE: u8 = 5;

/// The scores a user is about to give, one per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteDraft {
    pub flow: u8,
    pub lyrics: u8,
    pub creativity: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAxis {
    Flow,
    Lyrics,
    Creativity,
}

/// Where the voting widget of a single performance is at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteWidget {
    /// The performance belongs to the user, who cannot judge it
    OwnPerformance,
    /// The battle ended before the user voted
    Closed,
    /// The sliders are shown
    Open(VoteDraft),
    /// The vote was sent and the response is pending
    Submitting(VoteDraft),
    /// The user's vote is in. This state is never left.
    Voted,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum VoteRefusal {
    #[error("Voting is closed for this battle")]
    Closed,
    #[error("You cannot vote for your own performance")]
    OwnPerformance,
    #[error("You have already voted for this performance")]
    AlreadyVoted,
    #[error("Your vote is already being submitted")]
    InFlight,
}

impl VoteDraft {
    /// Creates a draft, clamping every score into the allowed range
    pub fn new(flow: u8, lyrics: u8, creativity: u8) -> Self {
        Self {
            flow: clamp_score(flow),
            lyrics: clamp_score(lyrics),
            creativity: clamp_score(creativity),
        }
    }

    /// Moves one slider, clamping the value into the allowed range
    pub fn set(&mut self, axis: VoteAxis, value: u8) {
        let value = clamp_score(value);

        match axis {
            VoteAxis::Flow => self.flow = value,
            VoteAxis::Lyrics => self.lyrics = value,
            VoteAxis::Creativity => self.creativity = value,
        }
    }
}

impl Default for VoteDraft {
    fn default() -> Self {
        Self::new(DEFAULT_SCORE, DEFAULT_SCORE, DEFAULT_SCORE)
    }
}

impl VoteWidget {
    /// Creates the widget for a performance as it is first shown
    pub fn for_performance(performance: &PerformanceData, user_id: &str, can_vote: bool) -> Self {
        let mut widget = Self::Open(VoteDraft::default());
        widget.sync(performance, user_id, can_vote);
        widget
    }

    /// Brings the widget up to date with freshly fetched data.
    ///
    /// Once voted, the widget stays voted even if the data is stale and doesn't list the vote yet.
    pub fn sync(&mut self, performance: &PerformanceData, user_id: &str, can_vote: bool) {
        if matches!(self, Self::Voted) || performance.voted_by(user_id) {
            *self = Self::Voted;
            return;
        }

        if performance.user_id == user_id {
            *self = Self::OwnPerformance;
            return;
        }

        if !can_vote {
            // A pending submission still gets to finish
            if !matches!(self, Self::Submitting(_)) {
                *self = Self::Closed;
            }
            return;
        }

        if !matches!(self, Self::Open(_) | Self::Submitting(_)) {
            *self = Self::Open(VoteDraft::default());
        }
    }

    /// Returns the draft if the sliders can be moved
    pub fn draft_mut(&mut self) -> Option<&mut VoteDraft> {
        match self {
            Self::Open(draft) => Some(draft),
            _ => None,
        }
    }

    /// Locks in the draft for sending
    pub fn begin_submit(&mut self) -> Result<VoteDraft, VoteRefusal> {
        match *self {
            Self::Open(draft) => {
                *self = Self::Submitting(draft);
                Ok(draft)
            }
            _ => Err(self.refusal().unwrap_or(VoteRefusal::InFlight)),
        }
    }

    /// Returns why the sliders can't be used right now, if they can't
    pub fn refusal(&self) -> Option<VoteRefusal> {
        match self {
            Self::Open(_) => None,
            Self::Closed => Some(VoteRefusal::Closed),
            Self::OwnPerformance => Some(VoteRefusal::OwnPerformance),
            Self::Voted => Some(VoteRefusal::AlreadyVoted),
            Self::Submitting(_) => Some(VoteRefusal::InFlight),
        }
    }

    /// The backend accepted the vote
    pub fn confirm(&mut self) {
        if matches!(self, Self::Submitting(_)) {
            *self = Self::Voted;
        }
    }

    /// The backend refused the vote, the sliders come back with the same values
    pub fn fail(&mut self) {
        if let Self::Submitting(draft) = *self {
            *self = Self::Open(draft);
        }
    }

    /// Returns true if the sliders should be shown
    pub fn shows_voting_ui(&self) -> bool {
        matches!(self, Self::Open(_) | Self::Submitting(_))
    }

    pub fn has_voted(&self) -> bool {
        matches!(self, Self::Voted)
    }
}

fn clamp_score(value: u8) -> u8 {
    value.clamp(MIN_SCORE, MAX_SCORE)
}
