use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::{error, info, warn};
use parking_lot::RwLock;
use revmix_api::{Message, NewVoteSchema};
use revmix_core::{
    PerformanceData, PerformanceId, RoomId, RoomPhase, RoomResultsData, RoomView, VoteAxis,
    VoteData, VoteDraft, VoteWidget,
};

use crate::{CollabContext, CollabError, CollabEvent, Submission, SubmissionError, VoteError};

/// A battle room as last fetched, with the voting widget of each performance
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub view: RoomView,
    pub widgets: HashMap<PerformanceId, VoteWidget>,
    pub fetched_at: DateTime<Utc>,
}

impl RoomSnapshot {
    pub fn widget(&self, performance_id: &str) -> Option<VoteWidget> {
        self.widgets.get(performance_id).copied()
    }

    /// Returns true if the judging list should be shown
    pub fn shows_judging(&self) -> bool {
        !self.view.performances.is_empty()
    }

    pub fn seconds_left(&self) -> u32 {
        self.view.seconds_left(self.fetched_at)
    }
}

/// The state of a battle room screen
pub struct BattleRoom {
    context: CollabContext,
    room_id: RoomId,
    snapshot: RwLock<Option<RoomSnapshot>>,
    /// Kept across refreshes so a vote never comes back
    widgets: DashMap<PerformanceId, VoteWidget>,
}

impl BattleRoom {
    pub fn new(context: &CollabContext, room_id: impl Into<RoomId>) -> Self {
        Self {
            context: context.clone(),
            room_id: room_id.into(),
            snapshot: Default::default(),
            widgets: Default::default(),
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Returns the room as last fetched
    pub fn snapshot(&self) -> Option<RoomSnapshot> {
        self.snapshot.read().clone()
    }

    /// Fetches the room and then its performances
    pub async fn refresh(&self) -> Result<RoomSnapshot, CollabError> {
        let user = self.context.require_user()?;
        let api = self.context.api();

        let room = api.room(&self.room_id).await?;
        let performances = api.room_performances(&self.room_id).await?;

        let now = Utc::now();
        let view = RoomView::new(room, performances, &user.id, now);

        self.sync_widgets(&view, &user.id);

        let snapshot = RoomSnapshot {
            widgets: self.widgets_snapshot(),
            view,
            fetched_at: now,
        };

        *self.snapshot.write() = Some(snapshot.clone());
        self.context.emit(CollabEvent::RoomUpdated {
            snapshot: snapshot.clone(),
        });

        Ok(snapshot)
    }

    /// Sends the user's performance
    pub async fn submit(&self, submission: Submission) -> Result<PerformanceData, CollabError> {
        let user = self.context.require_user()?;

        if let Some(snapshot) = self.snapshot() {
            match snapshot.view.phase() {
                RoomPhase::Create => {}
                RoomPhase::Waiting => return Err(SubmissionError::AlreadySubmitted.into()),
                RoomPhase::Results => return Err(SubmissionError::BattleEnded.into()),
            }
        }

        let body = submission.into_new_performance(&user.id, &self.room_id);
        let performance = self
            .context
            .api()
            .submit_performance(&body)
            .await
            .map_err(|e| {
                error!("Error submitting performance: {}", e);
                CollabError::SubmitFailed(e)
            })?;

        info!("Submitted performance {} to {}", performance.id, self.room_id);

        if let Some(snapshot) = self.snapshot.write().as_mut() {
            snapshot.view.submitted = true;
        }

        self.context.emit(CollabEvent::PerformanceSubmitted {
            room_id: self.room_id.clone(),
            performance_id: performance.id.clone(),
        });

        self.refresh_quietly().await;
        Ok(performance)
    }

    /// Moves a slider of a performance's voting widget
    pub fn set_score(
        &self,
        performance_id: &str,
        axis: VoteAxis,
        value: u8,
    ) -> Result<VoteDraft, CollabError> {
        let mut widget = self
            .widgets
            .get_mut(performance_id)
            .ok_or_else(|| VoteError::UnknownPerformance(performance_id.to_string()))?;

        if let Some(refusal) = widget.refusal() {
            return Err(VoteError::Refused(refusal).into());
        }

        let draft = widget
            .draft_mut()
            .ok_or_else(|| VoteError::UnknownPerformance(performance_id.to_string()))?;

        draft.set(axis, value);
        Ok(*draft)
    }

    /// Sends the draft of a performance's voting widget.
    ///
    /// A refused vote leaves the sliders where they were.
    pub async fn vote(&self, performance_id: &str) -> Result<VoteData, CollabError> {
        let user = self.context.require_user()?;

        let draft = {
            let mut widget = self
                .widgets
                .get_mut(performance_id)
                .ok_or_else(|| VoteError::UnknownPerformance(performance_id.to_string()))?;

            widget.begin_submit().map_err(VoteError::from)?
        };

        let body = NewVoteSchema::new(
            &user.id,
            performance_id,
            &self.room_id,
            (draft.flow, draft.lyrics, draft.creativity),
        );

        let result = self.context.api().submit_vote(&body).await;

        match result {
            Ok(vote) => {
                if let Some(mut widget) = self.widgets.get_mut(performance_id) {
                    widget.confirm();
                }

                info!("Voted on performance {}", performance_id);
                self.context.emit(CollabEvent::VoteSubmitted {
                    room_id: self.room_id.clone(),
                    performance_id: performance_id.to_string(),
                });

                self.refresh_quietly().await;
                Ok(vote)
            }
            Err(e) => {
                error!("Error submitting vote: {}", e);

                if let Some(mut widget) = self.widgets.get_mut(performance_id) {
                    widget.fail();
                }

                Err(VoteError::Failed(e).into())
            }
        }
    }

    pub async fn join(&self) -> Result<Message, CollabError> {
        let message = self.context.api().join_room(&self.room_id).await?;
        self.refresh_quietly().await;

        Ok(message)
    }

    pub async fn results(&self) -> Result<RoomResultsData, CollabError> {
        Ok(self.context.api().room_results(&self.room_id).await?)
    }

    /// Closes the room, which only its host may do
    pub async fn close(&self) -> Result<Message, CollabError> {
        let message = self.context.api().close_room(&self.room_id).await?;
        self.refresh_quietly().await;

        Ok(message)
    }

    async fn refresh_quietly(&self) {
        if let Err(e) = self.refresh().await {
            warn!("Could not refresh room {}: {}", self.room_id, e);
        }
    }

    fn sync_widgets(&self, view: &RoomView, user_id: &str) {
        let can_vote = view.can_vote();

        self.widgets
            .retain(|id, _| view.performances.iter().any(|p| &p.id == id));

        for performance in &view.performances {
            self.widgets
                .entry(performance.id.clone())
                .and_modify(|w| w.sync(performance, user_id, can_vote))
                .or_insert_with(|| VoteWidget::for_performance(performance, user_id, can_vote));
        }
    }

    fn widgets_snapshot(&self) -> HashMap<PerformanceId, VoteWidget> {
        self.widgets
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}
