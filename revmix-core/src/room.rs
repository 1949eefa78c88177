use chrono::{DateTime, Utc};

use crate::{PerformanceData, RoomData, RoomStatus};

/// The part of a battle the user is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    /// The user can still record and submit a performance
    Create,
    /// The user submitted and waits for the battle to end
    Waiting,
    /// The battle is over and results are shown
    Results,
}

/// What a battle room looks like to a given user at a given time.
#[derive(Debug, Clone)]
pub struct RoomView {
    pub room: RoomData,
    pub performances: Vec<PerformanceData>,
    /// True once the room is past its expiry, whatever its status says, or reported closed
    pub expired: bool,
    /// True if the user already has a performance in the room
    pub submitted: bool,
}

impl RoomView {
    pub fn new(
        room: RoomData,
        performances: Vec<PerformanceData>,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let expired = room.is_expired_at(now);
        let submitted = performances.iter().any(|p| p.user_id == user_id);

        Self {
            room,
            performances,
            expired,
            submitted,
        }
    }

    pub fn phase(&self) -> RoomPhase {
        if self.expired {
            RoomPhase::Results
        } else if self.submitted {
            RoomPhase::Waiting
        } else {
            RoomPhase::Create
        }
    }

    /// Returns true if the recorder and submit actions should be shown
    pub fn shows_submission(&self) -> bool {
        self.phase() == RoomPhase::Create
    }

    pub fn can_vote(&self) -> bool {
        !self.expired
    }

    /// Returns true if the live rankings should be shown
    pub fn shows_rankings(&self) -> bool {
        self.expired || !self.performances.is_empty()
    }

    /// Performances ordered by average score, best first. Ties keep the backend's order.
    pub fn rankings(&self) -> Vec<&PerformanceData> {
        rank_performances(&self.performances)
    }

    /// Whole seconds until the room expires, 0 once it has
    pub fn seconds_left(&self, now: DateTime<Utc>) -> u32 {
        if self.expired {
            return 0;
        }

        (self.room.expires_at - now).num_seconds().max(0) as u32
    }

    /// Returns a `joined/max` summary of the participants
    pub fn participant_summary(&self) -> String {
        format!(
            "{}/{}",
            self.room.participants.len(),
            self.room.max_participants
        )
    }
}

/// Orders performances by average score, best first
pub fn rank_performances(performances: &[PerformanceData]) -> Vec<&PerformanceData> {
    let mut ranked: Vec<_> = performances.iter().collect();
    ranked.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
    ranked
}

impl RoomStatus {
    /// The label of the button that takes the user into a room with this status
    pub fn action_label(&self) -> &'static str {
        match self {
            RoomStatus::Active => "Join Battle",
            RoomStatus::Waiting => "Enter Lobby",
            RoomStatus::Closed => "Battle Ended",
            _ => "View Results",
        }
    }

    /// Returns true if the user can still enter a room with this status from the feed
    pub fn is_enterable(&self) -> bool {
        !matches!(self, RoomStatus::Closed | RoomStatus::Completed)
    }
}

#[cfg(test)]
mod test {
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    use super::{RoomPhase, RoomView};
    use crate::{PerformanceData, RoomData, RoomStatus};

    fn room(status: &str, expires_at: &str) -> RoomData {
        serde_json::from_value(json!({
            "id": "r1",
            "name": "Cypher",
            "status": status,
            "participants": ["mc", "judge"],
            "max_participants": 8,
            "expires_at": expires_at,
        }))
        .unwrap()
    }

    fn performance(id: &str, user_id: &str, average_score: f64) -> PerformanceData {
        serde_json::from_value(json!({
            "id": id,
            "user_id": user_id,
            "average_score": average_score,
        }))
        .unwrap()
    }

    #[test]
    fn expired_rooms_hide_submission_whatever_the_status() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        for status in ["waiting", "active", "judging", "completed"] {
            let view = RoomView::new(room(status, "2024-06-01T11:59:59Z"), vec![], "mc", now);

            assert_eq!(view.phase(), RoomPhase::Results);
            assert!(!view.shows_submission());
            assert!(!view.can_vote());
            assert!(view.shows_rankings());
        }

        let view = RoomView::new(room("closed", "2024-06-01T13:00:00Z"), vec![], "mc", now);
        assert_eq!(view.phase(), RoomPhase::Results);
    }

    #[test]
    fn submitting_moves_to_waiting() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let open = room("active", &(now + Duration::hours(1)).to_rfc3339());

        let view = RoomView::new(open.clone(), vec![], "mc", now);
        assert_eq!(view.phase(), RoomPhase::Create);
        assert!(view.shows_submission());
        assert!(!view.shows_rankings());

        let view = RoomView::new(open, vec![performance("p1", "mc", 0.)], "mc", now);
        assert_eq!(view.phase(), RoomPhase::Waiting);
        assert!(view.can_vote());
        assert_eq!(view.participant_summary(), "2/8");
        assert_eq!(view.seconds_left(now), 3600);
    }

    #[test]
    fn rankings_are_best_first_and_stable() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let view = RoomView::new(
            room("active", "2024-06-01T13:00:00Z"),
            vec![
                performance("a", "u1", 5.),
                performance("b", "u2", 8.5),
                performance("c", "u3", 5.),
            ],
            "mc",
            now,
        );

        let order: Vec<_> = view.rankings().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn feed_labels_follow_status() {
        assert_eq!(RoomStatus::Active.action_label(), "Join Battle");
        assert_eq!(RoomStatus::Waiting.action_label(), "Enter Lobby");
        assert_eq!(RoomStatus::Closed.action_label(), "Battle Ended");
        assert_eq!(RoomStatus::Completed.action_label(), "View Results");
        assert!(!RoomStatus::Completed.is_enterable());
        assert!(RoomStatus::Judging.is_enterable());
    }
}
