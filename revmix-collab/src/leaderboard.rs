use revmix_core::{rank_label, UserData};

/// How many badges a leaderboard row shows
const SHOWN_BADGES: usize = 3;

/// A row of the global leaderboard
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub rank_label: String,
    pub user: UserData,
    /// True for the signed in user's own row
    pub is_current: bool,
}

impl LeaderboardEntry {
    /// Labels users in the order the backend ranked them
    pub fn rank(users: Vec<UserData>, current_user_id: Option<&str>) -> Vec<Self> {
        users
            .into_iter()
            .enumerate()
            .map(|(index, user)| Self {
                rank_label: rank_label(index),
                is_current: current_user_id == Some(user.id.as_str()),
                user,
            })
            .collect()
    }

    /// The badges shown next to the user
    pub fn badges(&self) -> &[String] {
        let shown = self.user.badges.len().min(SHOWN_BADGES);
        &self.user.badges[..shown]
    }
}
