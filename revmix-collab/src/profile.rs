use revmix_core::UserData;

/// The XP it takes to go up a level
const XP_PER_LEVEL: u64 = 1000;

/// A user's public stats
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub user: UserData,
    /// True if the profile is the signed in user's own
    pub is_own: bool,
}

impl ProfileView {
    pub fn new(user: UserData, current_user_id: Option<&str>) -> Self {
        let is_own = current_user_id == Some(user.id.as_str());
        Self { user, is_own }
    }

    /// XP gathered since the last level up
    pub fn xp_into_level(&self) -> u64 {
        self.user.xp % XP_PER_LEVEL
    }

    pub fn xp_per_level(&self) -> u64 {
        XP_PER_LEVEL
    }

    /// Progress to the next level, from 0 to 100
    pub fn level_progress_percent(&self) -> f64 {
        (self.xp_into_level() as f64 / 10.).min(100.)
    }
}
