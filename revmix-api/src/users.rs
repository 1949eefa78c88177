use revmix_core::UserData;

use crate::{serialized::Leaderboard, ApiClient, ApiResult};

impl ApiClient {
    /// Returns the user the current session belongs to
    pub async fn me(&self) -> ApiResult<UserData> {
        self.get(self.url(&["users", "me"])?).await
    }

    /// Returns users ranked by XP. The backend picks the size when no limit is given.
    pub async fn leaderboard(&self, limit: Option<u32>) -> ApiResult<Vec<UserData>> {
        let mut url = self.url(&["users", "leaderboard"])?;

        if let Some(limit) = limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        }

        let result: Leaderboard = self.get(url).await?;
        Ok(result.leaderboard)
    }

    pub async fn profile(&self, user_id: &str) -> ApiResult<UserData> {
        self.get(self.url(&["users", "profile", user_id])?).await
    }
}
