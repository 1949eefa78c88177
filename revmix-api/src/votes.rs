use revmix_core::VoteData;
use validator::Validate;

use crate::{serialized::VoteList, ApiClient, ApiResult, NewVoteSchema};

impl ApiClient {
    /// Submits a vote. The backend refuses a second vote on the same performance.
    pub async fn submit_vote(&self, body: &NewVoteSchema) -> ApiResult<VoteData> {
        body.validate()?;
        self.post(self.url(&["votes"])?, body).await
    }

    pub async fn performance_votes(&self, performance_id: &str) -> ApiResult<Vec<VoteData>> {
        let result: VoteList = self
            .get(self.url(&["votes", "performance", performance_id])?)
            .await?;

        Ok(result.votes)
    }
}
