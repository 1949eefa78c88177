use revmix_core::ChallengeData;
use validator::Validate;

use crate::{serialized::ChallengeList, ApiClient, ApiResult, NewChallengeSchema};

impl ApiClient {
    pub async fn challenges(&self) -> ApiResult<Vec<ChallengeData>> {
        let result: ChallengeList = self.get(self.url(&["challenges"])?).await?;
        Ok(result.challenges)
    }

    pub async fn create_challenge(&self, body: &NewChallengeSchema) -> ApiResult<ChallengeData> {
        body.validate()?;
        self.post(self.url(&["challenges"])?, body).await
    }
}
