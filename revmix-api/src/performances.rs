use revmix_core::PerformanceData;
use validator::Validate;

use crate::{serialized::PerformanceList, ApiClient, ApiResult, NewPerformanceSchema};

impl ApiClient {
    /// Returns the performances of a room, as ordered by the backend
    pub async fn room_performances(&self, room_id: &str) -> ApiResult<Vec<PerformanceData>> {
        let result: PerformanceList = self
            .get(self.url(&["performances", "room", room_id])?)
            .await?;

        Ok(result.performances)
    }

    pub async fn submit_performance(
        &self,
        body: &NewPerformanceSchema,
    ) -> ApiResult<PerformanceData> {
        body.validate()?;
        self.post(self.url(&["performances"])?, body).await
    }
}
