use revmix_core::AudioEffectData;
use validator::Validate;

use crate::{serialized::EffectList, ApiClient, ApiResult, NewEffectSchema};

impl ApiClient {
    /// Returns the catalog of clips usable on the timeline
    pub async fn effects(&self) -> ApiResult<Vec<AudioEffectData>> {
        let result: EffectList = self.get(self.url(&["audio-effects"])?).await?;
        Ok(result.effects)
    }

    /// Adds a custom clip to the catalog
    pub async fn create_effect(&self, body: &NewEffectSchema) -> ApiResult<AudioEffectData> {
        body.validate()?;
        self.post(self.url(&["audio-effects"])?, body).await
    }
}
