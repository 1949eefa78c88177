use revmix_core::AuthData;
use validator::Validate;

use crate::{ApiClient, ApiResult, LoginSchema, Message, RegisterSchema};

impl ApiClient {
    /// Exchanges credentials for a user and a session
    pub async fn login(&self, body: &LoginSchema) -> ApiResult<AuthData> {
        body.validate()?;
        self.post(self.url(&["auth", "login"])?, body).await
    }

    /// Creates an account. The backend may not hand out a session right away.
    pub async fn register(&self, body: &RegisterSchema) -> ApiResult<AuthData> {
        body.validate()?;
        self.post(self.url(&["auth", "register"])?, body).await
    }

    pub async fn logout(&self) -> ApiResult<Message> {
        self.post_empty(self.url(&["auth", "logout"])?).await
    }
}
