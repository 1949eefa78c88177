use log::{error, info};
use revmix_api::{ApiClient, ApiError, LoginSchema, RegisterSchema};
use revmix_core::{SessionData, UserData};
use thiserror::Error;

/// The tab the auth form is on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthTab {
    #[default]
    Login,
    Register,
}

/// The sign in and sign up form
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub tab: AuthTab,
    pub username: String,
    /// Only sent when registering
    pub email: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum AuthFormError {
    #[error("Please fill in all required fields")]
    MissingFields,
    /// The backend refused the credentials
    #[error("{0}")]
    Rejected(String),
    #[error("Network error. Please try again.")]
    Network,
}

impl AuthForm {
    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            tab: AuthTab::Login,
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn register(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            tab: AuthTab::Register,
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Checks that the form can be sent. Blank fields count as missing.
    pub fn validate(&self) -> Result<(), AuthFormError> {
        if self.username.trim().is_empty() || self.password.trim().is_empty() {
            return Err(AuthFormError::MissingFields);
        }

        Ok(())
    }

    /// Sends the form, returning the user and the session they got
    pub async fn submit(&self, api: &ApiClient) -> Result<(UserData, SessionData), AuthFormError> {
        self.validate()?;

        let result = match self.tab {
            AuthTab::Login => {
                api.login(&LoginSchema {
                    username: self.username.clone(),
                    password: self.password.clone(),
                })
                .await
            }
            AuthTab::Register => {
                api.register(&RegisterSchema {
                    username: self.username.clone(),
                    email: self.email.clone(),
                    password: self.password.clone(),
                })
                .await
            }
        };

        let auth = result.map_err(|e| {
            error!("Auth error: {}", e);
            rejection(e)
        })?;

        // Registering may succeed without a session, which can't be signed in with
        let session = auth
            .session
            .ok_or_else(|| AuthFormError::Rejected("Authentication failed".to_string()))?;

        info!("Authenticated as {}", auth.user.username);

        Ok((auth.user, session))
    }
}

fn rejection(error: ApiError) -> AuthFormError {
    match error {
        ApiError::Network(_) => AuthFormError::Network,
        ApiError::Invalid(e) => AuthFormError::Rejected(e.to_string()),
        e => AuthFormError::Rejected(
            e.detail()
                .unwrap_or("Authentication failed")
                .to_string(),
        ),
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::{AuthForm, AuthFormError};

    #[test]
    fn blank_fields_block_submission() {
        for (username, password) in [("", "bars"), ("mc", "  "), (" ", "\t"), ("", "")] {
            let form = AuthForm::login(username, password);

            assert_matches!(form.validate(), Err(AuthFormError::MissingFields));
            assert_eq!(
                form.validate().unwrap_err().to_string(),
                "Please fill in all required fields"
            );
        }

        assert!(AuthForm::login("mc", "bars").validate().is_ok());

        // Email is optional, even when registering
        assert!(AuthForm::register("mc", "", "bars").validate().is_ok());
    }
}
