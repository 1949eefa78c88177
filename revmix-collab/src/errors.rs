use revmix_api::ApiError;
use revmix_core::{RecorderError, TimelineError, VoteRefusal};
use revmix_impls::UploadError;
use thiserror::Error;

use crate::{AuthFormError, CreateRoomError, RouterError, SessionStoreError, SubmissionError};

#[derive(Debug, Error)]
pub enum CollabError {
    #[error("Sign in to continue")]
    SignedOut,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Auth(#[from] AuthFormError),
    #[error(transparent)]
    Store(#[from] SessionStoreError),
    #[error(transparent)]
    Router(#[from] RouterError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("{}", failure_message(.0, "Error submitting performance"))]
    SubmitFailed(ApiError),
    #[error(transparent)]
    Vote(#[from] VoteError),
    #[error(transparent)]
    CreateRoom(#[from] CreateRoomError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Timeline(#[from] TimelineError),
    #[error(transparent)]
    Recorder(#[from] RecorderError),
}

#[derive(Debug, Error)]
pub enum VoteError {
    #[error(transparent)]
    Refused(#[from] VoteRefusal),
    #[error("Performance {0} is not in this battle")]
    UnknownPerformance(String),
    #[error("{}", failure_message(.0, "Error submitting vote"))]
    Failed(ApiError),
}

impl CollabError {
    /// The message to show the user when an action fails
    pub fn alert(&self) -> String {
        match self {
            Self::Api(ApiError::Network(_)) => "Network error. Please try again.".to_string(),
            Self::Api(e) => e.detail().map(str::to_string).unwrap_or_else(|| e.to_string()),
            e => e.to_string(),
        }
    }

    /// Returns true if the backend no longer accepts the session
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_unauthorized())
    }
}

/// The backend's reason for a failed action, or the fallback when it gave none
pub(crate) fn failure_message(error: &ApiError, fallback: &str) -> String {
    match error {
        ApiError::Network(_) => format!("{}. Please try again.", fallback),
        e => e.detail().unwrap_or(fallback).to_string(),
    }
}

#[cfg(test)]
mod test {
    use revmix_api::ApiError;
    use revmix_core::VoteRefusal;

    use super::{CollabError, VoteError};

    #[test]
    fn alerts_prefer_the_backend_detail() {
        let error = VoteError::Failed(ApiError::Status {
            status: 400,
            detail: Some("You cannot vote for your own performance".into()),
        });
        assert_eq!(error.to_string(), "You cannot vote for your own performance");

        let error = VoteError::Failed(ApiError::Status {
            status: 500,
            detail: None,
        });
        assert_eq!(error.to_string(), "Error submitting vote");

        let error = CollabError::from(VoteError::from(VoteRefusal::Closed));
        assert_eq!(error.alert(), "Voting is closed for this battle");
    }

    #[test]
    fn network_failures_ask_to_retry() {
        let error = CollabError::Api(ApiError::Network("connection refused".into()));
        assert_eq!(error.alert(), "Network error. Please try again.");

        let error = CollabError::SubmitFailed(ApiError::Network("connection refused".into()));
        assert_eq!(error.alert(), "Error submitting performance. Please try again.");
    }
}
