use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::auth::{dto::ErrorBody, repo::StoreError};

pub const MISSING_FIELDS: &str = "Please Enter All Fields.";
pub const PASSWORD_TOO_SHORT: &str = "Password Should Be 6 Characters or More.";
pub const PASSWORD_MISMATCH: &str = "Password Does Not Match. Please Try Again.";

/// Everything a credential operation can fail with. Only `Internal` hides its
/// cause from the client.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("Email Address is Taken, Please Try Again.")]
    Conflict,
    // Same text for unknown email and wrong password.
    #[error("Wrong Email or Password")]
    InvalidCredentials,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => Self::Conflict,
            StoreError::Other(e) => Self::Internal(e),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Internal(e) => {
                error!(error = ?e, "credential operation failed");
                status.into_response()
            }
            other => (
                status,
                Json(ErrorBody {
                    error_message: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(res: Response) -> Vec<u8> {
        axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn client_errors_echo_message() {
        let res = AuthError::Validation(PASSWORD_TOO_SHORT).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&body_of(res).await).unwrap();
        assert_eq!(body["errorMessage"], PASSWORD_TOO_SHORT);
    }

    #[tokio::test]
    async fn internal_error_body_is_empty() {
        let res = AuthError::Internal(anyhow::anyhow!("db password is hunter2")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_of(res).await.is_empty());
    }

    #[test]
    fn duplicate_store_error_maps_to_conflict() {
        assert!(matches!(AuthError::from(StoreError::Duplicate), AuthError::Conflict));
        let other = AuthError::from(StoreError::Other(anyhow::anyhow!("boom")));
        assert_eq!(other.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
