//! Bearer-token identity extractor.

use axum::extract::FromRequestParts;
use http::request::Parts;
use uuid::Uuid;

use crate::error::DirectoryServiceError;
use crate::state::AppState;
use crate::usecase::session::validate_token;

/// Caller identity taken from the `Authorization: Bearer` header.
///
/// Rejects with 401 when the header is absent or the token fails
/// validation. Role enforcement (403) is done by handlers after extraction.
#[derive(Debug, Clone)]
pub struct Identity {
    pub uid: Uuid,
    pub role: String,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }

    pub fn require_admin(&self) -> Result<(), DirectoryServiceError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DirectoryServiceError::Forbidden)
        }
    }
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = DirectoryServiceError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let claims = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .and_then(|token| validate_token(token, &state.jwt_secret).ok());

        async move {
            let claims = claims.ok_or(DirectoryServiceError::InvalidCredential)?;
            let uid = claims
                .sub
                .parse::<Uuid>()
                .map_err(|_| DirectoryServiceError::InvalidCredential)?;
            Ok(Self {
                uid,
                role: claims.role,
            })
        }
    }
}
