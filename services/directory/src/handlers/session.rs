use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::domain::repository::UserProjectionRepository;
use crate::domain::types::UserProjection;
use crate::error::DirectoryServiceError;
use crate::identity::Identity;
use crate::state::AppState;
use crate::usecase::session::{LoginInput, LoginUseCase};

#[derive(Serialize)]
pub struct UserResponse {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub employee_code: String,
    pub role: String,
    pub avatar_text: String,
}

impl From<UserProjection> for UserResponse {
    fn from(u: UserProjection) -> Self {
        Self {
            uid: u.uid.to_string(),
            email: u.email,
            name: u.name,
            employee_code: u.code.as_str().to_owned(),
            role: u.role,
            avatar_text: u.avatar_text,
        }
    }
}

// ── POST /session ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub access_token_exp: u64,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, DirectoryServiceError> {
    let usecase = LoginUseCase {
        employees: state.employee_repo(),
        users: state.user_repo(),
        identity: state.identity_provider(),
        jwt_secret: state.jwt_secret.clone(),
        convention: state.password_convention,
    };
    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(LoginResponse {
        user: out.user.into(),
        access_token: out.access_token,
        access_token_exp: out.access_token_exp,
    }))
}

// ── GET /session ─────────────────────────────────────────────────────────────

pub async fn whoami(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, DirectoryServiceError> {
    // A valid token whose projection is gone means the employee was removed
    // after issuance; the session is no longer good.
    let user = state
        .user_repo()
        .find_by_uid(identity.uid)
        .await?
        .ok_or(DirectoryServiceError::InvalidCredential)?;
    Ok(Json(user.into()))
}
