//! Login and session tokens. A session is an explicit bearer token carrying
//! the identity uid and role, not ambient server-side state.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use staffdesk_domain::credentials::PasswordConvention;

use crate::domain::repository::{
    EmployeeRepository, IdentityError, IdentityProvider, UserProjectionRepository,
};
use crate::domain::types::UserProjection;
use crate::error::DirectoryServiceError;
use crate::usecase::provisioning::provision_identity;

pub const ACCESS_TOKEN_EXP: u64 = 60 * 60 * 12;

/// JWT claims for access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub role: String,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

pub fn issue_access_token(
    user: &UserProjection,
    secret: &str,
) -> Result<(String, u64), DirectoryServiceError> {
    let exp = now_secs() + ACCESS_TOKEN_EXP;
    let claims = TokenClaims {
        sub: user.uid.to_string(),
        role: user.role.clone(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| DirectoryServiceError::Internal(e.into()))?;
    Ok((token, exp))
}

/// Validate a bearer token (signature + expiry) and return its claims.
pub fn validate_token(token: &str, secret: &str) -> Result<TokenClaims, DirectoryServiceError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| DirectoryServiceError::InvalidCredential)?;

    Ok(data.claims)
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: UserProjection,
    pub access_token: String,
    pub access_token_exp: u64,
}

pub struct LoginUseCase<E, U, I> {
    pub employees: E,
    pub users: U,
    pub identity: I,
    pub jwt_secret: String,
    pub convention: PasswordConvention,
}

impl<E, U, I> LoginUseCase<E, U, I>
where
    E: EmployeeRepository,
    U: UserProjectionRepository,
    I: IdentityProvider,
{
    /// Authenticate against the identity provider and issue an access
    /// token. Every credential failure collapses to `InvalidCredential`;
    /// the response never reveals whether the email exists.
    ///
    /// An active employee whose identity was never provisioned (or was
    /// lost) is back-filled on the spot, provided the presented password
    /// matches the derived one.
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, DirectoryServiceError> {
        let employee = self
            .employees
            .find_active_by_email(&input.email)
            .await?
            .ok_or(DirectoryServiceError::InvalidCredential)?;

        let uid = match self.identity.authenticate(&input.email, &input.password).await {
            Ok(uid) => uid,
            Err(IdentityError::NotFound) => {
                let derived = self.convention.derive(&employee.name, &employee.code);
                if input.password != derived {
                    return Err(DirectoryServiceError::InvalidCredential);
                }
                provision_identity(&self.identity, &employee.email, &derived).await?
            }
            Err(IdentityError::WrongCredential) => {
                return Err(DirectoryServiceError::InvalidCredential);
            }
            Err(e) => return Err(e.into()),
        };

        // Refresh the projection on every successful login so stale mirrors
        // self-heal.
        let user = UserProjection::for_employee(uid, &employee);
        self.users.upsert(&user).await?;

        let (access_token, access_token_exp) = issue_access_token(&user, &self.jwt_secret)?;
        Ok(LoginOutput {
            user,
            access_token,
            access_token_exp,
        })
    }
}
