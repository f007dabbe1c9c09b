//! Store-backed identity provider. Passwords are hashed with argon2; the
//! plaintext never leaves the provisioning call.

use anyhow::Context as _;
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, SqlErr,
};
use uuid::Uuid;

use staffdesk_directory_schema::identities;

use crate::domain::repository::{IdentityError, IdentityProvider};

#[derive(Clone)]
pub struct DbIdentityProvider {
    pub db: std::sync::Arc<DatabaseConnection>,
}

impl IdentityProvider for DbIdentityProvider {
    async fn create(&self, email: &str, password: &str) -> Result<Uuid, IdentityError> {
        let uid = Uuid::now_v7();
        let now = Utc::now();
        let result = identities::ActiveModel {
            uid: Set(uid),
            email: Set(email.to_owned()),
            password_hash: Set(hash_password(password)?),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await;
        match result {
            Ok(_) => Ok(uid),
            Err(e) => Err(registration_error(e, "create identity")),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Uuid, IdentityError> {
        let identity = identities::Entity::find()
            .filter(identities::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .context("find identity for authentication")?
            .ok_or(IdentityError::NotFound)?;
        if verify_password(password, &identity.password_hash)? {
            Ok(identity.uid)
        } else {
            Err(IdentityError::WrongCredential)
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Uuid>, IdentityError> {
        let identity = identities::Entity::find()
            .filter(identities::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .context("find identity by email")?;
        Ok(identity.map(|i| i.uid))
    }

    async fn update_credentials(
        &self,
        uid: Uuid,
        email: &str,
        password: &str,
    ) -> Result<(), IdentityError> {
        let result = identities::ActiveModel {
            uid: Set(uid),
            email: Set(email.to_owned()),
            password_hash: Set(hash_password(password)?),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(self.db.as_ref())
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(IdentityError::NotFound),
            Err(e) => Err(registration_error(e, "update identity credentials")),
        }
    }

    async fn delete(&self, uid: Uuid) -> Result<bool, IdentityError> {
        let result = identities::Entity::delete_many()
            .filter(identities::Column::Uid.eq(uid))
            .exec(self.db.as_ref())
            .await
            .context("delete identity")?;
        Ok(result.rows_affected > 0)
    }
}

/// The `identities.email` unique index is the at-most-one-identity-per-email
/// guarantee; a violation is a registration conflict, not an internal error.
fn registration_error(e: DbErr, what: &'static str) -> IdentityError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => IdentityError::EmailAlreadyRegistered,
        _ => IdentityError::Internal(anyhow::Error::new(e).context(what)),
    }
}

fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| IdentityError::Internal(anyhow::anyhow!("hash password: {e}")))
}

fn verify_password(password: &str, hash: &str) -> Result<bool, IdentityError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| IdentityError::Internal(anyhow::anyhow!("parse stored password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
