use std::sync::Arc;

use sea_orm::DatabaseConnection;

use staffdesk_domain::credentials::PasswordConvention;

use crate::infra::db::{DbEmployeeRepository, DbTaskRepository, DbUserProjectionRepository};
use crate::infra::feed::ChangeFeed;
use crate::infra::identity::DbIdentityProvider;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub feed: ChangeFeed,
    pub jwt_secret: String,
    pub email_domain: String,
    pub password_convention: PasswordConvention,
}

impl AppState {
    pub fn employee_repo(&self) -> DbEmployeeRepository {
        DbEmployeeRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserProjectionRepository {
        DbUserProjectionRepository {
            db: self.db.clone(),
        }
    }

    pub fn task_repo(&self) -> DbTaskRepository {
        DbTaskRepository {
            db: self.db.clone(),
        }
    }

    pub fn identity_provider(&self) -> DbIdentityProvider {
        DbIdentityProvider {
            db: self.db.clone(),
        }
    }
}
