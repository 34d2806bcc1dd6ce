use serde_json::json;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::User;
use crate::store::{DocumentStore, Filter};

const COLLECTION: &str = "users";

/// Lookup and creation of accounts keyed by email.
///
/// Emails are normalized to lowercase on both write and read, so lookups
/// behave case-insensitively. Accounts are created once at registration and
/// never updated or deleted here.
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn DocumentStore>,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let filter = Filter::new().eq("email", json!(email.to_lowercase()));
        match self.store.find_one(COLLECTION, &filter).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    /// Inserts a new account. Duplicate emails are the caller's job to check
    /// beforehand; concurrent registrations of the same email are not guarded
    /// against here.
    pub async fn create(
        &self,
        name: String,
        email: String,
        password_hash: String,
    ) -> Result<User, AppError> {
        let user = User::new(name, email.to_lowercase(), password_hash);
        self.store
            .insert_one(COLLECTION, serde_json::to_value(&user)?)
            .await?;
        Ok(user)
    }
}
