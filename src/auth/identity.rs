use chrono::Utc;
use std::sync::Arc;

use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::models::User;
use crate::users::UserDirectory;

/// Resolves a bearer token to the account it was issued for.
///
/// Composes the token service and the user directory: the token must carry a
/// valid signature and an unexpired claim, and its subject must still match a
/// registered user. Every failure mode is `Unauthorized`.
#[derive(Clone)]
pub struct IdentityResolver {
    tokens: Arc<TokenService>,
    users: UserDirectory,
}

impl IdentityResolver {
    pub fn new(tokens: Arc<TokenService>, users: UserDirectory) -> Self {
        Self { tokens, users }
    }

    pub async fn resolve(&self, token: &str) -> Result<User, AppError> {
        let subject = self.tokens.validate(token, Utc::now())?;
        match self.users.find_by_email(&subject).await? {
            Some(user) => Ok(user),
            None => Err(AppError::Unauthorized(
                "Token subject is not a known user".to_string(),
            )),
        }
    }
}
