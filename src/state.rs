use std::sync::Arc;

use crate::auth::{IdentityResolver, TokenService};
use crate::dashboard::DashboardAggregator;
use crate::store::DocumentStore;
use crate::tasks::TaskStore;
use crate::users::UserDirectory;

/// Shared application state: every component wired onto one store handle.
#[derive(Clone)]
pub struct AppState {
    pub users: UserDirectory,
    pub tasks: TaskStore,
    pub dashboard: DashboardAggregator,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, tokens: TokenService) -> Self {
        let users = UserDirectory::new(Arc::clone(&store));
        let tasks = TaskStore::new(store);
        let dashboard = DashboardAggregator::new(tasks.clone());
        Self {
            users,
            tasks,
            dashboard,
            tokens: Arc::new(tokens),
        }
    }

    /// The resolver handed to `AuthMiddleware`.
    pub fn identity_resolver(&self) -> IdentityResolver {
        IdentityResolver::new(Arc::clone(&self.tokens), self.users.clone())
    }
}
