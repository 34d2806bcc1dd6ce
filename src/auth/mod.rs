pub mod extractors;
pub mod identity;
pub mod middleware;
pub mod password;
pub mod token;

pub use extractors::CurrentUser;
pub use identity::IdentityResolver;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};
