pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod utils;

pub use claims::{Claims, RefreshClaims};
pub use jwt::JwtService;
pub use middleware::{AuthMiddleware, AuthenticatedUser};
pub use utils::require_owner;
