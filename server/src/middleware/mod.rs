pub mod auth;
pub mod rate_limit;

pub use auth::{access_guard, AuthenticatedUser};
pub use rate_limit::{rate_limit_middleware, RateLimiter};
