pub mod access_log;
pub mod auth;
pub mod rate_limit;

pub use access_log::access_log;
pub use auth::{authenticate, ApiClient};
pub use rate_limit::{rate_limit, RateDecision, RateLimiter};
