pub mod identity;
pub mod middleware;
pub mod password;
pub mod rate_limit;
pub mod token;

// Re-export commonly used types
pub use identity::AuthUser;
pub use middleware::Authentication;
pub use rate_limit::RateLimiter;
pub use token::TokenManager;
