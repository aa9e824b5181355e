//! Bearer token authentication

pub mod middleware;
pub mod token;

pub use middleware::auth_middleware;
pub use token::TokenVerifier;
