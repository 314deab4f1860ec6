pub mod auth_middleware;
pub mod hashing;
pub mod jwt;
pub mod mailer;
pub mod rate_limit;
pub mod security;
pub mod two_factor;
