mod cookie;
mod credentials;
mod jwt;
mod lockout;
mod manager;
mod middleware;
pub mod storage;
mod types;

pub use cookie::{removal_cookie, session_cookie, SESSION_COOKIE};
pub use credentials::SingleAdminCredentials;
pub use jwt::verify_token;
pub use lockout::LockoutPolicy;
pub use manager::AuthManager;
pub use middleware::{AuthMiddleware, LOGIN_PATH};
pub use storage::{memory::MemoryAttemptStore, postgres::PostgresAttemptStore, AttemptStore};
pub use types::{LoginError, LoginForm};

#[cfg(test)]
pub use jwt::{generate_token, generate_token_at};
