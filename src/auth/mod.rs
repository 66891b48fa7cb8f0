pub mod auth_dto;
pub mod auth_handlers;
pub mod jwt;
pub mod password;

pub use jwt::{issue_session_token, verify_session_token, SESSION_COOKIE, SESSION_TTL_DAYS};
pub use password::{hash_password, verify_password};
