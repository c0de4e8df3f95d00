pub mod auth;

pub use auth::{auth_middleware, require_roles, AuthUser, ADMIN, ADMIN_OR_PANDIT, PANDIT, USER, USER_OR_ADMIN};
