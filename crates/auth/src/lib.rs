// Core modules
mod error;
mod password;
mod jwt;

pub mod guard;
pub mod model;
pub mod service;
pub mod store;

// Re-export error types
pub use error::{AuthError, Result};

// Re-export crypto primitives
pub use password::{hash_password, verify_password};
pub use jwt::{Claims, TokenRejection, TokenService};

pub use guard::{AuthGuard, GuardRejection, Principal, BYPASS_SUBJECT};
pub use model::{Permission, Role, User};
pub use service::AuthService;
pub use store::UserStore;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AuthError, Result,
        AuthGuard, AuthService, Principal,
        Permission, Role, User,
        Claims, TokenService,
    };
}
