pub mod router;
pub mod state;
pub mod error;
pub mod auth_handlers;
pub mod product_handlers;
pub mod middleware;

pub use error::ApiError;
pub use router::{app, router};
pub use state::AppState;
