pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::AuthState;
pub use router::{auth_routes, verification_routes};
