pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use router::satusehat_routes;
pub use services::SatuSehatClient;
