pub mod client;

pub use client::SatuSehatClient;
