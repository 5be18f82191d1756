pub mod client;
pub mod models;

pub use client::SignalClient;
pub use models::ApiError;
