//! External service integrations.

pub mod mux;
pub mod stripe;

pub use mux::MuxClient;
pub use stripe::StripeClient;
