//! Custom Axum extractors.

pub mod client_key;
pub mod json_body;
pub mod user_auth;

pub use client_key::{client_key_from_headers, ClientKey};
pub use json_body::JsonBody;
pub use user_auth::{OptionalUserAuth, UserAuth};
