//! Domain layer for the LoopEasy backend.
//!
//! This crate contains:
//! - Domain models (Channel, Video, Profile, SoulShield settings)
//! - AI channel matching
//! - Payment and video pipeline seams

pub mod models;
pub mod services;
