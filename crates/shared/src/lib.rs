//! Shared utilities and common types for the LoopEasy backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (hashing, webhook signature verification)
//! - Supabase access token verification
//! - Free-text sanitization
//! - Pagination helpers and common validation logic

pub mod crypto;
pub mod jwt;
pub mod pagination;
pub mod sanitize;
pub mod validation;
