//! Tamarind Core - Shared types library.
//!
//! This crate provides common types used across Tamarind components:
//! - `storefront` - Public-facing checkout service
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, status enums, and the shopper principal

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
