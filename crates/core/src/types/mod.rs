//! Core types for Tamarind.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod shopper;
pub mod status;

pub use id::*;
pub use shopper::{SessionKey, Shopper};
pub use status::{CartStatus, OrderStatus};
