//! Core types for Campus Eats.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod status;

pub use id::*;
pub use price::{CurrencyCode, Fees, Price, format_amount};
pub use status::*;
