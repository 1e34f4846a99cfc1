//! Campus Eats Storefront library.
//!
//! This crate provides the storefront functionality as a library, allowing
//! it to be tested and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod tracking;
