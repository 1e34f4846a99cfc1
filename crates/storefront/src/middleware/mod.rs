//! HTTP middleware for the storefront.
//!
//! # Layer Order (outermost first)
//!
//! 1. Sentry layers (added in `main`)
//! 2. CORS
//! 3. `TraceLayer`, opening the `http_request` span
//! 4. Request ID, recorded into that span and the Sentry scope

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
