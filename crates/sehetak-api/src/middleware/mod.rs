//! HTTP middleware: request logging, CORS, and server error details.

pub mod cors;
pub mod error_details;
pub mod logging;
