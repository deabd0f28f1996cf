//! HTTP protocol layer module
//!
//! Content types, cache validation, CORS headers and response builders,
//! independent of how paths are mapped to files.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_405_response, build_error_response, build_options_response,
    build_redirect_response,
};
