//! Request handler module
//!
//! The static responder does the work; the request entry point wraps it with
//! method checks, the CORS layer and access logging.

mod listing;
pub mod request;
pub mod resolve;
pub mod static_files;

// Re-export main entry point
pub use request::handle_request;
