//! Logger module
//!
//! Console logging for the server:
//! - Startup banner and shutdown messages
//! - Per-request access lines
//! - Error and warning lines
//! - Optional file targets

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use crate::error::ServerError;
use std::net::SocketAddr;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, root: &Path, config: &Config) {
    let port = addr.port();
    write_info("======================================");
    write_info(&format!("Static server listening on port {port}"));
    write_info(&format!("Serving files from: {}", root.display()));
    write_info(&format!("Open in your browser: http://localhost:{port}"));
    write_info(&format!("Also available at:    http://127.0.0.1:{port}"));
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("Press Ctrl+C to stop the server");
    write_info("======================================\n");
}

pub fn log_shutdown(signal: &str, in_flight: usize) {
    write_info(&format!("\n[Shutdown] {signal} received, listener closed"));
    if in_flight > 0 {
        write_info(&format!(
            "[Shutdown] Abandoning {in_flight} in-flight connection(s)"
        ));
    }
    write_info("[Shutdown] Server stopped");
}

/// Report a process-level failure before exiting
pub fn log_fatal(err: &ServerError) {
    match err {
        ServerError::PortInUse { .. } => write_error(&format!("[FATAL] {err}")),
        _ => write_error(&format!("[FATAL] Error: {err}")),
    }
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}
