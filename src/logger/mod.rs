//! Logger module
//!
//! Structured event logging for the dispatch pipeline: server lifecycle,
//! request lines, handler failures and connection errors. Logging is
//! fire-and-forget; it never influences control flow or response content.

pub mod writer;

use std::net::SocketAddr;

/// Initialize the logger with optional file targets.
///
/// Should be called once at application startup. Without initialization all
/// events fall back to stdout/stderr.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> std::io::Result<()> {
    writer::init(access_log_file, error_log_file)
}

fn write_info(message: &str) {
    if writer::is_initialized() {
        writer::get().write_info(message);
    } else {
        println!("{message}");
    }
}

fn write_error(message: &str) {
    if writer::is_initialized() {
        writer::get().write_error(message);
    } else {
        eprintln!("{message}");
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn log_server_start(addr: &SocketAddr) {
    write_info("======================================");
    write_info("Server started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info("======================================");
}

/// One line per dispatched request, before the chain runs.
pub fn log_request(method: &str, path: &str) {
    write_info(&format!("INFO {} {method} {path}", timestamp()));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// A handler returned an error; the client only ever sees the 500.
pub fn log_handler_error(path: &str, err: &dyn std::error::Error) {
    write_error(&format!("[ERROR] Handler failed for {path}: {err}"));
}

pub fn log_connection_error(peer_addr: &SocketAddr, err: &impl std::fmt::Debug) {
    write_error(&format!(
        "[ERROR] Failed to serve connection from {peer_addr}: {err:?}"
    ));
}
