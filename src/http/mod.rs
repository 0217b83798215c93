//! HTTP protocol layer module
//!
//! Owned request snapshots and response builders, decoupled from routing
//! and dispatch logic.

pub mod mime;
pub mod request;
pub mod response;

pub use request::HttpRequest;
pub use response::{
    build_404_response, build_500_response, build_501_response, build_bytes_response,
    build_html_response, build_json_response, build_text_response, HttpResponse,
};
