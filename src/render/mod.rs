//! Rendering helpers for the demo site
//!
//! Deliberately small: a single-pass Markdown-to-HTML converter and a
//! line-based template composer. Handlers consume both as plain functions;
//! the dispatch core knows nothing about them.

pub mod markdown;
pub mod template;
