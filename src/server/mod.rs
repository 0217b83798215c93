//! TCP listener setup

mod listener;

pub use listener::bind_listener;
