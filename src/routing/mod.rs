//! Routing module
//!
//! A per-method path trie: one [`RouteNode`] tree per HTTP method, owned by
//! a [`Router`] that registers routes and resolves a request to a handler
//! plus its captured path parameters.

mod router;
mod trie;

pub use router::{PathParams, RouteMethod, Router};
pub(crate) use trie::RouteNode;
