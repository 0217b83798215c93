//! Path segment trie
//!
//! Each node consumes one path segment. Children keep registration order in
//! a `Vec`; that order decides which parameter node answers when several
//! could. The payload type is generic so the tree logic stays independent of
//! the async handler plumbing layered on top.

use std::collections::HashMap;

/// One segment of a route path.
///
/// Parameter segments keep their marker text (`:id`) as the stored segment
/// and additionally carry the bare name in `param`.
pub(crate) struct RouteNode<H> {
    segment: String,
    children: Vec<RouteNode<H>>,
    handler: Option<H>,
    param: Option<String>,
}

impl<H> RouteNode<H> {
    /// Tree root; matches the zero-segment path.
    pub fn root() -> Self {
        Self {
            segment: String::new(),
            children: Vec::new(),
            handler: None,
            param: None,
        }
    }

    /// Insert a handler at the node reached by `segments`, creating interior
    /// nodes as needed. Re-inserting over an existing terminal replaces its
    /// handler (last registration wins).
    ///
    /// # Panics
    ///
    /// Panics if `segments` introduces a second, differently named parameter
    /// child at a depth that already has one. Routes are static startup
    /// configuration; the shadowed route could never match.
    pub fn insert(&mut self, segments: &[&str], handler: H) {
        match segments.split_first() {
            None => self.handler = Some(handler),
            Some((part, rest)) => {
                let idx = self.child_index_or_insert(part);
                self.children[idx].insert(rest, handler);
            }
        }
    }

    fn child_index_or_insert(&mut self, part: &str) -> usize {
        if let Some(idx) = self.children.iter().position(|c| c.segment == part) {
            return idx;
        }

        let param = part.strip_prefix(':').map(str::to_string);
        if param.is_some() {
            if let Some(existing) = self.children.iter().find_map(|c| c.param.as_deref()) {
                panic!("conflicting route parameters at one depth: `:{existing}` vs `{part}`");
            }
        }

        self.children.push(Self {
            segment: part.to_string(),
            children: Vec::new(),
            handler: None,
            param,
        });
        self.children.len() - 1
    }

    /// Walk the tree along `segments`, binding parameter values into
    /// `params`. Literal children win over parameter children; among
    /// parameter children the first registered one is taken.
    ///
    /// Returns `None` when the walk dead-ends or the terminal node carries
    /// no handler.
    pub fn find(&self, segments: &[&str], params: &mut HashMap<String, String>) -> Option<&H> {
        let mut curr = self;
        for part in segments {
            let next = curr
                .children
                .iter()
                .find(|c| c.segment == *part)
                .or_else(|| curr.children.iter().find(|c| c.param.is_some()))?;
            if let Some(name) = &next.param {
                params.insert(name.clone(), (*part).to_string());
            }
            curr = next;
        }
        curr.handler.as_ref()
    }
}
