//! Prefix tree over literal paths.
//!
//! # Responsibilities
//! - Index placeholder-free paths one character (code point) per edge
//! - Reject a second insertion of the same literal path
//!
//! # Design Decisions
//! - Only endpoint nodes carry a value; interior nodes never do
//! - Lookup is O(path length), independent of route count

use std::collections::HashMap;

use crate::error::TrieError;

/// A node of the prefix tree; the root is the empty path.
#[derive(Debug)]
pub struct StaticTrie<V> {
    children: HashMap<char, StaticTrie<V>>,
    value: Option<V>,
}

impl<V> Default for StaticTrie<V> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            value: None,
        }
    }
}

impl<V> StaticTrie<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` at `path`, creating one node per character.
    pub fn add(&mut self, path: &str, value: V) -> Result<(), TrieError> {
        if path.is_empty() {
            return Err(TrieError::EmptyPath);
        }

        let mut node = self;
        for c in path.chars() {
            node = node.children.entry(c).or_default();
        }

        if node.value.is_some() {
            return Err(TrieError::AlreadyExists(path.to_string()));
        }
        node.value = Some(value);
        Ok(())
    }

    /// Value stored at exactly `path`, if that literal path was added.
    pub fn get(&self, path: &str) -> Option<&V> {
        if path.is_empty() {
            return None;
        }

        let mut node = self;
        for c in path.chars() {
            node = node.children.get(&c)?;
        }
        node.value.as_ref()
    }

    /// Number of endpoints in the tree.
    pub fn len(&self) -> usize {
        let own = usize::from(self.value.is_some());
        own + self.children.values().map(StaticTrie::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
