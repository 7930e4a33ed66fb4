//! Ordered set of compiled pattern routes.
//!
//! # Responsibilities
//! - Hold `(anchored regex, value)` pairs for one verb
//! - Find the first pattern matching a whole path and capture its groups
//!
//! # Design Decisions
//! - Insertion order is match order, so overlapping patterns resolve
//!   deterministically (first registered wins)
//! - Capture groups are returned left to right; an optional group that did
//!   not participate captures the empty string

use regex::Regex;

/// A path matched by a pattern route.
#[derive(Debug)]
pub struct PatternMatch<'a, V> {
    pub value: &'a V,
    pub captures: Vec<String>,
}

#[derive(Debug)]
pub struct PatternSet<V> {
    entries: Vec<(Regex, V)>,
}

impl<V> Default for PatternSet<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> PatternSet<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pattern. The regex must already be anchored at both ends.
    pub fn push(&mut self, pattern: Regex, value: V) {
        self.entries.push((pattern, value));
    }

    /// Scan patterns in insertion order and stop at the first full match.
    pub fn find(&self, path: &str) -> Option<PatternMatch<'_, V>> {
        self.entries.iter().find_map(|(pattern, value)| {
            let caps = pattern.captures(path)?;
            let captures = caps
                .iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect();
            Some(PatternMatch { value, captures })
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchored(p: &str) -> Regex {
        Regex::new(&format!("^{}$", p)).unwrap()
    }

    #[test]
    fn test_captures_in_order() {
        let mut set = PatternSet::new();
        set.push(anchored(r"/([0-9]+)/([0-9]+)"), "pair");

        let m = set.find("/1/22").unwrap();
        assert_eq!(*m.value, "pair");
        assert_eq!(m.captures, vec!["1", "22"]);
    }

    #[test]
    fn test_anchored_match_only() {
        let mut set = PatternSet::new();
        set.push(anchored(r"/([0-9]+)"), "id");

        assert!(set.find("/12x").is_none());
        assert!(set.find("x/12").is_none());
    }

    #[test]
    fn test_first_registered_wins() {
        let mut set = PatternSet::new();
        set.push(anchored(r"/(.+)"), "any");
        set.push(anchored(r"/([0-9]+)"), "digits");

        assert_eq!(*set.find("/7").unwrap().value, "any");
    }

    #[test]
    fn test_optional_group_captures_empty() {
        let mut set = PatternSet::new();
        set.push(anchored(r"/a(b)?/(c)"), "opt");

        assert_eq!(set.find("/a/c").unwrap().captures, vec!["", "c"]);
    }
}
