/// Backend placeholder for "no explicit cluster/namespace".
pub const PLACEHOLDER_SCOPE: &str = "~";
pub const LOCAL_SCOPE: &str = "local";

/// Rewrite the backend's `~` placeholder to `local`; any other name passes through.
pub fn scope_name(name: &str) -> &str {
    if name == PLACEHOLDER_SCOPE {
        LOCAL_SCOPE
    } else {
        name
    }
}

/// Insertion-ordered label set shared across one traversal.
///
/// `set` on an existing key replaces the value in place, so a key keeps the
/// position of its first insertion. There is no removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<(String, String)>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.tags.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.tags.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Current tags, in insertion order.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.tags.clone()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
