//! Scalar substitutions: `(tag, value)` pairs such as the title or help text.
//!
//! The registry is append-only. Registering the same tag twice keeps both
//! entries; [`ContentRegistry::effective`] resolves them to the most recently
//! registered value, placed at the tag's first registration position.

use std::collections::HashMap;

/// One scalar substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    tag: String,
    base_markup: String,
    value: String,
}

impl ContentEntry {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            base_markup: String::new(),
            value: value.into(),
        }
    }

    /// Entry carrying a wrapper markup alongside its value. Reserved: the
    /// engine substitutes `value` only.
    pub fn with_base_markup(
        tag: impl Into<String>,
        base_markup: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            base_markup: base_markup.into(),
            value: value.into(),
        }
    }

    /// Marker name without angle brackets.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn base_markup(&self) -> &str {
        &self.base_markup
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentRegistry {
    entries: Vec<ContentEntry>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.entries.push(ContentEntry::new(tag, value));
    }

    /// Every registered entry, duplicates included, in registration order.
    pub fn entries(&self) -> &[ContentEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One entry per tag: the last registered value wins, ordered by each
    /// tag's first appearance.
    pub fn effective(&self) -> Vec<&ContentEntry> {
        let mut slot_of: HashMap<&str, usize> = HashMap::new();
        let mut resolved: Vec<&ContentEntry> = Vec::new();
        for entry in &self.entries {
            match slot_of.get(entry.tag()) {
                Some(&slot) => resolved[slot] = entry,
                None => {
                    slot_of.insert(entry.tag(), resolved.len());
                    resolved.push(entry);
                }
            }
        }
        resolved
    }
}

impl<'a> IntoIterator for &'a ContentRegistry {
    type Item = &'a ContentEntry;
    type IntoIter = std::slice::Iter<'a, ContentEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
