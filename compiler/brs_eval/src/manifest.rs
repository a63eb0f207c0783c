//! Application manifest.
//!
//! A read-only `key=value` map parsed from the manifest text. A few keys
//! switch runtime behavior; the rest is exposed to hosts as is.

use rustc_hash::FxHashMap;

/// Parsed manifest entries.
///
/// Keys keep their spelling for listing; lookups ignore case.
#[derive(Clone, Debug, Default)]
pub struct Manifest {
    entries: Vec<(String, String)>,
    index: FxHashMap<String, usize>,
}

impl Manifest {
    pub fn new() -> Self {
        Manifest::default()
    }

    /// Parses manifest text.
    ///
    /// Blank lines and `#` comments are skipped, as are lines without an
    /// `=` or with an empty key or value. Keys and values are trimmed.
    /// A repeated key keeps its last value.
    pub fn parse(contents: &str) -> Self {
        let mut manifest = Manifest::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                continue;
            }
            manifest.insert(key, value);
        }
        manifest
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        let lowered = key.to_lowercase();
        match self.index.get(&lowered) {
            Some(&pos) => self.entries[pos] = (key.to_owned(), value.to_owned()),
            None => {
                self.index.insert(lowered, self.entries.len());
                self.entries.push((key.to_owned(), value.to_owned()));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let pos = *self.index.get(&key.to_lowercase())?;
        self.entries.get(pos).map(|(_, value)| value.as_str())
    }

    /// Entries in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key presses are modeled one at a time unless `multi_key_events=1`.
    pub fn single_key_events(&self) -> bool {
        self.get("multi_key_events") != Some("1")
    }
}

#[cfg(test)]
mod tests;
