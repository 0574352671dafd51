//! Ordered, case-insensitive header mapping.
//!
//! Names are unique regardless of case: inserting `content-type` after `Content-Type` replaces the
//! value in place and keeps the original position and spelling of the name. Iteration yields entries
//! in first-insertion order, which is the order the response encoder writes them to the wire.

use std::collections::HashMap;

/// A header map keyed by the lower-cased name, backed by an insertion ordered entry list.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    index: HashMap<String, usize>,
    entries: Vec<Option<(String, String)>>,
    len: usize,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, replacing the value of an existing header with the same name.
    ///
    /// Returns the previous value if the name was already present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        let key = name.to_ascii_lowercase();

        if let Some(&pos) = self.index.get(&key) {
            if let Some((_, old)) = self.entries[pos].as_mut() {
                return Some(std::mem::replace(old, value));
            }
        }

        self.index.insert(key, self.entries.len());
        self.entries.push(Some((name, value)));
        self.len += 1;
        None
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let pos = *self.index.get(&name.to_ascii_lowercase())?;
        self.entries[pos].as_ref().map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_ascii_lowercase())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.index.remove(&name.to_ascii_lowercase())?;
        let (_, value) = self.entries[pos].take()?;
        self.len -= 1;

        // compact once tombstones dominate, so long lived maps do not grow without bound
        if self.entries.len() > 16 && self.len * 2 < self.entries.len() {
            self.compact();
        }
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flatten().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn compact(&mut self) {
        self.entries.retain(Option::is_some);
        self.index.clear();
        for (pos, (name, _)) in self.entries.iter().flatten().enumerate() {
            self.index.insert(name.to_ascii_lowercase(), pos);
        }
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_lookup() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", "text/plain");

        assert_eq!(headers.get("content-type"), Some("text/plain"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/plain"));
        assert!(headers.contains("Content-type"));
        assert_eq!(headers.get("Content-Length"), None);
    }

    #[test]
    fn duplicate_overwrites_in_place() {
        let mut headers = HeaderMap::new();
        headers.insert("Host", "a");
        headers.insert("Accept", "*/*");
        assert_eq!(headers.insert("host", "b"), Some("a".to_string()));

        assert_eq!(headers.len(), 2);
        let entries: Vec<_> = headers.iter().collect();
        assert_eq!(entries, vec![("Host", "b"), ("Accept", "*/*")]);
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let mut headers = HeaderMap::new();
        headers.insert("A", "1");
        headers.insert("B", "2");
        headers.insert("C", "3");

        assert_eq!(headers.remove("b"), Some("2".to_string()));
        assert_eq!(headers.remove("b"), None);
        assert_eq!(headers.len(), 2);

        headers.insert("B", "4");
        let entries: Vec<_> = headers.iter().collect();
        assert_eq!(entries, vec![("A", "1"), ("C", "3"), ("B", "4")]);
    }

    #[test]
    fn compacts_after_many_removals() {
        let mut headers = HeaderMap::new();
        for i in 0..40 {
            headers.insert(format!("X-{i}"), i.to_string());
        }
        for i in 0..35 {
            headers.remove(&format!("x-{i}"));
        }

        assert_eq!(headers.len(), 5);
        assert_eq!(headers.get("X-39"), Some("39"));
        let names: Vec<_> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["X-35", "X-36", "X-37", "X-38", "X-39"]);
    }
}
