use std::collections::BTreeMap;
use std::collections::btree_map;

/// RTSP header container (RFC 2326 §4.2).
///
/// Maps a header name, exactly as received, to one or more values. Names are
/// kept in a sorted map so iteration is always in ascending byte order, which
/// is the order the serializer writes them in.
///
/// Names are case-sensitive keys: `CSeq` and `cseq` are distinct entries.
/// Use [`get_ignore_case`](Self::get_ignore_case) for RFC-style lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    entries: BTreeMap<String, Vec<String>>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to a single value, replacing any previous values.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), vec![value.into()]);
    }

    /// Add a value to `name`, keeping values already present.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// First value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of `name`, in the order they were added.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value of the first header whose name matches `name` ignoring
    /// ASCII case.
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Remove `name`, returning its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.entries.remove(name)
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, values)` in ascending byte order of name.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }
}

/// Iterator over the entries of a [`Header`], sorted by name.
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, Vec<String>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a [String]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Header {
    type Item = (&'a str, &'a [String]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N: Into<String>, V: Into<String>> Extend<(N, V)> for Header {
    fn extend<T: IntoIterator<Item = (N, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.append(name, value);
        }
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Header {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut header = Header::new();
        header.extend(iter);
        header
    }
}
