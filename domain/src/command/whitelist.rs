//! Recognized option names for one external tool

use std::collections::BTreeSet;

/// Fixed set of option names a tool (or subcommand) accepts.
///
/// May be empty, in which case every flag option is dropped and only
/// positional arguments reach the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    names: BTreeSet<String>,
}

impl Whitelist {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Union of several sub-tool whitelists
    pub fn union<'a>(parts: impl IntoIterator<Item = &'a Whitelist>) -> Self {
        let mut names = BTreeSet::new();
        for part in parts {
            names.extend(part.names.iter().cloned());
        }
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Whitelist {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}
