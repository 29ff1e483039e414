//! Ordered option-name → value mapping

use super::option_value::OptionValue;
use crate::core::error::DomainError;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Reserved key holding positional (non-flag) arguments.
///
/// Its value is never checked against a whitelist and is always emitted
/// after every flag token.
pub const POSITIONAL_KEY: &str = "--";

/// One layer of tool configuration: option names mapped to values.
///
/// Keys are unique. Iteration follows insertion order; replacing an existing
/// key keeps its first position. This keeps serialized command lines
/// deterministic for a given sequence of inserts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentMap {
    entries: Vec<(String, OptionValue)>,
}

impl ArgumentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an option, returning the previous value
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> Option<OptionValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert of a value-less flag
    pub fn with_flag(self, key: impl Into<String>) -> Self {
        self.with(key, OptionValue::Flag)
    }

    /// Builder-style insert of positional arguments under [`POSITIONAL_KEY`]
    pub fn with_positional<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(POSITIONAL_KEY, OptionValue::values(values))
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<OptionValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Positional arguments, if any were set
    pub fn positional(&self) -> Option<&OptionValue> {
        self.get(POSITIONAL_KEY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shallow merge: `overrides` wins on every shared key.
    ///
    /// Keys from `self` keep their position; keys only in `overrides` are
    /// appended in the order they appear there. Composite values are replaced
    /// whole, never combined.
    pub fn merged_with(&self, overrides: &ArgumentMap) -> ArgumentMap {
        let mut merged = self.clone();
        for (key, value) in overrides.iter() {
            merged.insert(key, value.clone());
        }
        merged
    }

    /// Check the structure of every entry.
    ///
    /// Option names must be non-empty and free of whitespace. Positional
    /// arguments must not be a bare flag and must not contain empty strings.
    /// Whitelist membership is not checked here.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (key, value) in &self.entries {
            if key == POSITIONAL_KEY {
                validate_positional(value)?;
                continue;
            }
            if key.is_empty() || key.chars().any(char::is_whitespace) {
                return Err(DomainError::InvalidOptionName(key.clone()));
            }
        }
        Ok(())
    }
}

fn validate_positional(value: &OptionValue) -> Result<(), DomainError> {
    match value {
        OptionValue::Flag => Err(DomainError::FlagAsPositional),
        OptionValue::Value(_) => Ok(()),
        OptionValue::Values(values) => match values.iter().position(String::is_empty) {
            Some(index) => Err(DomainError::EmptyPositionalValue { index }),
            None => Ok(()),
        },
    }
}

impl<K, V> FromIterator<(K, V)> for ArgumentMap
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = ArgumentMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for ArgumentMap
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl Serialize for ArgumentMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct ArgumentMapVisitor;

impl<'de> Visitor<'de> for ArgumentMapVisitor {
    type Value = ArgumentMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a table of option names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ArgumentMap, A::Error> {
        let mut map = ArgumentMap::new();
        while let Some((key, value)) = access.next_entry::<String, OptionValue>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for ArgumentMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ArgumentMapVisitor)
    }
}
