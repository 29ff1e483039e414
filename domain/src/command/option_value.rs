//! Option values

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Value attached to a single command-line option.
///
/// | Variant | Meaning | Serialized as flag | Serialized as positional |
/// |---------|---------|--------------------|--------------------------|
/// | `Flag` | option with no value (`-q`) | `["-q"]` | invalid |
/// | `Value` | single value (`-p 8`) | `["-p", "8"]` | `["8"]` |
/// | `Values` | ordered sequence | `["--in", "a b"]` (joined) | `["a", "b"]` |
///
/// An empty string is never stored as a `Value`: constructing from `""`
/// yields `Flag`, matching how tools treat a flag given an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OptionValue {
    #[default]
    Flag,
    Value(String),
    Values(Vec<String>),
}

impl OptionValue {
    /// Build a single value, normalizing `""` to [`OptionValue::Flag`]
    pub fn value(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            OptionValue::Flag
        } else {
            OptionValue::Value(value)
        }
    }

    /// Build an ordered sequence of values
    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OptionValue::Values(values.into_iter().map(Into::into).collect())
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, OptionValue::Flag)
    }

    /// The single value, if this is a [`OptionValue::Value`]
    pub fn as_value(&self) -> Option<&str> {
        match self {
            OptionValue::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Token emitted after a whitelisted flag, if any.
    ///
    /// Sequences are joined with a single space into one token; they are
    /// never split into several tokens on this path. Empty entries are
    /// dropped, and a sequence with nothing left behaves like a bare flag.
    pub fn flag_token(&self) -> Option<String> {
        match self {
            OptionValue::Flag => None,
            OptionValue::Value(v) => Some(v.clone()),
            OptionValue::Values(vs) => {
                let joined = vs
                    .iter()
                    .filter(|v| !v.is_empty())
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(" ");
                (!joined.is_empty()).then_some(joined)
            }
        }
    }

    /// Tokens emitted when this value is used as positional arguments
    pub fn positional_tokens(&self) -> Vec<String> {
        match self {
            OptionValue::Flag => Vec::new(),
            OptionValue::Value(v) => vec![v.clone()],
            OptionValue::Values(vs) => vs.clone(),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Flag => Ok(()),
            OptionValue::Value(v) => write!(f, "{}", v),
            OptionValue::Values(vs) => write!(f, "({})", vs.join(", ")),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::value(value)
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::value(value)
    }
}

impl From<&String> for OptionValue {
    fn from(value: &String) -> Self {
        OptionValue::value(value.as_str())
    }
}

impl From<&std::path::Path> for OptionValue {
    fn from(value: &std::path::Path) -> Self {
        OptionValue::value(value.to_string_lossy().into_owned())
    }
}

impl From<&std::path::PathBuf> for OptionValue {
    fn from(value: &std::path::PathBuf) -> Self {
        OptionValue::from(value.as_path())
    }
}

impl From<std::path::PathBuf> for OptionValue {
    fn from(value: std::path::PathBuf) -> Self {
        OptionValue::from(value.as_path())
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        OptionValue::Value(value.to_string())
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(values: Vec<String>) -> Self {
        OptionValue::Values(values)
    }
}

impl From<&[&str]> for OptionValue {
    fn from(values: &[&str]) -> Self {
        OptionValue::values(values.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for OptionValue {
    fn from(values: [&str; N]) -> Self {
        OptionValue::values(values)
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionValue::Flag => serializer.serialize_str(""),
            OptionValue::Value(v) => serializer.serialize_str(v),
            OptionValue::Values(vs) => vs.serialize(serializer),
        }
    }
}

struct OptionValueVisitor;

impl<'de> Visitor<'de> for OptionValueVisitor {
    type Value = OptionValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean, or a list of them")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<OptionValue, E> {
        Ok(OptionValue::value(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<OptionValue, E> {
        Ok(OptionValue::value(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<OptionValue, E> {
        Ok(OptionValue::Value(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<OptionValue, E> {
        Ok(OptionValue::Value(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<OptionValue, E> {
        Ok(OptionValue::Value(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<OptionValue, E> {
        Ok(OptionValue::Value(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<OptionValue, E> {
        Ok(OptionValue::Flag)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<OptionValue, A::Error> {
        let mut values = Vec::new();
        while let Some(item) = seq.next_element::<OptionValue>()? {
            match item {
                OptionValue::Flag => values.push(String::new()),
                OptionValue::Value(v) => values.push(v),
                OptionValue::Values(_) => {
                    return Err(de::Error::custom("nested lists are not valid option values"));
                }
            }
        }
        Ok(OptionValue::Values(values))
    }
}

impl<'de> Deserialize<'de> for OptionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OptionValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_is_flag() {
        assert_eq!(OptionValue::from(""), OptionValue::Flag);
        assert!(OptionValue::value(String::new()).is_flag());
    }

    #[test]
    fn test_flag_token() {
        assert_eq!(OptionValue::Flag.flag_token(), None);
        assert_eq!(OptionValue::from("8").flag_token(), Some("8".to_string()));
        assert_eq!(
            OptionValue::from(["a.fa", "b.fa"]).flag_token(),
            Some("a.fa b.fa".to_string())
        );
    }

    #[test]
    fn test_empty_sequence_flag_token() {
        assert_eq!(OptionValue::Values(Vec::new()).flag_token(), None);
        assert_eq!(OptionValue::from(["", ""]).flag_token(), None);
        assert_eq!(
            OptionValue::from(["", "a.fa"]).flag_token(),
            Some("a.fa".to_string())
        );
    }

    #[test]
    fn test_multi_word_value_is_not_split() {
        let value = OptionValue::from("--very-sensitive --no-unal");
        assert_eq!(value.positional_tokens().len(), 1);
    }

    #[test]
    fn test_positional_tokens() {
        let value = OptionValue::from(["a.bam", "b.bam"]);
        assert_eq!(value.positional_tokens(), vec!["a.bam", "b.bam"]);
        assert!(OptionValue::Flag.positional_tokens().is_empty());
    }

    #[test]
    fn test_deserialize_variants() {
        #[derive(Deserialize)]
        struct Holder {
            flag: OptionValue,
            text: OptionValue,
            number: OptionValue,
            list: OptionValue,
        }

        let holder: Holder = toml::from_str(
            r#"
flag = ""
text = "out.sam"
number = 8
list = ["a.gtf", "b.gtf"]
"#,
        )
        .unwrap();

        assert!(holder.flag.is_flag());
        assert_eq!(holder.text, OptionValue::Value("out.sam".to_string()));
        assert_eq!(holder.number, OptionValue::Value("8".to_string()));
        assert_eq!(holder.list, OptionValue::from(["a.gtf", "b.gtf"]));
    }

    #[test]
    fn test_deserialize_rejects_nested_lists() {
        let result: Result<OptionValue, _> = serde_json::from_str(r#"[["a"]]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_flag_as_empty_string() {
        let json = serde_json::to_string(&OptionValue::Flag).unwrap();
        assert_eq!(json, "\"\"");
    }
}
