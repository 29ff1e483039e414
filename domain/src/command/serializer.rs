//! Argument merging, whitelist validation and token serialization
//!
//! ```text
//! base ──┐
//!        ├─ merged_with ─▶ effective ─▶ serialize(whitelist) ─▶ tokens + ignored
//! overrides
//! ```

use super::argument_map::{ArgumentMap, POSITIONAL_KEY};
use super::option_value::OptionValue;
use super::whitelist::Whitelist;
use crate::core::error::DomainError;
use std::fmt;

/// An option dropped because its name is not in the tool's whitelist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredOption {
    pub key: String,
    pub value: OptionValue,
}

impl fmt::Display for IgnoredOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown argument {} = {}. ignoring...", self.key, self.value)
    }
}

/// Output of [`serialize`]: tokens ready to follow the program name, plus
/// every option that was dropped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializedArguments {
    pub tokens: Vec<String>,
    pub ignored: Vec<IgnoredOption>,
}

impl SerializedArguments {
    pub fn has_ignored(&self) -> bool {
        !self.ignored.is_empty()
    }
}

/// Serialize one argument map against a whitelist.
///
/// Whitelisted options are emitted in map order: the name, followed by the
/// value token unless the value is a flag. Positional arguments are appended
/// last, one token per value. Unknown option names are skipped and collected
/// in [`SerializedArguments::ignored`].
pub fn serialize(
    whitelist: &Whitelist,
    arguments: &ArgumentMap,
) -> Result<SerializedArguments, DomainError> {
    arguments.validate()?;

    let mut out = SerializedArguments::default();
    let mut positional = Vec::new();

    for (key, value) in arguments.iter() {
        if key == POSITIONAL_KEY {
            positional = value.positional_tokens();
            continue;
        }

        if !whitelist.contains(key) {
            out.ignored.push(IgnoredOption {
                key: key.to_string(),
                value: value.clone(),
            });
            continue;
        }

        out.tokens.push(key.to_string());
        if let Some(token) = value.flag_token() {
            out.tokens.push(token);
        }
    }

    out.tokens.extend(positional);
    Ok(out)
}

/// Merge `overrides` over `base` and serialize the result.
pub fn merge_and_serialize(
    whitelist: &Whitelist,
    base: &ArgumentMap,
    overrides: &ArgumentMap,
) -> Result<SerializedArguments, DomainError> {
    serialize(whitelist, &base.merged_with(overrides))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_base_and_override() {
        let whitelist = Whitelist::new(["-x", "-S"]);
        let base = ArgumentMap::new().with("-x", "idx");
        let overrides = ArgumentMap::new().with("-S", "out.sam");

        let out = merge_and_serialize(&whitelist, &base, &overrides).unwrap();

        assert_eq!(out.tokens, vec!["-x", "idx", "-S", "out.sam"]);
        assert!(!out.has_ignored());
    }

    #[test]
    fn test_scenario_unknown_key_dropped() {
        let whitelist = Whitelist::new(["-q"]);
        let overrides = ArgumentMap::new().with("-q", "").with("unknown", "v");

        let out = merge_and_serialize(&whitelist, &ArgumentMap::new(), &overrides).unwrap();

        assert_eq!(out.tokens, vec!["-q"]);
        assert_eq!(out.ignored.len(), 1);
        assert_eq!(out.ignored[0].key, "unknown");
        assert_eq!(
            out.ignored[0].to_string(),
            "Unknown argument unknown = v. ignoring..."
        );
    }

    #[test]
    fn test_scenario_positional_only() {
        let overrides = ArgumentMap::new().with_positional(["a.bam", "b.bam"]);

        let out =
            merge_and_serialize(&Whitelist::empty(), &ArgumentMap::new(), &overrides).unwrap();

        assert_eq!(out.tokens, vec!["a.bam", "b.bam"]);
    }

    #[test]
    fn test_positional_trails_flags_regardless_of_insert_order() {
        let whitelist = Whitelist::new(["-o", "-b"]);
        let args = ArgumentMap::new()
            .with_positional(["in.sam"])
            .with("-o", "out.bam")
            .with_flag("-b");

        let out = serialize(&whitelist, &args).unwrap();

        assert_eq!(out.tokens, vec!["-o", "out.bam", "-b", "in.sam"]);
    }

    #[test]
    fn test_override_wins_on_shared_key() {
        let whitelist = Whitelist::new(["-p"]);
        let base = ArgumentMap::new().with("-p", "4");
        let overrides = ArgumentMap::new().with("-p", "32");

        let out = merge_and_serialize(&whitelist, &base, &overrides).unwrap();
        assert_eq!(out.tokens, vec!["-p", "32"]);
    }

    #[test]
    fn test_sequence_under_flag_is_one_token() {
        let whitelist = Whitelist::new(["--genomeFastaFiles"]);
        let args = ArgumentMap::new().with("--genomeFastaFiles", ["chr1.fa", "chr2.fa"]);

        let out = serialize(&whitelist, &args).unwrap();
        assert_eq!(out.tokens, vec!["--genomeFastaFiles", "chr1.fa chr2.fa"]);
    }

    #[test]
    fn test_positional_key_is_never_whitelisted() {
        let whitelist = Whitelist::new(["--"]);
        let args = ArgumentMap::new().with_positional(["x"]);

        let out = serialize(&whitelist, &args).unwrap();
        assert_eq!(out.tokens, vec!["x"]);
    }

    #[test]
    fn test_every_flag_token_is_whitelisted() {
        let whitelist = Whitelist::new(["-a", "-c"]);
        let args = ArgumentMap::new()
            .with("-a", "1")
            .with("-b", "2")
            .with_flag("-c")
            .with("-d", "");

        let out = serialize(&whitelist, &args).unwrap();

        let flags: Vec<&String> = out.tokens.iter().filter(|t| t.starts_with('-')).collect();
        assert!(flags.iter().all(|t| whitelist.contains(t)));
        assert_eq!(out.ignored.len(), 2);
    }

    #[test]
    fn test_empty_sequences_serialize_as_bare_flags() {
        let whitelist = Whitelist::new(["-p", "--dta"]);
        let args = ArgumentMap::new()
            .with("-p", OptionValue::Values(Vec::new()))
            .with("--dta", ["", ""]);

        let out = serialize(&whitelist, &args).unwrap();
        assert_eq!(out.tokens, vec!["-p", "--dta"]);
    }

    #[test]
    fn test_structurally_invalid_arguments_fail() {
        let whitelist = Whitelist::new(["-o"]);
        let args = ArgumentMap::new().with("bad key", "x");

        assert_eq!(
            serialize(&whitelist, &args),
            Err(DomainError::InvalidOptionName("bad key".to_string()))
        );
    }
}
