//! Command construction
//!
//! Turns layered option maps into a command line for an external tool.
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌────────────────────┐   ┌─────────────┐
//! │ defaults     │──▶│ merged_with  │──▶│ serialize          │──▶│ CommandLine │
//! │ ArgumentMap  │   │ (override    │   │ (Whitelist filter, │   │ program sub │
//! └──────────────┘   │  wins)       │   │  "--" positional)  │   │ tokens...   │
//! ┌──────────────┐   │              │   └─────────┬──────────┘   └─────────────┘
//! │ overrides    │──▶│              │             └─▶ IgnoredOption diagnostics
//! └──────────────┘   └──────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`OptionValue`]: flag, single value, or ordered values
//! - [`ArgumentMap`]: one configuration layer, insertion-ordered
//! - [`Whitelist`]: option names a tool recognizes
//! - [`SerializedArguments`]: emitted tokens plus dropped options
//! - [`CommandLine`]: program, optional subcommand, arguments

pub mod argument_map;
pub mod command_line;
pub mod option_value;
pub mod serializer;
pub mod whitelist;

pub use argument_map::{ArgumentMap, POSITIONAL_KEY};
pub use command_line::CommandLine;
pub use option_value::OptionValue;
pub use serializer::{IgnoredOption, SerializedArguments, merge_and_serialize, serialize};
pub use whitelist::Whitelist;
