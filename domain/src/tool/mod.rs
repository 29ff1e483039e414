//! Tool domain module
//!
//! Pure vocabulary shared by every tool facade: what a tool is for
//! ([`ToolCategory`]), what it consumes ([`ReadSet`]), how its outputs are
//! named ([`naming`]), and how a single operation fails ([`StepFailure`]).
//!
//! # Operation lifecycle
//!
//! ```text
//! not started ──invoke──▶ succeeded (output verified on disk)
//!                    └──▶ failed    (StepFailure: exit code, launch, missing output)
//! ```
//!
//! A failed operation is terminal for that call; callers may invoke again.

pub mod category;
pub mod failure;
pub mod naming;
pub mod reads;

pub use category::ToolCategory;
pub use failure::{StepFailure, StepResult};
pub use reads::{ReadLayout, ReadSet};
