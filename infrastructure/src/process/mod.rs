//! Process execution adapters

mod system_runner;

pub use system_runner::SystemProcessRunner;
