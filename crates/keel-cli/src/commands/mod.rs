//! Command handlers. Each translates parsed arguments into core calls and
//! renders the result; none of them contain composition logic.

pub mod archetypes;
pub mod completions;
pub mod config;
pub mod init;
pub mod synth;
