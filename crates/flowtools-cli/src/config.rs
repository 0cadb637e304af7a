//! Settings of a run, merged from command line flags, `--set` overrides, an
//! optional TOML file and compiled-in defaults, in that order of precedence.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;
