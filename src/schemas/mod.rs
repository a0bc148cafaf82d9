// Data structures shared across the crate.

// Remote index entries.
pub mod catalog;
// Runtime configuration and the config.toml schema.
pub mod config;
// Normalized version identifiers.
pub mod version;
