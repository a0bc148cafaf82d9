// Command-line definitions parsed by `clap`.
pub mod cmd_enums;
