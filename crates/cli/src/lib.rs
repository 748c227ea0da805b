//! s3-sync CLI library
//!
//! Exports the CLI components for use in integration tests.

pub mod commands;
pub mod exit_code;
pub mod output;
