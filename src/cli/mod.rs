//! CLI command handlers

pub mod commands;

pub use commands::{
    break_even, calculate, decode_report, encode_report, investor, share, validate, OutputFormat,
    ShareShape, StakeholderArg,
};
