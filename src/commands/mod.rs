//! Command Handlers Module
//!
//! This module contains handlers for all CLI subcommands.

pub mod check_eod;
pub mod clear_key;
pub mod set_key;
pub mod status;
