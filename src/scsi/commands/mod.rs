//! SCSI Commands Module
//!
//! This module contains implementations of the security protocol commands.

pub mod encryption;
