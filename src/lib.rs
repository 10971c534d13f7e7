//! RustTDE Library
//!
//! A Rust library for tape drive data encryption control, providing the SCSI
//! Security Protocol Out/In exchanges that install or clear a drive's data
//! encryption key.

pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod scsi;
pub mod utils;

#[cfg(test)]
mod tests;

// Re-export key types for easier use
pub use config::TdeConfig;
pub use error::{Result, RustTdeError};
pub use scsi::{
    build_clear_key_command, build_set_key_command, DeviceFd, DeviceLayer, EncryptionCommand,
    EncryptionStatus, ScsiInterface, SdeSettings, SenseData, SgDevice,
};

/// Install `key` on the tape drive at `device_path`.
///
/// Returns `true` only when the device accepted the exchange with an OK status.
pub fn set_key(device_path: &str, key: &str) -> bool {
    ScsiInterface::new().set_key(device_path, key)
}

/// Disable encryption on the tape drive at `device_path` and clear its key.
///
/// Returns `true` only when the device accepted the exchange with an OK status.
pub fn clear_key(device_path: &str) -> bool {
    ScsiInterface::new().clear_key(device_path)
}
