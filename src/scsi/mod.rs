//! SCSI Security Protocol Interface Module
//!
//! Low-level SCSI Security Protocol In/Out exchanges with a tape drive over
//! the Linux SCSI generic interface.

pub mod commands;
pub mod constants;
pub mod core;
pub mod device;
pub mod ffi;
pub mod sense;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use self::core::ScsiInterface;
pub use commands::encryption::{
    build_clear_key_command, build_sde_command, build_set_key_command, EncryptionCommand,
    EncryptionStatus, SdeSettings,
};
pub use device::{DeviceFd, DeviceHandle, DeviceLayer, SgDevice, SgRequest, SgStatus};
pub use sense::SenseData;
pub use types::{
    DataDirection, DecryptionMode, EncryptionMode, NexusScope, PagePayload, SdePage,
    SecurityProtocolCdb, SecurityProtocolPage,
};
