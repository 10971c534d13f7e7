//! SCSI Tape Data Encryption Commands
//!
//! Builds SECURITY PROTOCOL OUT Set Data Encryption pages to install or clear
//! a drive's data encryption key, and reads back the Data Encryption Status
//! page with SECURITY PROTOCOL IN.

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{Result, RustTdeError};
use crate::utils::{hex_dump, load_be16, load_be32};

use super::super::constants::*;
use super::super::device::{DeviceFd, DeviceLayer};
use super::super::types::{
    DecryptionMode, EncryptionMode, NexusScope, SdePage, SecurityProtocolCdb,
    SecurityProtocolPage,
};
use super::super::ScsiInterface;

/// Drive-side parameters of a Set Data Encryption page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdeSettings {
    pub nexus_scope: NexusScope,
    pub algorithm_index: u8,
}

impl Default for SdeSettings {
    fn default() -> Self {
        Self {
            nexus_scope: NexusScope::Local,
            algorithm_index: SPP_ALGORITHM_INDEX_DEFAULT,
        }
    }
}

/// A CDB together with the page it announces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionCommand {
    pub cdb: SecurityProtocolCdb,
    pub page: SecurityProtocolPage,
}

impl EncryptionCommand {
    pub fn sde(&self) -> Option<&SdePage> {
        self.page.sde()
    }
}

/// Copy at most `SPP_KEY_LENGTH` raw key bytes into a freshly zeroed field.
///
/// Copying stops at the first NUL byte of `key`. Shorter keys leave the tail
/// zero; longer keys are truncated. No terminator is written.
fn fill_key_field(field: &mut [u8; SPP_KEY_LENGTH], key: &[u8]) {
    field.fill(0);
    let end = key.iter().position(|&b| b == 0).unwrap_or(key.len());
    let len = end.min(SPP_KEY_LENGTH);
    field[..len].copy_from_slice(&key[..len]);
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(RustTdeError::parameter_validation(
            "encryption key must not be empty",
        ));
    }
    Ok(())
}

/// Build a SPOUT Set Data Encryption command.
///
/// With a key the page enables encryption and mixed-mode decryption; without
/// one both modes are disabled and the key field stays zero.
pub fn build_sde_command(settings: &SdeSettings, key: Option<&[u8]>) -> EncryptionCommand {
    let mut sde = SdePage::cleared(settings.nexus_scope, settings.algorithm_index);

    if let Some(key) = key {
        sde.encryption_mode = EncryptionMode::Encrypt;
        sde.decryption_mode = DecryptionMode::Mixed;
        fill_key_field(&mut sde.key_data, key);
    }

    info!("SPS: {}", hex_dump(&sde.to_bytes()));

    let page = SecurityProtocolPage::set_data_encryption(sde);
    let cdb = SecurityProtocolCdb::security_protocol_out(page.page_code(), page.used_len());

    info!("CDB: {}", hex_dump(&cdb.to_bytes()));

    EncryptionCommand { cdb, page }
}

/// Build the command that disables encryption and clears the key
pub fn build_clear_key_command() -> EncryptionCommand {
    build_sde_command(&SdeSettings::default(), None)
}

/// Build the command that installs `key` and enables encryption
pub fn build_set_key_command(key: &str) -> Result<EncryptionCommand> {
    validate_key(key)?;
    Ok(build_sde_command(&SdeSettings::default(), Some(key.as_bytes())))
}

/// Parsed Data Encryption Status page (SPIN page 0x0020)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptionStatus {
    pub page_code: u16,
    pub page_length: u16,
    pub nexus_scope: Option<NexusScope>,
    pub key_scope: u8,
    pub encryption_mode: EncryptionMode,
    pub decryption_mode: DecryptionMode,
    pub algorithm_index: u8,
    pub key_instance_counter: u32,
}

impl EncryptionStatus {
    /// Minimum bytes needed to decode the fixed fields
    pub const MIN_LEN: usize = 12;

    pub fn parse(page: &[u8]) -> Result<Self> {
        if page.len() < Self::MIN_LEN {
            return Err(RustTdeError::parse(format!(
                "data encryption status page too short: {} < {}",
                page.len(),
                Self::MIN_LEN
            )));
        }

        let page_code = load_be16(&[page[0], page[1]]);
        if page_code != page_codes::DATA_ENCRYPTION_STATUS {
            return Err(RustTdeError::parse(format!(
                "unexpected page code 0x{:04X}, expected 0x{:04X}",
                page_code,
                page_codes::DATA_ENCRYPTION_STATUS
            )));
        }

        Ok(Self {
            page_code,
            page_length: load_be16(&[page[2], page[3]]),
            nexus_scope: NexusScope::from_code(page[4] >> 5),
            key_scope: page[4] & 0x07,
            encryption_mode: EncryptionMode::from_code(page[5]),
            decryption_mode: DecryptionMode::from_code(page[6]),
            algorithm_index: page[7],
            key_instance_counter: load_be32(&[page[8], page[9], page[10], page[11]]),
        })
    }

    pub fn is_encrypting(&self) -> bool {
        self.encryption_mode == EncryptionMode::Encrypt
    }
}

impl<D: DeviceLayer> ScsiInterface<D> {
    fn send_encryption_command(
        &self,
        fd: Option<DeviceFd>,
        device_path: &str,
        command: &EncryptionCommand,
    ) -> Result<()> {
        let mut page = command.page.to_bytes();
        self.send_page_to_device(fd, device_path, &command.cdb, &mut page)
    }

    /// Install `key` on the drive with the given page settings
    pub fn set_encryption_key(
        &self,
        fd: Option<DeviceFd>,
        device_path: &str,
        key: &str,
        settings: &SdeSettings,
    ) -> Result<()> {
        validate_key(key)?;
        debug!("Setting encryption key on {}", device_path);
        let command = build_sde_command(settings, Some(key.as_bytes()));
        self.send_encryption_command(fd, device_path, &command)
    }

    /// Install `key`, clearing the drive's key if the install fails.
    ///
    /// The install error is returned even when the clear succeeds, so the drive
    /// is never left in whatever state a failed install produced.
    pub fn enable_encryption(
        &self,
        fd: Option<DeviceFd>,
        device_path: &str,
        key: &str,
        settings: &SdeSettings,
    ) -> Result<()> {
        validate_key(key)?;

        let set_error = match self.set_encryption_key(fd, device_path, key, settings) {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        warn!(
            "Setting encryption key on {} failed, reverting to cleared key: {}",
            device_path, set_error
        );
        if let Err(e) = self.clear_encryption_key(fd, device_path, settings) {
            error!("Clearing encryption key on {} failed: {}", device_path, e);
        }
        Err(set_error)
    }

    /// Disable encryption on the drive and clear its key
    pub fn clear_encryption_key(
        &self,
        fd: Option<DeviceFd>,
        device_path: &str,
        settings: &SdeSettings,
    ) -> Result<()> {
        debug!("Clearing encryption key on {}", device_path);
        let command = build_sde_command(settings, None);
        self.send_encryption_command(fd, device_path, &command)
    }

    /// Read the drive's Data Encryption Status page
    pub fn read_encryption_status(
        &self,
        fd: Option<DeviceFd>,
        device_path: &str,
    ) -> Result<EncryptionStatus> {
        let request = SecurityProtocolPage::raw(
            page_codes::DATA_ENCRYPTION_STATUS,
            vec![0u8; SPP_PAGE_ALLOCATION - SecurityProtocolPage::HEADER_LEN],
        )?;
        let cdb = SecurityProtocolCdb::security_protocol_in(request.page_code(), request.used_len());
        debug!("CDB: {}", hex_dump(&cdb.to_bytes()));

        let mut page = request.receive_buffer();
        self.receive_page_from_device(fd, device_path, &cdb, &mut page)?;

        let status = EncryptionStatus::parse(&page)?;
        debug!("Data encryption status: {:?}", status);
        Ok(status)
    }

    /// Install a key; `true` on a fully successful exchange
    pub fn set_key(&self, device_path: &str, key: &str) -> bool {
        match self.set_encryption_key(None, device_path, key, &SdeSettings::default()) {
            Ok(()) => true,
            Err(e) => {
                error!("Setting encryption key on {} failed: {}", device_path, e);
                false
            }
        }
    }

    /// Clear the key; `true` on a fully successful exchange
    pub fn clear_key(&self, device_path: &str) -> bool {
        match self.clear_encryption_key(None, device_path, &SdeSettings::default()) {
            Ok(()) => true,
            Err(e) => {
                error!("Clearing encryption key on {} failed: {}", device_path, e);
                false
            }
        }
    }
}
