use serde::{Deserialize, Serialize};

use super::constants::*;
use crate::utils::{field_mut, store_be16, store_be32};

/// Transfer direction of a SCSI generic exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataDirection {
    /// Security Protocol Out: the page travels host -> device
    ToDevice,
    /// Security Protocol In: the page travels device -> host
    FromDevice,
}

impl DataDirection {
    pub fn sg_dxfer(self) -> i32 {
        match self {
            DataDirection::ToDevice => sg::SG_DXFER_TO_DEV,
            DataDirection::FromDevice => sg::SG_DXFER_FROM_DEV,
        }
    }
}

/// I_T nexus scope of the data encryption parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NexusScope {
    Public,
    /// Parameters apply to the issuing I_T nexus only (Oracle drives)
    #[default]
    Local,
    /// Parameters apply to every I_T nexus (IBM drives)
    AllITNexus,
}

impl NexusScope {
    pub fn code(self) -> u8 {
        match self {
            NexusScope::Public => 0x00,
            NexusScope::Local => 0x01,
            NexusScope::AllITNexus => 0x02,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(NexusScope::Public),
            0x01 => Some(NexusScope::Local),
            0x02 => Some(NexusScope::AllITNexus),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncryptionMode {
    Disabled,
    External,
    Encrypt,
    Unknown(u8),
}

impl EncryptionMode {
    pub fn code(self) -> u8 {
        match self {
            EncryptionMode::Disabled => 0x00,
            EncryptionMode::External => 0x01,
            EncryptionMode::Encrypt => 0x02,
            EncryptionMode::Unknown(code) => code,
        }
    }

    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => EncryptionMode::Disabled,
            0x01 => EncryptionMode::External,
            0x02 => EncryptionMode::Encrypt,
            other => EncryptionMode::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecryptionMode {
    Disabled,
    Raw,
    Decrypt,
    /// Decrypt encrypted blocks, pass plain blocks through
    Mixed,
    Unknown(u8),
}

impl DecryptionMode {
    pub fn code(self) -> u8 {
        match self {
            DecryptionMode::Disabled => 0x00,
            DecryptionMode::Raw => 0x01,
            DecryptionMode::Decrypt => 0x02,
            DecryptionMode::Mixed => 0x03,
            DecryptionMode::Unknown(code) => code,
        }
    }

    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => DecryptionMode::Disabled,
            0x01 => DecryptionMode::Raw,
            0x02 => DecryptionMode::Decrypt,
            0x03 => DecryptionMode::Mixed,
            other => DecryptionMode::Unknown(other),
        }
    }
}

/// SECURITY PROTOCOL IN/OUT command descriptor block (12 bytes)
///
/// ```text
/// 0      opcode (0xA2 / 0xB5)
/// 1      security protocol
/// 2..4   security protocol specific (page code)
/// 4..6   reserved
/// 6..10  allocation / transfer length
/// 10     reserved
/// 11     control
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityProtocolCdb {
    pub opcode: u8,
    pub security_protocol: u8,
    pub protocol_specific: u16,
    pub allocation_length: u32,
    pub control: u8,
}

impl SecurityProtocolCdb {
    pub const LEN: usize = 12;

    /// SPOUT CDB carrying `length` bytes of a Tape Data Encryption page
    pub fn security_protocol_out(page_code: u16, length: usize) -> Self {
        Self {
            opcode: scsi_commands::SECURITY_PROTOCOL_OUT,
            security_protocol: SPP_SP_PROTOCOL_TDE,
            protocol_specific: page_code,
            allocation_length: length as u32,
            control: 0,
        }
    }

    /// SPIN CDB requesting up to `length` bytes of a Tape Data Encryption page
    pub fn security_protocol_in(page_code: u16, length: usize) -> Self {
        Self {
            opcode: scsi_commands::SECURITY_PROTOCOL_IN,
            ..Self::security_protocol_out(page_code, length)
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut cdb = [0u8; Self::LEN];
        cdb[0] = self.opcode;
        cdb[1] = self.security_protocol;
        store_be16(field_mut(&mut cdb, 2), self.protocol_specific as u32);
        store_be32(field_mut(&mut cdb, 6), self.allocation_length as u64);
        cdb[11] = self.control;
        cdb
    }
}

/// Set Data Encryption page (SSC-4 8.5.4.3)
///
/// ```text
/// 0..2    page code (0x0010)
/// 2..4    page length
/// 4       scope (bits 7..5) / lock
/// 5       CEEM / RDMC / SDK / CKOD / CKORP / CKORL
/// 6       encryption mode
/// 7       decryption mode
/// 8       algorithm index
/// 9       key format
/// 10      KAD format
/// 11..18  reserved
/// 18..20  key length
/// 20..52  key
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdePage {
    pub nexus_scope: NexusScope,
    pub encryption_mode: EncryptionMode,
    pub decryption_mode: DecryptionMode,
    pub algorithm_index: u8,
    pub key_format: u8,
    pub kad_format: u8,
    pub key_data: [u8; SPP_KEY_LENGTH],
}

impl SdePage {
    pub const LEN: usize = 20 + SPP_KEY_LENGTH;

    /// Value the page writes into its own length field.
    ///
    /// The page accounts for itself as `size - 3`; the enclosing page buffer
    /// later stamps `size - 4` over the same two bytes.
    pub const DECLARED_LENGTH: u16 = (Self::LEN - 3) as u16;

    /// Page with both modes disabled and an all-zero key
    pub fn cleared(nexus_scope: NexusScope, algorithm_index: u8) -> Self {
        Self {
            nexus_scope,
            encryption_mode: EncryptionMode::Disabled,
            decryption_mode: DecryptionMode::Disabled,
            algorithm_index,
            key_format: SPP_KEY_FORMAT_PLAIN,
            kad_format: SPP_KAD_KEY_FORMAT_NORMAL,
            key_data: [0u8; SPP_KEY_LENGTH],
        }
    }

    pub fn key_length(&self) -> u16 {
        SPP_KEY_LENGTH as u16
    }

    /// Serialize the page as laid out on the wire, with its own length accounting
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut page = [0u8; Self::LEN];
        store_be16(field_mut(&mut page, 0), page_codes::SET_DATA_ENCRYPTION as u32);
        store_be16(field_mut(&mut page, 2), Self::DECLARED_LENGTH as u32);
        page[4] = self.nexus_scope.code() << 5;
        page[6] = self.encryption_mode.code();
        page[7] = self.decryption_mode.code();
        page[8] = self.algorithm_index;
        page[9] = self.key_format;
        page[10] = self.kad_format;
        store_be16(field_mut(&mut page, 18), self.key_length() as u32);
        page[20..].copy_from_slice(&self.key_data);
        page
    }
}

/// Page-specific content of a security protocol page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagePayload {
    SetDataEncryption(SdePage),
    /// Opaque page bytes following the 4-byte header
    Raw(Vec<u8>),
}

/// Generic security protocol page: page code, page length, payload.
///
/// The header fields are derived from the payload at serialization time so the
/// stored length always equals the used bytes minus the 4-byte header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityProtocolPage {
    page_code: u16,
    payload: PagePayload,
}

impl SecurityProtocolPage {
    pub const HEADER_LEN: usize = 4;

    pub fn set_data_encryption(page: SdePage) -> Self {
        Self {
            page_code: page_codes::SET_DATA_ENCRYPTION,
            payload: PagePayload::SetDataEncryption(page),
        }
    }

    pub fn raw(page_code: u16, body: Vec<u8>) -> crate::error::Result<Self> {
        if body.len() + Self::HEADER_LEN > SPP_PAGE_ALLOCATION {
            return Err(crate::error::RustTdeError::parameter_validation(format!(
                "page body of {} bytes exceeds the {} byte page buffer",
                body.len(),
                SPP_PAGE_ALLOCATION
            )));
        }
        Ok(Self {
            page_code,
            payload: PagePayload::Raw(body),
        })
    }

    pub fn page_code(&self) -> u16 {
        self.page_code
    }

    pub fn payload(&self) -> &PagePayload {
        &self.payload
    }

    /// The SDE page, if this buffer carries one
    pub fn sde(&self) -> Option<&SdePage> {
        match &self.payload {
            PagePayload::SetDataEncryption(page) => Some(page),
            PagePayload::Raw(_) => None,
        }
    }

    /// Number of buffer bytes in use, header included
    pub fn used_len(&self) -> usize {
        match &self.payload {
            PagePayload::SetDataEncryption(_) => SdePage::LEN,
            PagePayload::Raw(body) => Self::HEADER_LEN + body.len(),
        }
    }

    /// Page length field: used bytes excluding page code and page length
    pub fn length(&self) -> u16 {
        (self.used_len() - Self::HEADER_LEN) as u16
    }

    /// Zeroed buffer the size of this page, for the device to fill in
    pub fn receive_buffer(&self) -> Vec<u8> {
        vec![0u8; self.used_len()]
    }

    /// Serialize the used portion of the page buffer
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = match &self.payload {
            PagePayload::SetDataEncryption(page) => page.to_bytes().to_vec(),
            PagePayload::Raw(body) => {
                let mut buffer = vec![0u8; Self::HEADER_LEN];
                store_be16(field_mut(&mut buffer, 0), self.page_code as u32);
                buffer.extend_from_slice(body);
                buffer
            }
        };
        store_be16(field_mut(&mut buffer, 2), self.length() as u32);
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spout_cdb_layout() {
        let cdb = SecurityProtocolCdb::security_protocol_out(0x0010, 52).to_bytes();
        assert_eq!(
            cdb,
            [0xB5, 0x20, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x34, 0x00, 0x00]
        );
    }

    #[test]
    fn test_spin_cdb_layout() {
        let cdb = SecurityProtocolCdb::security_protocol_in(0x0020, 8192).to_bytes();
        assert_eq!(cdb[0], 0xA2);
        assert_eq!(cdb[1], 0x20);
        assert_eq!(&cdb[2..4], &[0x00, 0x20]);
        assert_eq!(&cdb[6..10], &[0x00, 0x00, 0x20, 0x00]);
    }

    #[test]
    fn test_sde_page_size() {
        assert_eq!(SdePage::LEN, 52);
        assert_eq!(SdePage::DECLARED_LENGTH, 49);
    }

    #[test]
    fn test_length_accounting_differs_between_sde_and_page_buffer() {
        let sde = SdePage::cleared(NexusScope::Local, 0x01);

        // The SDE page on its own declares sizeof(page) - 3
        let sde_bytes = sde.to_bytes();
        assert_eq!(&sde_bytes[2..4], &[0x00, 0x31]);

        // Wrapped in the page buffer the same field becomes used bytes - 4
        let page = SecurityProtocolPage::set_data_encryption(sde);
        assert_eq!(page.length(), 48);
        let wire = page.to_bytes();
        assert_eq!(wire.len(), 52);
        assert_eq!(&wire[2..4], &[0x00, 0x30]);
        assert_eq!(&wire[4..], &sde_bytes[4..]);
    }

    #[test]
    fn test_sde_field_offsets() {
        let mut sde = SdePage::cleared(NexusScope::AllITNexus, 0x01);
        sde.encryption_mode = EncryptionMode::Encrypt;
        sde.decryption_mode = DecryptionMode::Mixed;
        sde.key_data[0] = 0xAA;

        let bytes = sde.to_bytes();
        assert_eq!(&bytes[0..2], &[0x00, 0x10]);
        assert_eq!(bytes[4], 0x40);
        assert_eq!(bytes[6], 0x02);
        assert_eq!(bytes[7], 0x03);
        assert_eq!(bytes[8], 0x01);
        assert_eq!(bytes[10], SPP_KAD_KEY_FORMAT_NORMAL);
        assert_eq!(&bytes[18..20], &[0x00, 0x20]);
        assert_eq!(bytes[20], 0xAA);
    }

    #[test]
    fn test_raw_page_header() {
        let page = SecurityProtocolPage::raw(0x0020, vec![1, 2, 3]).unwrap();
        assert_eq!(page.to_bytes(), vec![0x00, 0x20, 0x00, 0x03, 1, 2, 3]);
        assert!(page.sde().is_none());
    }

    #[test]
    fn test_raw_page_receive_buffer_is_zeroed() {
        let page = SecurityProtocolPage::raw(0x0020, vec![0xFF; 12]).unwrap();
        assert_eq!(page.receive_buffer(), vec![0u8; 16]);
        assert_eq!(&page.to_bytes()[..4], &[0x00, 0x20, 0x00, 0x0C]);
    }

    #[test]
    fn test_raw_page_capacity() {
        assert!(SecurityProtocolPage::raw(0x0020, vec![0; SPP_PAGE_ALLOCATION]).is_err());
        assert!(SecurityProtocolPage::raw(0x0020, vec![0; SPP_PAGE_ALLOCATION - 4]).is_ok());
    }

    #[test]
    fn test_mode_codes() {
        assert_eq!(EncryptionMode::from_code(0x02), EncryptionMode::Encrypt);
        assert_eq!(DecryptionMode::from_code(0x03), DecryptionMode::Mixed);
        assert_eq!(DecryptionMode::from_code(0x09), DecryptionMode::Unknown(0x09));
        assert_eq!(NexusScope::from_code(0x07), None);
        assert_eq!(NexusScope::default(), NexusScope::Local);
    }
}
