// SCSI constant definitions (SPC-4 / SSC-4 security protocol pages)

/// Size of the sense buffer handed to the driver and the REQUEST SENSE ioctl
pub const SENSE_INFO_LEN: usize = 64;

/// Capacity of a generic security protocol page buffer
pub const SPP_PAGE_ALLOCATION: usize = 8192;

/// Key length carried in the Set Data Encryption page (256-bit AES)
pub const SPP_KEY_LENGTH: usize = 0x20;

// SCSI operation code constants
pub mod scsi_commands {
    pub const SECURITY_PROTOCOL_IN: u8 = 0xA2;
    pub const SECURITY_PROTOCOL_OUT: u8 = 0xB5;
}

// Security protocol numbers
pub const SPP_SP_PROTOCOL_TDE: u8 = 0x20;

// Tape Data Encryption page codes
pub mod page_codes {
    /// SPIN Data Encryption Status page
    pub const DATA_ENCRYPTION_STATUS: u16 = 0x0020;
    /// SPOUT Set Data Encryption page
    pub const SET_DATA_ENCRYPTION: u16 = 0x0010;
}

// Set Data Encryption page field values
pub const SPP_ALGORITHM_INDEX_DEFAULT: u8 = 0x01;
pub const SPP_KEY_FORMAT_PLAIN: u8 = 0x00;
pub const SPP_KAD_KEY_FORMAT_NORMAL: u8 = 0x00;

// Linux SCSI generic (sg) interface, from <scsi/sg.h>
pub mod sg {
    pub const SG_INTERFACE_ID_ORIG: i32 = b'S' as i32;
    pub const SG_IO: u32 = 0x2285;

    pub const SG_DXFER_TO_DEV: i32 = -2;
    pub const SG_DXFER_FROM_DEV: i32 = -3;

    pub const SG_INFO_OK_MASK: u32 = 0x1;
    pub const SG_INFO_OK: u32 = 0x0;
}

/// Linux `_IOR(type, nr, size)` request encoding
const fn ior(ty: u8, nr: u8, size: usize) -> u32 {
    const IOC_READ: u32 = 2;
    (IOC_READ << 30) | (((size as u32) & 0x3fff) << 16) | ((ty as u32) << 8) | nr as u32
}

/// Direct REQUEST SENSE ioctl: `_IOR('C', 0x02, <sense record>)`
pub const SIOC_REQSENSE: u32 = ior(b'C', 0x02, SENSE_INFO_LEN);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reqsense_request_encoding() {
        assert_eq!(SIOC_REQSENSE, 0x8040_4302);
    }
}
