//! SCSI Sense Data Parsing
//!
//! Decodes fixed-format sense data and renders sense key / ASC / ASCQ values
//! through static lookup tables.

use std::fmt;

use super::constants::SENSE_INFO_LEN;

pub const SENSE_KEY_NO_SENSE: u8 = 0x00;
pub const SENSE_KEY_RECOVERED_ERROR: u8 = 0x01;
pub const SENSE_KEY_NOT_READY: u8 = 0x02;
pub const SENSE_KEY_MEDIUM_ERROR: u8 = 0x03;
pub const SENSE_KEY_HARDWARE_ERROR: u8 = 0x04;
pub const SENSE_KEY_ILLEGAL_REQUEST: u8 = 0x05;
pub const SENSE_KEY_UNIT_ATTENTION: u8 = 0x06;
pub const SENSE_KEY_DATA_PROTECT: u8 = 0x07;
pub const SENSE_KEY_BLANK_CHECK: u8 = 0x08;

/// ASC/ASCQ "end-of-data detected"
pub const ASC_END_OF_DATA: u8 = 0x00;
pub const ASCQ_END_OF_DATA: u8 = 0x05;

const UNKNOWN_SENSE_TEXT: &str = "Unknown";

/// Sense key descriptions, indexed by sense key 0x00..=0x0F
pub const SENSE_KEY_DESCRIPTIONS: [&str; 16] = [
    "No Sense",
    "Recovered Error",
    "Not Ready",
    "Medium Error",
    "Hardware Error",
    "Illegal Request",
    "Unit Attention",
    "Data Protect",
    "Blank Check",
    "Vendor specific",
    "Copy Aborted",
    "Aborted Command",
    "Equal",
    "Volume Overflow",
    "Miscompare",
    "Completed",
];

/// Additional sense code descriptions keyed by `(asc << 8) | ascq`, sorted by key
pub static ADDITIONAL_SENSE_CODES: &[(u16, &str)] = &[
    (0x0000, "No additional sense information"),
    (0x0001, "Filemark detected"),
    (0x0002, "End-of-partition/medium detected"),
    (0x0003, "Setmark detected"),
    (0x0004, "Beginning-of-partition/medium detected"),
    (0x0005, "End-of-data detected"),
    (0x0016, "Operation in progress"),
    (0x0017, "Cleaning requested"),
    (0x0018, "Erase operation in progress"),
    (0x0019, "Locate operation in progress"),
    (0x001A, "Rewind operation in progress"),
    (0x0400, "Logical unit not ready, cause not reportable"),
    (0x0401, "Logical unit is in process of becoming ready"),
    (0x0402, "Logical unit not ready, initializing command required"),
    (0x0403, "Logical unit not ready, manual intervention required"),
    (0x0404, "Logical unit not ready, format in progress"),
    (0x0407, "Logical unit not ready, operation in progress"),
    (0x0412, "Logical unit not ready, offline"),
    (0x0800, "Logical unit communication failure"),
    (0x0801, "Logical unit communication time-out"),
    (0x0C00, "Write error"),
    (0x1100, "Unrecovered read error"),
    (0x1400, "Recorded entity not found"),
    (0x1401, "Record not found"),
    (0x1403, "End-of-data not found"),
    (0x1A00, "Parameter list length error"),
    (0x2000, "Invalid command operation code"),
    (0x2400, "Invalid field in CDB"),
    (0x2500, "Logical unit not supported"),
    (0x2600, "Invalid field in parameter list"),
    (0x2601, "Parameter not supported"),
    (0x2602, "Parameter value invalid"),
    (0x2610, "Data decryption key fail limit reached"),
    (0x2611, "Incomplete key-associated data set"),
    (0x2612, "Vendor specific key reference not found"),
    (0x2700, "Write protected"),
    (0x2800, "Not ready to ready change, medium may have changed"),
    (0x2900, "Power on, reset, or bus device reset occurred"),
    (0x2A01, "Mode parameters changed"),
    (0x2A11, "Data encryption parameters changed by another I_T nexus"),
    (0x2A12, "Data encryption parameters changed by vendor specific event"),
    (0x2A13, "Data encryption key instance counter has changed"),
    (0x2C00, "Command sequence error"),
    (0x2C0B, "Not reserved"),
    (0x3000, "Incompatible medium installed"),
    (0x3003, "Cleaning cartridge installed"),
    (0x3A00, "Medium not present"),
    (0x3B00, "Sequential positioning error"),
    (0x3B0D, "Medium destination element full"),
    (0x3B0E, "Medium source element empty"),
    (0x3D00, "Invalid bits in identify message"),
    (0x4400, "Internal target failure"),
    (0x5000, "Write append error"),
    (0x5200, "Cartridge fault"),
    (0x5300, "Media load or eject failed"),
    (0x5302, "Medium removal prevented"),
    (0x5500, "System resource failure"),
    (0x7400, "Security error"),
    (0x7401, "Unable to decrypt data"),
    (0x7402, "Unencrypted data encountered while decrypting"),
    (0x7403, "Incorrect data encryption key"),
    (0x7404, "Cryptographic integrity validation failed"),
    (0x7405, "Error decrypting data"),
    (0x7406, "Unknown signature verification key"),
    (0x7407, "Encryption parameters not useable"),
    (0x7408, "Digital signature validation failure"),
    (0x7409, "Encryption mode mismatch on read"),
    (0x740A, "Encrypted block not raw read enabled"),
    (0x740B, "Incorrect encryption parameters"),
    (0x740C, "Unable to decrypt parameter list"),
    (0x740D, "Encryption algorithm disabled"),
    (0x7410, "SA creation parameter value invalid"),
    (0x7411, "SA creation parameter value rejected"),
    (0x7412, "Invalid SA usage"),
    (0x7421, "Data encryption configuration prevented"),
    (0x7430, "SA creation parameter not supported"),
    (0x7440, "Authentication failed"),
    (0x7461, "External data encryption key manager access error"),
    (0x7462, "External data encryption key manager error"),
    (0x7463, "External data encryption key not found"),
    (0x7464, "External data encryption request not authorized"),
    (0x746E, "External data encryption control timeout"),
    (0x746F, "External data encryption control error"),
    (0x7471, "Logical unit access not authorized"),
    (0x7479, "Security conflict in translated device"),
];

/// Describe a sense key, falling back to a placeholder outside 0x00..=0x0F
pub fn sense_key_to_str(sense_key: u8) -> &'static str {
    SENSE_KEY_DESCRIPTIONS
        .get(sense_key as usize)
        .copied()
        .unwrap_or(UNKNOWN_SENSE_TEXT)
}

/// Describe an ASC/ASCQ pair, falling back to a placeholder for unlisted codes
pub fn asc_ascq_to_str(asc: u8, ascq: u8) -> &'static str {
    let code = ((asc as u16) << 8) | ascq as u16;
    ADDITIONAL_SENSE_CODES
        .binary_search_by_key(&code, |&(key, _)| key)
        .map(|index| ADDITIONAL_SENSE_CODES[index].1)
        .unwrap_or(UNKNOWN_SENSE_TEXT)
}

/// Fixed-format sense data (SPC-4 4.5.3)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SenseData {
    pub valid: bool,
    pub response_code: u8,
    pub filemark: bool,
    pub eom: bool,
    pub ili: bool,
    pub sense_key: u8,
    pub information: u32,
    pub additional_len: u8,
    pub cmd_specific: u32,
    pub asc: u8,
    pub ascq: u8,
    pub fru_code: u8,
    pub sense_key_specific: [u8; 3],
}

impl SenseData {
    /// Decode a sense buffer as filled in by the driver.
    ///
    /// A zeroed buffer (nothing written back) decodes as "No Sense".
    pub fn parse(buf: &[u8; SENSE_INFO_LEN]) -> Self {
        Self {
            valid: buf[0] & 0x80 != 0,
            response_code: buf[0] & 0x7F,
            filemark: buf[2] & 0x80 != 0,
            eom: buf[2] & 0x40 != 0,
            ili: buf[2] & 0x20 != 0,
            sense_key: buf[2] & 0x0F,
            information: u32::from_be_bytes([buf[3], buf[4], buf[5], buf[6]]),
            additional_len: buf[7],
            cmd_specific: u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]),
            asc: buf[12],
            ascq: buf[13],
            fru_code: buf[14],
            sense_key_specific: [buf[15], buf[16], buf[17]],
        }
    }

    pub fn sense_key_text(&self) -> &'static str {
        sense_key_to_str(self.sense_key)
    }

    pub fn additional_sense_text(&self) -> &'static str {
        asc_ascq_to_str(self.asc, self.ascq)
    }

    /// BLANK CHECK with ASC/ASCQ 00/05: the head is past the last recorded data
    pub fn is_end_of_data(&self) -> bool {
        self.sense_key == SENSE_KEY_BLANK_CHECK
            && self.asc == ASC_END_OF_DATA
            && self.ascq == ASCQ_END_OF_DATA
    }
}

impl fmt::Display for SenseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (key 0x{:02X}), {} (ASC 0x{:02X}, ASCQ 0x{:02X})",
            self.sense_key_text(),
            self.sense_key,
            self.additional_sense_text(),
            self.asc,
            self.ascq
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sense_buffer(key: u8, asc: u8, ascq: u8) -> [u8; SENSE_INFO_LEN] {
        let mut buf = [0u8; SENSE_INFO_LEN];
        buf[0] = 0x70;
        buf[2] = key;
        buf[7] = 10;
        buf[12] = asc;
        buf[13] = ascq;
        buf
    }

    #[test]
    fn test_additional_sense_table_sorted() {
        assert!(ADDITIONAL_SENSE_CODES
            .windows(2)
            .all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn test_parse_fixed_sense() {
        let mut buf = sense_buffer(0x88, 0x00, 0x05);
        buf[0] = 0xF0;
        buf[3..7].copy_from_slice(&[0x00, 0x00, 0x01, 0x00]);
        let sense = SenseData::parse(&buf);
        assert!(sense.valid);
        assert_eq!(sense.response_code, 0x70);
        assert!(sense.filemark);
        assert_eq!(sense.sense_key, SENSE_KEY_BLANK_CHECK);
        assert_eq!(sense.information, 0x100);
        assert_eq!(sense.additional_len, 10);
    }

    #[test]
    fn test_zeroed_sense_is_no_sense() {
        let sense = SenseData::parse(&[0u8; SENSE_INFO_LEN]);
        assert_eq!(sense.sense_key_text(), "No Sense");
        assert_eq!(sense.additional_sense_text(), "No additional sense information");
        assert!(!sense.is_end_of_data());
    }

    #[test]
    fn test_lookup_tables() {
        assert_eq!(sense_key_to_str(SENSE_KEY_ILLEGAL_REQUEST), "Illegal Request");
        assert_eq!(sense_key_to_str(0x0F), "Completed");
        assert_eq!(asc_ascq_to_str(0x26, 0x00), "Invalid field in parameter list");
        assert_eq!(asc_ascq_to_str(0x74, 0x03), "Incorrect data encryption key");
    }

    #[test]
    fn test_unknown_codes_render_placeholder() {
        assert_eq!(sense_key_to_str(0x10), "Unknown");
        assert_eq!(sense_key_to_str(0xFF), "Unknown");
        assert_eq!(asc_ascq_to_str(0xFE, 0xFE), "Unknown");
    }

    #[test]
    fn test_end_of_data_requires_exact_triple() {
        assert!(SenseData::parse(&sense_buffer(0x08, 0x00, 0x05)).is_end_of_data());
        assert!(!SenseData::parse(&sense_buffer(0x08, 0x00, 0x06)).is_end_of_data());
        assert!(!SenseData::parse(&sense_buffer(0x08, 0x01, 0x05)).is_end_of_data());
        assert!(!SenseData::parse(&sense_buffer(0x03, 0x00, 0x05)).is_end_of_data());
        assert!(!SenseData::parse(&sense_buffer(0x00, 0x00, 0x00)).is_end_of_data());
    }

    #[test]
    fn test_display_includes_codes() {
        let text = SenseData::parse(&sense_buffer(0x05, 0x24, 0x00)).to_string();
        assert!(text.contains("Illegal Request"));
        assert!(text.contains("Invalid field in CDB"));
        assert!(text.contains("0x24"));
    }
}
