//! Utility functions for RustTDE
//!
//! Big-endian field packing for SCSI structures and hex rendering for diagnostics.

/// Store a value as 2 bytes MSB/LSB, discarding bits above 16
pub fn store_be16(field: &mut [u8; 2], value: u32) {
    field[0] = ((value & 0xff00) >> 8) as u8;
    field[1] = (value & 0x00ff) as u8;
}

/// Store a value as 4 bytes MSB/LSB, discarding bits above 32
pub fn store_be32(field: &mut [u8; 4], value: u64) {
    field[0] = ((value & 0xff00_0000) >> 24) as u8;
    field[1] = ((value & 0x00ff_0000) >> 16) as u8;
    field[2] = ((value & 0x0000_ff00) >> 8) as u8;
    field[3] = (value & 0x0000_00ff) as u8;
}

/// Read a 2-byte big-endian field
pub fn load_be16(field: &[u8; 2]) -> u16 {
    u16::from_be_bytes(*field)
}

/// Read a 4-byte big-endian field
pub fn load_be32(field: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*field)
}

/// Borrow a fixed-width field out of a byte buffer.
///
/// Panics if `offset + N` is out of bounds; callers index into buffers whose
/// size is fixed by the protocol layout.
pub fn field_mut<const N: usize>(buffer: &mut [u8], offset: usize) -> &mut [u8; N] {
    (&mut buffer[offset..offset + N])
        .try_into()
        .unwrap_or_else(|_| unreachable!("slice of length {} always converts", N))
}

/// Render bytes as lowercase hex pairs separated by spaces (`10 00 31 ...`)
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .chunks(1)
        .map(hex::encode)
        .collect::<Vec<_>>()
        .join(" ")
}
