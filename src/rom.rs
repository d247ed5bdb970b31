use crate::error::RomError;

pub const ROM_SIZE: usize = 512;
const ENTRY_COUNT: usize = 64;
const ENTRY_SIZE: usize = 8;

/// The 64-entry phoneme lookup table. Entries are self-identifying (each
/// word carries its own phone code in bits 56..61), so lookup is a linear
/// scan rather than an index.
pub struct Rom {
    bytes: [u8; ROM_SIZE],
}

impl Rom {
    pub fn new(rom_bytes: &[u8]) -> Result<Rom, RomError> {
        if rom_bytes.len() != ROM_SIZE {
            return Err(RomError::BadSize(rom_bytes.len()));
        }
        let mut bytes = [0u8; ROM_SIZE];
        bytes.copy_from_slice(rom_bytes);
        Ok(Rom { bytes })
    }

    /// Scans all 64 entries for the one whose phone code matches. Returns
    /// the all-zero word if none match; a well-formed ROM always matches.
    pub fn lookup(&self, phone: u8) -> u64 {
        for i in 0..ENTRY_COUNT {
            let offset = i * ENTRY_SIZE;
            let mut buf = [0u8; ENTRY_SIZE];
            buf.copy_from_slice(&self.bytes[offset..offset + ENTRY_SIZE]);
            let word = u64::from_le_bytes(buf);
            if phone as u64 == (word >> 56) & 0x3F {
                return word;
            }
        }
        0
    }
}
