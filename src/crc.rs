//! CRC-32 as used by the Zip format (reflected, polynomial `0xEDB88320`).
//!
//! The lookup table is computed at compile time and is read-only, so any
//! number of threads may checksum concurrently.

const POLYNOMIAL: u32 = 0xEDB8_8320;

static CRC32_TABLE: [u32; 256] = make_table();

const fn make_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut c = i as u32;
        let mut j = 0;
        while j < 8 {
            c = if c & 1 != 0 {
                (c >> 1) ^ POLYNOMIAL
            } else {
                c >> 1
            };
            j += 1;
        }
        table[i] = c;
        i += 1;
    }
    table
}

/// Checksum a whole buffer.
///
/// ```
/// assert_eq!(storezip::crc::crc32(b""), 0);
/// assert_eq!(storezip::crc::crc32(b"a"), 0xE8B7BE43);
/// ```
pub fn crc32(bytes: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hasher.finalize()
}

/// Incremental CRC-32, for content handed over in several pieces.
#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    register: u32,
}

impl Hasher {
    pub fn new() -> Hasher {
        Hasher {
            register: u32::MAX,
        }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        let mut c = self.register;
        for byte in bytes {
            c = (c >> 8) ^ CRC32_TABLE[((c ^ *byte as u32) & 0xFF) as usize];
        }
        self.register = c;
    }

    pub fn finalize(self) -> u32 {
        !self.register
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}
