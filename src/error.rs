use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Archive error {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid entry name {name:?}: {reason}")]
    InvalidEntryName { name: String, reason: String },

    #[error("Too many entries ({0}), an archive holds at most 65535")]
    TooManyEntries(usize),

    #[error("Entry {name:?} is too large ({size} bytes)")]
    EntryTooLarge { name: String, size: u64 },

    #[error("Archive is too large ({0} bytes), offsets must fit in 32 bits")]
    ArchiveTooLarge(u64),

    #[error("Bad archive structure : {0}")]
    BadArchiveStructure(String),

    #[error("The compression method code '{0}' is not supported")]
    UnsupportedCompressionMethodCode(u16),

    #[error("CRC mismatch for {name:?}: expected {expected:08x}, got {actual:08x}")]
    CrcMismatch {
        name: String,
        expected: u32,
        actual: u32,
    },
}
