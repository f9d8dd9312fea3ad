use core::fmt;
use std::borrow::Cow;

use crate::constants::{
    MAX_FILE_NAME_LENGTH, STORE_METHOD, VERSION_MADE_BY, VERSION_NEEDED_TO_EXTRACT,
};
use crate::error::ArchiveError;
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Timelike};

/// A named blob to be stored in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub content: Vec<u8>,
}

impl Entry {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Entry {
        Entry {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Encode the name with one byte per character.
    ///
    /// Fails when the name holds a non-ASCII character or is longer than 255
    /// characters (the length field only carries one byte). Without the UTF-8
    /// flag readers decode name bytes as CP437, which only agrees with the
    /// caller's text on ASCII.
    pub fn encoded_name(&self) -> Result<Vec<u8>, ArchiveError> {
        let invalid = |reason: String| ArchiveError::InvalidEntryName {
            name: self.name.clone(),
            reason,
        };

        if let Some(c) = self.name.chars().find(|c| !c.is_ascii()) {
            return Err(invalid(format!("character {:?} is not ASCII", c)));
        }

        let bytes = self.name.as_bytes().to_vec();

        if bytes.len() > MAX_FILE_NAME_LENGTH {
            return Err(invalid(format!(
                "{} characters, at most {} allowed",
                bytes.len(),
                MAX_FILE_NAME_LENGTH
            )));
        }

        Ok(bytes)
    }
}

impl<N: Into<String>, C: Into<Vec<u8>>> From<(N, C)> for Entry {
    fn from((name, content): (N, C)) -> Self {
        Entry::new(name, content)
    }
}

/// The record metadata computed for one entry while the archive is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFileEntry {
    pub version_made_by: u16,
    pub version_needed: u16,
    pub general_purpose_flags: u16,
    pub compression_method: u16,
    pub last_mod_file_time: u16,
    pub last_mod_file_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_as_bytes: Vec<u8>,
    pub offset: u32,
}

impl ArchiveFileEntry {
    /// Metadata of a stored entry, before its offset is known.
    pub fn stored(file_name_as_bytes: Vec<u8>, crc32: u32, size: u32, date: u16) -> Self {
        Self {
            version_made_by: VERSION_MADE_BY,
            version_needed: VERSION_NEEDED_TO_EXTRACT,
            general_purpose_flags: 0,
            compression_method: STORE_METHOD,
            last_mod_file_time: 0,
            last_mod_file_date: date,
            crc32,
            compressed_size: size,
            uncompressed_size: size,
            file_name_as_bytes,
            offset: 0,
        }
    }

    /// Length of the name as written in the records: low byte only.
    pub fn file_name_len(&self) -> u16 {
        self.file_name_as_bytes.len() as u8 as u16
    }

    /// The stored name, one character per byte.
    pub fn get_file_name(&self) -> Cow<'_, str> {
        if self.file_name_as_bytes.is_ascii() {
            String::from_utf8_lossy(&self.file_name_as_bytes)
        } else {
            Cow::Owned(self.file_name_as_bytes.iter().map(|b| *b as char).collect())
        }
    }

    fn pretty_version(zip_version: u16) -> (u16, u16) {
        let major = zip_version / 10;
        let minor = zip_version % 10;

        (major, minor)
    }
}

impl fmt::Display for ArchiveFileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let padding = 48;

        writeln!(f, "{: <padding$}{}", "file name:", self.get_file_name())?;

        writeln!(
            f,
            "{: <padding$}{}",
            "offset of local header from start of archive:", self.offset
        )?;

        let (major, minor) = ArchiveFileEntry::pretty_version(self.version_needed);
        writeln!(
            f,
            "{: <padding$}{}.{}",
            "minimum software version required to extract:", major, minor
        )?;

        writeln!(
            f,
            "{: <padding$}{:#016b}",
            "general purpose bit flag:", self.general_purpose_flags
        )?;

        let label = if self.compression_method == STORE_METHOD {
            "none (stored)".to_owned()
        } else {
            format!("unknown ({})", self.compression_method)
        };
        writeln!(f, "{: <padding$}{}", "compression method:", label)?;

        let date_time = DateTimeCS::from_msdos(self.last_mod_file_date, self.last_mod_file_time);
        writeln!(
            f,
            "{: <padding$}{}",
            "file last modified on (DOS date/time):", date_time
        )?;

        writeln!(
            f,
            "{: <padding$}{:x}",
            "32-bit CRC value (hex):", self.crc32
        )?;

        writeln!(
            f,
            "{: <padding$}{} bytes",
            "compressed size:", self.compressed_size
        )?;
        writeln!(
            f,
            "{: <padding$}{} bytes",
            "uncompressed size:", self.uncompressed_size
        )?;

        writeln!(
            f,
            "{: <padding$}{} characters",
            "length of filename:",
            self.file_name_len()
        )
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DateTimeCS {
    year: u16,
    month: u16,
    day: u16,
    hour: u16,
    minute: u16,
    second: u16,
}

impl Default for DateTimeCS {
    /// 1980, January 1st, midnight: the MS-DOS epoch.
    fn default() -> Self {
        Self {
            year: 1980,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

impl DateTimeCS {
    const MIN_YEAR: u16 = 1980;
    const MAX_YEAR: u16 = 1980 + 0x7F;

    pub fn new(year: u16, month: u16, day: u16, hour: u16, minute: u16, second: u16) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub fn from_chrono_datetime<Tz: TimeZone>(datetime: DateTime<Tz>) -> Self {
        Self {
            year: datetime.year().clamp(0, u16::MAX as i32) as u16,
            month: datetime.month() as u16,
            day: datetime.day() as u16,
            hour: datetime.hour() as u16,
            minute: datetime.minute() as u16,
            second: datetime.second() as u16,
        }
    }

    pub fn now() -> Self {
        Self::from_chrono_datetime(Local::now())
    }

    pub fn from_msdos(datepart: u16, timepart: u16) -> Self {
        let seconds = (timepart & 0b0000000000011111) << 1;
        let minutes = (timepart & 0b0000011111100000) >> 5;
        let hours = (timepart & 0b1111100000000000) >> 11;
        let days = datepart & 0b0000000000011111;
        let months = (datepart & 0b0000000111100000) >> 5;
        let years = (datepart & 0b1111111000000000) >> 9;

        Self {
            year: years + 1980,
            month: months,
            day: days,
            hour: hours,
            minute: minutes,
            second: seconds,
        }
    }

    pub fn to_time(&self) -> chrono::NaiveDateTime {
        let date = NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)
            .unwrap_or_default();

        date.and_hms_opt(self.hour as u32, self.minute as u32, self.second as u32)
            .unwrap_or_default()
    }

    /// Packed `(date, time)` pair. The year saturates to the 1980..=2107 range
    /// the 7-bit year field can hold.
    pub fn ms_dos(&self) -> (u16, u16) {
        let time = (self.second / 2) | (self.minute << 5) | self.hour << 11;
        (self.ms_dos_date(), time)
    }

    pub fn ms_dos_date(&self) -> u16 {
        let year = self.year.clamp(Self::MIN_YEAR, Self::MAX_YEAR) - Self::MIN_YEAR;
        (self.day & 0x1F) | (self.month & 0x0F) << 5 | year << 9
    }
}

impl fmt::Display for DateTimeCS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date_time = self.to_time();
        write!(f, "{:}", date_time)
    }
}

/// The (timezone-less) date written in the archive alongside every entry.
///
/// Use `FileDateTime::Zero` if the date is insignificant (1980, January 1st).
/// Use `FileDateTime::Custom` for a fixed date, which makes builds reproducible.
/// Use `FileDateTime::Now` for the local date at the moment the build starts.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum FileDateTime {
    /// 1980, January 1st, 12AM.
    Zero,
    Custom(DateTimeCS),
    #[default]
    Now,
}

impl FileDateTime {
    /// Resolve to a concrete date and time. `Now` reads the clock on every call.
    pub fn resolve(&self) -> DateTimeCS {
        match self {
            FileDateTime::Zero => DateTimeCS::default(),
            FileDateTime::Custom(date_time) => *date_time,
            FileDateTime::Now => DateTimeCS::now(),
        }
    }

    pub fn ms_dos(&self) -> (u16, u16) {
        self.resolve().ms_dos()
    }

    pub fn to_time(&self) -> chrono::NaiveDateTime {
        self.resolve().to_time()
    }
}

impl From<DateTimeCS> for FileDateTime {
    fn from(value: DateTimeCS) -> Self {
        FileDateTime::Custom(value)
    }
}
