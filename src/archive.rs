use std::io::Write;

use log::{debug, trace};

use crate::archive_common::{
    build_central_directory_file_header, build_file_header, ArchiveDescriptor,
    CentralDirectoryEnd,
};
use crate::constants::MAX_ENTRY_COUNT;
use crate::crc::crc32;
use crate::error::ArchiveError;
use crate::tools::{archive_size, central_directory_size};
use crate::types::{ArchiveFileEntry, Entry, FileDateTime};

/// Options applied to every entry of an archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// The date written in every local and central record.
    pub last_modified_time: FileDateTime,
}

impl ArchiveOptions {
    /// Set the last modified time.
    ///
    /// The default is the local date when the archive is finalized. Use a
    /// `FileDateTime::Custom` value to get reproducible output.
    pub fn last_modified_time(mut self, mod_time: FileDateTime) -> ArchiveOptions {
        self.last_modified_time = mod_time;
        self
    }
}

#[derive(Debug)]
struct StagedEntry {
    file_name_as_bytes: Vec<u8>,
    content: Vec<u8>,
}

/// A store-only zip archive held in memory.
///
/// Append entries one by one with [`append`](Self::append()); every entry is
/// checked as it comes in. Nothing is laid out until
/// [`finalize`](Self::finalize()), which writes the local records, the central
/// directory and the end record in one go.
#[derive(Debug, Default)]
pub struct ZipArchive {
    entries: Vec<StagedEntry>,
    options: ArchiveOptions,
}

impl ZipArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ArchiveOptions) -> Self {
        Self {
            entries: Vec::new(),
            options,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry to the archive.
    ///
    /// # Error
    ///
    /// Fails with [`ArchiveError::InvalidEntryName`] when the name is not ASCII
    /// or does not fit the one byte length field, [`ArchiveError::EntryTooLarge`]
    /// when the content does not fit a 32-bit size and
    /// [`ArchiveError::TooManyEntries`] past 65535 entries. The archive is left
    /// unchanged on failure.
    pub fn append(&mut self, entry: Entry) -> Result<(), ArchiveError> {
        if self.entries.len() >= MAX_ENTRY_COUNT {
            return Err(ArchiveError::TooManyEntries(self.entries.len() + 1));
        }

        let file_name_as_bytes = entry.encoded_name()?;

        if u32::try_from(entry.content.len()).is_err() {
            return Err(ArchiveError::EntryTooLarge {
                name: entry.name,
                size: entry.content.len() as u64,
            });
        }

        self.entries.push(StagedEntry {
            file_name_as_bytes,
            content: entry.content,
        });

        Ok(())
    }

    pub fn append_file(
        &mut self,
        file_name: &str,
        content: impl Into<Vec<u8>>,
    ) -> Result<(), ArchiveError> {
        self.append(Entry::new(file_name, content))
    }

    /// Exact size in bytes of the finalized archive.
    pub fn archive_size(&self) -> u64 {
        archive_size(
            self.entries
                .iter()
                .map(|entry| (entry.file_name_as_bytes.len(), entry.content.len() as u64)),
        )
    }

    /// Lay out the archive and return its bytes.
    pub fn finalize(self) -> Result<Vec<u8>, ArchiveError> {
        let total_size = self.archive_size();
        let central_directory_size = central_directory_size(
            self.entries
                .iter()
                .map(|entry| entry.file_name_as_bytes.len()),
        );
        let central_directory_offset =
            total_size - central_directory_size - CentralDirectoryEnd::size() as u64;

        let too_large = |_| ArchiveError::ArchiveTooLarge(total_size);
        u32::try_from(central_directory_offset).map_err(too_large)?;
        u32::try_from(central_directory_size).map_err(too_large)?;
        let capacity = usize::try_from(total_size).map_err(too_large)?;

        let (date, _) = self.options.last_modified_time.ms_dos();

        let mut archive = ArchiveDescriptor::new(capacity);
        let mut files_info = Vec::with_capacity(self.entries.len());

        for entry in self.entries {
            let size = entry.content.len() as u32;
            let mut file_info =
                ArchiveFileEntry::stored(entry.file_name_as_bytes, crc32(&entry.content), size, date);
            file_info.offset = archive.len() as u32;

            build_file_header(&mut archive, &file_info);
            archive.write_bytes(&entry.content);

            trace!(
                "local header {:?} at {} ({} bytes, crc {:08x})",
                file_info.get_file_name(),
                file_info.offset,
                size,
                file_info.crc32
            );

            files_info.push(file_info);
        }

        let central_directory_start = archive.len();

        for file_info in &files_info {
            build_central_directory_file_header(&mut archive, file_info);
        }

        let central_directory_len = archive.len() - central_directory_start;

        let end = CentralDirectoryEnd::new(
            files_info.len() as u16,
            central_directory_len as u32,
            central_directory_start as u32,
        );
        end.create_end_of_central_directory(&mut archive);

        debug!(
            "archive with {} entries, central directory at {} ({} bytes), {} bytes total",
            files_info.len(),
            central_directory_start,
            central_directory_len,
            archive.len()
        );
        debug_assert_eq!(archive.len() as u64, total_size);

        Ok(archive.finish())
    }

    /// Lay out the archive and write it to `sink`.
    ///
    /// Returns the archive size (bytes) and the [Write] object passed in.
    pub fn finalize_into<W: Write>(self, mut sink: W) -> Result<(u64, W), ArchiveError> {
        let archive = self.finalize()?;

        sink.write_all(&archive)?;
        sink.flush()?;

        Ok((archive.len() as u64, sink))
    }
}

/// Build a store-only archive from `entries`, in order, dated now.
///
/// ```
/// let archive = storezip::build([("a.txt", "hello"), ("b.txt", "")]).unwrap();
///
/// assert_eq!(&archive[0..4], b"PK\x03\x04");
/// ```
pub fn build<I>(entries: I) -> Result<Vec<u8>, ArchiveError>
where
    I: IntoIterator,
    I::Item: Into<Entry>,
{
    build_with_options(entries, &ArchiveOptions::default())
}

/// Build a store-only archive from `entries` with explicit options.
///
/// Every entry is validated before any byte is laid out.
pub fn build_with_options<I>(entries: I, options: &ArchiveOptions) -> Result<Vec<u8>, ArchiveError>
where
    I: IntoIterator,
    I::Item: Into<Entry>,
{
    let mut archive = ZipArchive::with_options(*options);
    for entry in entries {
        archive.append(entry.into())?;
    }
    archive.finalize()
}
