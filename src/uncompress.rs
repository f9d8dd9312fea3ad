use crate::archive_common::CentralDirectoryEnd;
use crate::constants::{
    CENTRAL_DIRECTORY_END_SIGNATURE, CENTRAL_DIRECTORY_ENTRY_SIGNATURE,
    END_OF_CENTRAL_DIRECTORY_SIZE, FILE_HEADER_SIGNATURE, STORE_METHOD,
};
use crate::crc::crc32;
use crate::error::ArchiveError;
use crate::types::{ArchiveFileEntry, Entry};
use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;
use std::fmt::{self, Display};
use std::io::{Cursor, Read, Seek, SeekFrom};

/// Reads back a store-only archive.
///
/// The central directory is parsed on construction; entry payloads are read
/// on demand with [`extract`](Self::extract()).
pub struct ArchiveReader<R>
where
    R: Read + Seek,
{
    reader: R,
    archive_length: u64,
    pub file_entries: Vec<ArchiveFileEntry>,
    pub central_directory_end: CentralDirectoryEnd,
}

impl<R: Read + Seek> ArchiveReader<R> {
    pub fn new(mut reader: R) -> Result<ArchiveReader<R>, ArchiveError> {
        let archive_length = reader.seek(SeekFrom::End(0))?;
        let (central_directory_end, end_position) =
            Self::find_central_directory_end(&mut reader, archive_length)?;
        let file_entries =
            Self::read_central_directory(&central_directory_end, end_position, &mut reader)?;

        if file_entries.len()
            != central_directory_end.total_number_of_entries_in_the_central_directory as usize
        {
            return Err(ArchiveError::BadArchiveStructure(format!(
                "{} central directory records for {} announced entries",
                file_entries.len(),
                central_directory_end.total_number_of_entries_in_the_central_directory
            )));
        }

        Ok(ArchiveReader {
            reader,
            archive_length,
            file_entries,
            central_directory_end,
        })
    }

    fn find_central_directory_end(
        reader: &mut R,
        file_length: u64,
    ) -> Result<(CentralDirectoryEnd, u64), ArchiveError> {
        let mut position = file_length
            .checked_sub(END_OF_CENTRAL_DIRECTORY_SIZE as u64)
            .ok_or_else(|| ArchiveError::BadArchiveStructure("Archive too small".to_owned()))?;

        // the end record may be followed by a comment of up to u16::MAX bytes
        let search_lower_bound = position.saturating_sub(u16::MAX as u64);

        loop {
            reader.seek(SeekFrom::Start(position))?;

            if reader.read_u32::<LittleEndian>()? == CENTRAL_DIRECTORY_END_SIGNATURE {
                debug!("end of central directory found at {}", position);
                break;
            }

            if position <= search_lower_bound {
                return Err(ArchiveError::BadArchiveStructure(
                    "End of central directory signature not found".to_owned(),
                ));
            }
            position -= 1;
        }

        let central_directory_end = CentralDirectoryEnd {
            number_of_this_disk: reader.read_u16::<LittleEndian>()?,
            number_of_the_disk_with_central_directory: reader.read_u16::<LittleEndian>()?,
            total_number_of_entries_on_this_disk: reader.read_u16::<LittleEndian>()?,
            total_number_of_entries_in_the_central_directory: reader.read_u16::<LittleEndian>()?,
            central_directory_size: reader.read_u32::<LittleEndian>()?,
            offset_of_start_of_central_directory: reader.read_u32::<LittleEndian>()?,
            zip_file_comment_length: reader.read_u16::<LittleEndian>()?,
        };

        Ok((central_directory_end, position))
    }

    fn read_central_directory(
        central_directory_end: &CentralDirectoryEnd,
        end_position: u64,
        reader: &mut R,
    ) -> Result<Vec<ArchiveFileEntry>, ArchiveError> {
        // the directory must sit entirely before the end record
        let central_directory_offset =
            central_directory_end.offset_of_start_of_central_directory as u64;
        let central_directory_stop =
            central_directory_offset + central_directory_end.central_directory_size as u64;
        if central_directory_stop > end_position {
            return Err(ArchiveError::BadArchiveStructure(format!(
                "Central directory ends at {}, past the end record at {}",
                central_directory_stop, end_position
            )));
        }

        reader.seek(SeekFrom::Start(central_directory_offset))?;

        let mut central_directory_buffer =
            vec![0; central_directory_end.central_directory_size as usize];
        reader.read_exact(&mut central_directory_buffer)?;

        let len = central_directory_buffer.len() as u64;
        let mut indexer = Cursor::new(central_directory_buffer);
        let mut entries = Vec::new();

        while indexer.position() < len {
            let signature = indexer.read_u32::<LittleEndian>()?;
            if signature != CENTRAL_DIRECTORY_ENTRY_SIGNATURE {
                return Err(ArchiveError::BadArchiveStructure(format!(
                    "Central directory signature not found, got {:08X}",
                    signature
                )));
            }

            let version_made_by = indexer.read_u16::<LittleEndian>()?;
            let version_needed = indexer.read_u16::<LittleEndian>()?;
            let general_purpose_flags = indexer.read_u16::<LittleEndian>()?;
            let compression_method = indexer.read_u16::<LittleEndian>()?;
            let last_mod_file_time = indexer.read_u16::<LittleEndian>()?;
            let last_mod_file_date = indexer.read_u16::<LittleEndian>()?;
            let crc32 = indexer.read_u32::<LittleEndian>()?;
            let compressed_size = indexer.read_u32::<LittleEndian>()?;
            let uncompressed_size = indexer.read_u32::<LittleEndian>()?;
            let file_name_len = indexer.read_u16::<LittleEndian>()?;
            let extra_field_length = indexer.read_u16::<LittleEndian>()?;
            let file_comment_length = indexer.read_u16::<LittleEndian>()?;
            let _file_disk_number = indexer.read_u16::<LittleEndian>()?;
            let _internal_file_attributes = indexer.read_u16::<LittleEndian>()?;
            let _external_file_attributes = indexer.read_u32::<LittleEndian>()?;
            let offset = indexer.read_u32::<LittleEndian>()?;

            let mut file_name_as_bytes = vec![0; file_name_len as usize];
            indexer.read_exact(&mut file_name_as_bytes)?;
            indexer.seek(SeekFrom::Current(
                extra_field_length as i64 + file_comment_length as i64,
            ))?;

            entries.push(ArchiveFileEntry {
                version_made_by,
                version_needed,
                general_purpose_flags,
                compression_method,
                last_mod_file_time,
                last_mod_file_date,
                crc32,
                compressed_size,
                uncompressed_size,
                file_name_as_bytes,
                offset,
            });
        }

        Ok(entries)
    }

    /// Read the payload of `entry` from its local record and check its CRC-32.
    pub fn extract(&mut self, entry: &ArchiveFileEntry) -> Result<Vec<u8>, ArchiveError> {
        if entry.compression_method != STORE_METHOD {
            return Err(ArchiveError::UnsupportedCompressionMethodCode(
                entry.compression_method,
            ));
        }

        self.reader.seek(SeekFrom::Start(entry.offset as u64))?;

        let signature = self.reader.read_u32::<LittleEndian>()?;
        if signature != FILE_HEADER_SIGNATURE {
            return Err(ArchiveError::BadArchiveStructure(format!(
                "No local file header at offset {} for {:?}",
                entry.offset,
                entry.get_file_name()
            )));
        }

        // version, flags, method, time, date, crc, sizes
        self.reader.seek(SeekFrom::Current(22))?;
        let file_name_len = self.reader.read_u16::<LittleEndian>()?;
        let extra_field_length = self.reader.read_u16::<LittleEndian>()?;
        self.reader.seek(SeekFrom::Current(
            file_name_len as i64 + extra_field_length as i64,
        ))?;

        let content_start = self.reader.stream_position()?;
        if content_start + entry.compressed_size as u64 > self.archive_length {
            return Err(ArchiveError::BadArchiveStructure(format!(
                "{:?} claims {} bytes at {}, past the end of the archive ({} bytes)",
                entry.get_file_name(),
                entry.compressed_size,
                content_start,
                self.archive_length
            )));
        }

        let mut content = vec![0; entry.compressed_size as usize];
        self.reader.read_exact(&mut content)?;

        let actual = crc32(&content);
        if actual != entry.crc32 {
            return Err(ArchiveError::CrcMismatch {
                name: entry.get_file_name().into_owned(),
                expected: entry.crc32,
                actual,
            });
        }

        Ok(content)
    }

    /// Every entry with its content, in central directory order.
    pub fn extract_all(&mut self) -> Result<Vec<Entry>, ArchiveError> {
        let file_entries = self.file_entries.clone();
        file_entries
            .iter()
            .map(|entry| Ok(Entry::new(entry.get_file_name(), self.extract(entry)?)))
            .collect()
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read + Seek> Display for ArchiveReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let padding = 48;
        let end = &self.central_directory_end;

        writeln!(
            f,
            "{: <padding$}{}",
            "number of entries:", end.total_number_of_entries_in_the_central_directory
        )?;
        writeln!(
            f,
            "{: <padding$}{}",
            "offset of central directory:", end.offset_of_start_of_central_directory
        )?;
        writeln!(
            f,
            "{: <padding$}{} bytes",
            "size of central directory:", end.central_directory_size
        )?;

        for entry in &self.file_entries {
            writeln!(f)?;
            write!(f, "{}", entry)?;
        }

        Ok(())
    }
}
