use crate::constants::{
    CENTRAL_DIRECTORY_END_SIGNATURE, CENTRAL_DIRECTORY_ENTRY_SIGNATURE,
    END_OF_CENTRAL_DIRECTORY_SIZE, FILE_HEADER_SIGNATURE,
};
use crate::types::ArchiveFileEntry;

/// Little-endian record buffer.
#[derive(Debug)]
pub struct ArchiveDescriptor {
    buffer: Vec<u8>,
}

impl ArchiveDescriptor {
    pub fn new(capacity: usize) -> ArchiveDescriptor {
        ArchiveDescriptor {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u16(&mut self, val: u16) {
        self.buffer.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u32(&mut self, val: u32) {
        self.buffer.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_bytes(&mut self, val: &[u8]) {
        self.buffer.extend_from_slice(val);
    }

    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }
}

/// Local file header, without the payload that follows it.
pub fn build_file_header(descriptor: &mut ArchiveDescriptor, file_info: &ArchiveFileEntry) {
    descriptor.write_u32(FILE_HEADER_SIGNATURE);
    descriptor.write_u16(file_info.version_needed);
    descriptor.write_u16(file_info.general_purpose_flags);
    descriptor.write_u16(file_info.compression_method);
    descriptor.write_u16(file_info.last_mod_file_time);
    descriptor.write_u16(file_info.last_mod_file_date);
    descriptor.write_u32(file_info.crc32);
    descriptor.write_u32(file_info.compressed_size);
    descriptor.write_u32(file_info.uncompressed_size);
    descriptor.write_u16(file_info.file_name_len());
    descriptor.write_u16(0); // extra field length
    descriptor.write_bytes(&file_info.file_name_as_bytes);
}

pub fn build_central_directory_file_header(
    descriptor: &mut ArchiveDescriptor,
    file_info: &ArchiveFileEntry,
) {
    descriptor.write_u32(CENTRAL_DIRECTORY_ENTRY_SIGNATURE);
    descriptor.write_u16(file_info.version_made_by);
    descriptor.write_u16(file_info.version_needed);
    descriptor.write_u16(file_info.general_purpose_flags);
    descriptor.write_u16(file_info.compression_method);
    descriptor.write_u16(file_info.last_mod_file_time);
    descriptor.write_u16(file_info.last_mod_file_date);
    descriptor.write_u32(file_info.crc32);
    descriptor.write_u32(file_info.compressed_size);
    descriptor.write_u32(file_info.uncompressed_size);
    descriptor.write_u16(file_info.file_name_len());
    descriptor.write_u16(0); // extra field length
    descriptor.write_u16(0); // file comment length
    descriptor.write_u16(0); // disk number start
    descriptor.write_u16(0); // internal file attributes
    descriptor.write_u32(0); // external file attributes
    descriptor.write_u32(file_info.offset);
    descriptor.write_bytes(&file_info.file_name_as_bytes);
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CentralDirectoryEnd {
    pub number_of_this_disk: u16,
    pub number_of_the_disk_with_central_directory: u16,
    pub total_number_of_entries_on_this_disk: u16,
    pub total_number_of_entries_in_the_central_directory: u16,
    pub central_directory_size: u32,
    pub offset_of_start_of_central_directory: u32,
    pub zip_file_comment_length: u16,
}

impl CentralDirectoryEnd {
    pub fn new(
        number_of_entries: u16,
        central_directory_size: u32,
        offset_of_start_of_central_directory: u32,
    ) -> Self {
        Self {
            total_number_of_entries_on_this_disk: number_of_entries,
            total_number_of_entries_in_the_central_directory: number_of_entries,
            central_directory_size,
            offset_of_start_of_central_directory,
            ..Default::default()
        }
    }

    pub fn create_end_of_central_directory(
        &self,
        end_of_central_directory: &mut ArchiveDescriptor,
    ) {
        end_of_central_directory.write_u32(CENTRAL_DIRECTORY_END_SIGNATURE);
        end_of_central_directory.write_u16(self.number_of_this_disk);
        end_of_central_directory.write_u16(self.number_of_the_disk_with_central_directory);
        end_of_central_directory.write_u16(self.total_number_of_entries_on_this_disk);
        end_of_central_directory.write_u16(self.total_number_of_entries_in_the_central_directory);
        end_of_central_directory.write_u32(self.central_directory_size);
        end_of_central_directory.write_u32(self.offset_of_start_of_central_directory);
        end_of_central_directory.write_u16(self.zip_file_comment_length);
    }

    pub fn size() -> usize {
        END_OF_CENTRAL_DIRECTORY_SIZE
    }
}
