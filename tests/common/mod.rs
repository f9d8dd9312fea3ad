#![allow(dead_code)]

use std::fs::File;
use std::path::{Path, PathBuf};

use storezip::archive::ArchiveOptions;
use storezip::types::{DateTimeCS, FileDateTime};
use tempfile::TempDir;

pub const END_OF_CENTRAL_DIRECTORY_SIZE: usize = 22;

pub fn fixed_options() -> ArchiveOptions {
    ArchiveOptions::default()
        .last_modified_time(FileDateTime::Custom(DateTimeCS::new(2013, 8, 21, 0, 0, 0)))
}

pub fn u16_at(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

pub fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Every position where `signature` appears in `bytes`.
pub fn signature_positions(bytes: &[u8], signature: u32) -> Vec<usize> {
    let needle = signature.to_le_bytes();
    bytes
        .windows(4)
        .enumerate()
        .filter(|(_, window)| *window == needle)
        .map(|(position, _)| position)
        .collect()
}

pub fn all_byte_values() -> Vec<u8> {
    (0..=255u8).collect()
}

pub fn create_new_clean_file(dir: &TempDir, file_name: &str) -> (File, PathBuf) {
    let out_path = dir.path().join(file_name);

    let file = File::create(&out_path).unwrap_or_else(|error| {
        panic!("creating file {:?} failed, because {:?}", &out_path, error);
    });

    (file, out_path)
}

pub fn open(path: &Path) -> File {
    File::open(path).unwrap_or_else(|error| {
        panic!("opening file {:?} failed, because {:?}", path, error);
    })
}
