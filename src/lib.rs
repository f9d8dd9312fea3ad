//! A library for building store-only ZIP archives from named, in-memory blobs.
//!
//! ZIP is an archive file format that supports lossless data compression. This crate writes
//! every entry with the *store* method (no compression): the entries here are small
//! generated files, so the archive is only a container. The output is a complete archive
//! readable by any standards-compliant unarchiver.
//!
//! An archive is laid out in three parts, every integer little-endian:
//!
//! Record                   | Signature     | Holds
//! -------------------------|---------------|------
//! Local file header        | `50 4B 03 04` | crc32, sizes, name, then the raw content
//! Central directory header | `50 4B 01 02` | the same metadata plus the local header offset
//! End of central directory | `50 4B 05 06` | entry count, directory size and offset
//!
//! The current implementation is based on
//!
//! [PKWARE's APPNOTE.TXT v6.3.10](https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT)
//!
//! ## Features
//!
//! Feature      | Description
//! -------------|------
//! experimental | [uncompress::ArchiveReader], to read back a store-only archive
//!
//! ## Examples
//!
//! Build an archive in one call:
//!
//!```rust
//! use storezip::error::ArchiveError;
//!
//! fn main() -> Result<(), ArchiveError> {
//!     let archive = storezip::build([
//!         ("pack.json", r#"{"name":"My pack"}"#),
//!         ("mod_ids.json", "{}"),
//!     ])?;
//!
//!     assert_eq!(&archive[0..4], b"PK\x03\x04");
//!     Ok(())
//! }
//!```
//!
//! Or append entries one by one, with a fixed date for reproducible output, and write the
//! result to any [std::io::Write]:
//!
//!```rust
//! use storezip::{
//!     archive::{ArchiveOptions, ZipArchive},
//!     error::ArchiveError,
//!     types::{DateTimeCS, FileDateTime},
//! };
//!
//! fn main() -> Result<(), ArchiveError> {
//!     let options = ArchiveOptions::default()
//!         .last_modified_time(FileDateTime::Custom(DateTimeCS::new(2013, 1, 1, 0, 0, 0)));
//!
//!     let mut archive = ZipArchive::with_options(options);
//!     archive.append_file("file1.txt", "hello\n")?;
//!     archive.append_file("file2.txt", "world\n")?;
//!
//!     let (size, bytes) = archive.finalize_into(Vec::new())?;
//!     assert_eq!(size, bytes.len() as u64);
//!     Ok(())
//! }
//!```

mod constants;

mod archive_common;
pub mod archive;
pub mod crc;
pub mod error;
pub mod tools;
pub mod types;
#[cfg(feature = "experimental")]
pub mod uncompress;

pub use archive::{build, build_with_options};
pub use archive_common::CentralDirectoryEnd;
pub use types::Entry;
