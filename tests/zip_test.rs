use std::io::{Cursor, Read};

use storezip::{archive::ZipArchive, build_with_options, error::ArchiveError, Entry};
use tempfile::TempDir;

mod common;
use common::{all_byte_values, create_new_clean_file, fixed_options, open};

fn round_trip_entries() -> Vec<Entry> {
    vec![
        Entry::new("pack.json", r#"{"name":"My Pack","data":["mod_ids.json"]}"#),
        Entry::new("empty.txt", ""),
        Entry::new("all_bytes.bin", all_byte_values()),
        Entry::new("dir/sub/deep.json", "{}".repeat(2048)),
    ]
}

fn check_with_zip_crate<R: Read + std::io::Seek>(reader: R, expected: &[Entry]) {
    let mut zip = zip::ZipArchive::new(reader).unwrap();

    assert_eq!(zip.len(), expected.len());

    for (i, entry) in expected.iter().enumerate() {
        let mut file = zip.by_index(i).unwrap();

        assert_eq!(file.name(), entry.name);
        assert_eq!(file.compression(), zip::CompressionMethod::Stored);
        assert_eq!(file.size(), entry.content.len() as u64);
        assert_eq!(file.compressed_size(), entry.content.len() as u64);
        assert_eq!(file.crc32(), crc32fast::hash(&entry.content));

        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        assert_eq!(content, entry.content);
    }
}

#[test]
fn read_by_zip_crate() {
    let entries = round_trip_entries();
    let archive = build_with_options(entries.clone(), &fixed_options()).unwrap();

    check_with_zip_crate(Cursor::new(archive), &entries);
}

#[test]
fn date_read_by_zip_crate() {
    let archive = build_with_options([("a.txt", "hello")], &fixed_options()).unwrap();
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    let file = zip.by_index(0).unwrap();

    let last_modified = file.last_modified();
    assert_eq!(last_modified.year(), 2013);
    assert_eq!(last_modified.month(), 8);
    assert_eq!(last_modified.day(), 21);
    assert_eq!(last_modified.hour(), 0);
    assert_eq!(last_modified.minute(), 0);
}

#[test]
fn empty_archive_read_by_zip_crate() {
    let archive = build_with_options(Vec::<Entry>::new(), &fixed_options()).unwrap();
    let zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();

    assert_eq!(zip.len(), 0);
}

#[test]
fn archive_file_on_disk() {
    let dir = TempDir::new().unwrap();
    let (out_file, out_path) = create_new_clean_file(&dir, "mypack.zip");

    let entries = round_trip_entries();
    let mut archive = ZipArchive::with_options(fixed_options());
    for entry in entries.iter().cloned() {
        archive.append(entry).unwrap();
    }
    let predicted = archive.archive_size();

    let (archive_size, _out_file) = archive.finalize_into(out_file).unwrap();
    assert_eq!(archive_size, predicted);

    let on_disk = std::fs::metadata(&out_path).unwrap().len();
    assert_eq!(on_disk, archive_size);

    check_with_zip_crate(open(&out_path), &entries);
}

#[test]
fn ascii_punctuation_names_read_by_zip_crate() {
    let entries = vec![
        Entry::new("my pack (v2)/mod_ids.json", "{}"),
        Entry::new("~weird#name!@$%&+=,;[]{}'.txt", "x"),
    ];
    let archive = build_with_options(entries.clone(), &fixed_options()).unwrap();

    check_with_zip_crate(Cursor::new(archive), &entries);
}

#[test]
fn non_ascii_names_are_rejected() {
    // CP437 readers would turn "caf\u{e9}" into "caf\u{398}"
    for name in ["caf\u{e9}", "\u{263a}.txt", "na\u{ef}ve/\u{fc}ber.json"] {
        let res = build_with_options([(name, "y")], &fixed_options());

        match res {
            Err(ArchiveError::InvalidEntryName { name: rejected, .. }) => {
                assert_eq!(rejected, name)
            }
            other => panic!("expected {:?} to be rejected, got {:?}", name, other),
        }
    }
}
