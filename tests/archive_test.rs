use std::io::Cursor;

use storezip::{
    archive::ZipArchive, build_with_options, crc::crc32, error::ArchiveError,
    uncompress::ArchiveReader, Entry,
};

mod common;
use common::{
    all_byte_values, fixed_options, signature_positions, u16_at, u32_at,
    END_OF_CENTRAL_DIRECTORY_SIZE,
};

const LOCAL_SIGNATURE: u32 = 0x04034b50;
const CENTRAL_SIGNATURE: u32 = 0x02014b50;

#[test]
fn two_entries_scenario() -> Result<(), ArchiveError> {
    let archive = build_with_options([("a.txt", "hello"), ("b.txt", "")], &fixed_options())?;

    // a.txt: 30 + 5 + 5, b.txt: 30 + 5 + 0
    assert_eq!(signature_positions(&archive, LOCAL_SIGNATURE), vec![0, 40]);
    assert_eq!(signature_positions(&archive, CENTRAL_SIGNATURE), vec![75, 126]);

    let end = archive.len() - END_OF_CENTRAL_DIRECTORY_SIZE;
    assert_eq!(end, 177);
    assert_eq!(u16_at(&archive, end + 8), 2);
    assert_eq!(u16_at(&archive, end + 10), 2);
    assert_eq!(u32_at(&archive, end + 12), 51 + 51);
    assert_eq!(u32_at(&archive, end + 16), 75);
    assert_eq!(u16_at(&archive, end + 20), 0);

    let mut reader = ArchiveReader::new(Cursor::new(archive))?;
    println!("{}", reader);

    assert_eq!(
        reader
            .central_directory_end
            .total_number_of_entries_in_the_central_directory,
        2
    );

    let a = reader.file_entries[0].clone();
    let b = reader.file_entries[1].clone();

    assert_eq!("a.txt", a.get_file_name());
    assert_eq!(a.crc32, 0x3610A686);
    assert_eq!(reader.extract(&a)?, b"hello");

    assert_eq!("b.txt", b.get_file_name());
    assert_eq!(b.crc32, 0);
    assert!(reader.extract(&b)?.is_empty());

    Ok(())
}

#[test]
fn central_offsets_point_at_local_headers() -> Result<(), ArchiveError> {
    let entries = vec![
        Entry::new("first.json", "{\"name\":\"first\"}"),
        Entry::new("empty", ""),
        Entry::new("nested/dir/third.json", "[1,2,3]"),
        Entry::new("bytes.bin", vec![7u8; 300]),
    ];
    let archive = build_with_options(entries.clone(), &fixed_options())?;

    let local_positions = signature_positions(&archive, LOCAL_SIGNATURE);
    let reader = ArchiveReader::new(Cursor::new(archive))?;

    let recorded: Vec<usize> = reader
        .file_entries
        .iter()
        .map(|entry| entry.offset as usize)
        .collect();

    assert_eq!(recorded, local_positions);
    assert_eq!(recorded.len(), entries.len());

    Ok(())
}

#[test]
fn entry_count_matches_input() -> Result<(), ArchiveError> {
    for count in [0usize, 1, 3, 40] {
        let entries: Vec<Entry> = (0..count)
            .map(|i| Entry::new(format!("file{}.txt", i), format!("content {}", i)))
            .collect();

        let archive = build_with_options(entries, &fixed_options())?;
        let reader = ArchiveReader::new(Cursor::new(archive))?;

        assert_eq!(reader.file_entries.len(), count);
        assert_eq!(
            reader
                .central_directory_end
                .total_number_of_entries_on_this_disk as usize,
            count
        );
    }

    Ok(())
}

#[test]
fn order_is_preserved() -> Result<(), ArchiveError> {
    let names = ["zeta.txt", "alpha.txt", "mid.txt", "0.txt"];
    let mut archive = ZipArchive::with_options(fixed_options());
    for name in names {
        archive.append_file(name, name)?;
    }

    let bytes = archive.finalize()?;

    let local_names: Vec<&[u8]> = signature_positions(&bytes, LOCAL_SIGNATURE)
        .into_iter()
        .map(|position| {
            let len = u16_at(&bytes, position + 26) as usize;
            &bytes[position + 30..position + 30 + len]
        })
        .collect();
    let expected: Vec<&[u8]> = names.iter().map(|name| name.as_bytes()).collect();
    assert_eq!(local_names, expected);

    let mut reader = ArchiveReader::new(Cursor::new(bytes.clone()))?;
    let central_names: Vec<String> = reader
        .extract_all()?
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    assert_eq!(central_names, names);

    Ok(())
}

#[test]
fn checksum_depends_on_content_only() -> Result<(), ArchiveError> {
    let content = all_byte_values();
    let archive = build_with_options(
        [
            ("x.bin", content.clone()),
            ("other/name.bin", content.clone()),
        ],
        &fixed_options(),
    )?;

    let reader = ArchiveReader::new(Cursor::new(archive))?;
    for entry in &reader.file_entries {
        assert_eq!(entry.crc32, crc32(&content));
        assert_eq!(entry.compressed_size, entry.uncompressed_size);
        assert_eq!(entry.compression_method, 0);
    }

    Ok(())
}

#[test]
fn building_twice_gives_same_bytes() -> Result<(), ArchiveError> {
    let entries = vec![
        Entry::new("pack.json", "{\"name\":\"Pack\"}"),
        Entry::new("blocks.json", all_byte_values()),
    ];

    let first = build_with_options(entries.clone(), &fixed_options())?;
    let second = build_with_options(entries, &fixed_options())?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn invalid_name_writes_nothing() {
    let mut archive = ZipArchive::with_options(fixed_options());
    archive.append_file("kept.txt", "kept").unwrap();

    let res = archive.append_file(&"x".repeat(256), "lost");
    match res {
        Err(ArchiveError::InvalidEntryName { name, .. }) => assert_eq!(name.len(), 256),
        other => panic!("expected an invalid name error, got {:?}", other),
    }

    assert_eq!(archive.len(), 1);
}
