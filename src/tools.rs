use crate::constants::{
    CENTRAL_DIRECTORY_ENTRY_BASE_SIZE, END_OF_CENTRAL_DIRECTORY_SIZE, FILE_HEADER_BASE_SIZE,
};

/// Calculate the exact size of a store-only archive from the byte length of
/// each entry's name and content.
///
/// ## Example
///
/// ```
/// use storezip::tools::archive_size;
///
/// assert_eq!(
///     archive_size([
///         ("file1.txt".len(), b"hello\n".len() as u64),
///         ("file2.txt".len(), b"world\n".len() as u64),
///     ]),
///     222,
/// );
/// ```
pub fn archive_size<I: IntoIterator<Item = (usize, u64)>>(files: I) -> u64 {
    files
        .into_iter()
        .map(|(name_len, size)| {
            (FILE_HEADER_BASE_SIZE + name_len + CENTRAL_DIRECTORY_ENTRY_BASE_SIZE + name_len)
                as u64
                + size
        })
        .sum::<u64>()
        + END_OF_CENTRAL_DIRECTORY_SIZE as u64
}

/// Size of the central directory alone.
pub fn central_directory_size<I: IntoIterator<Item = usize>>(name_lengths: I) -> u64 {
    name_lengths
        .into_iter()
        .map(|name_len| (CENTRAL_DIRECTORY_ENTRY_BASE_SIZE + name_len) as u64)
        .sum()
}
