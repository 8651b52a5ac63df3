//! Splitting a finished answer into stream-sized pieces

/// Split `text` into pieces of `size` characters.
///
/// Counts `char`s, so multi-byte characters are never cut. The last piece
/// may be shorter. Empty input gives no pieces; a `size` of 0 is treated
/// as 1.
pub fn chunk_text(text: &str, size: usize) -> Vec<String> {
    let size = size.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(size).map(|chunk| chunk.iter().collect()).collect()
}
