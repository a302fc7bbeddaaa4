/// Default chunk length, in characters.
pub const CHUNK_CHARS: usize = 1000;
/// Characters shared between consecutive chunks.
pub const CHUNK_OVERLAP: usize = 150;

/// Splits text into fixed-size character windows with overlap.
///
/// Windows are counted in `char`s, so multi-byte text never splits inside a
/// code point. The last window ends exactly at the end of the text.
pub fn chunk(text: &str, max_chars: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || max_chars == 0 {
        return Vec::new();
    }
    let overlap = overlap.min(max_chars - 1);

    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + max_chars).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start = end - overlap;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(chunk("Rust engineer", 1000, 150), vec!["Rust engineer"]);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(chunk("", 1000, 150).is_empty());
    }

    #[test]
    fn test_chunks_overlap() {
        let chunks = chunk("abcdefghij", 4, 1);
        assert_eq!(chunks, vec!["abcd", "defg", "ghij"]);
    }

    #[test]
    fn test_overlap_larger_than_window_still_advances() {
        let chunks = chunk("abcdef", 2, 5);
        assert_eq!(chunks, vec!["ab", "bc", "cd", "de", "ef"]);
    }

    #[test]
    fn test_multibyte_text_is_split_on_chars() {
        let chunks = chunk("ééééé", 3, 1);
        assert_eq!(chunks, vec!["ééé", "ééé"]);
    }
}
