//! Reading documents, queries and stopwords from disk.

use crate::config::Encoding;
use crate::error::{Error, Result};
use crate::normalizer::Stopwords;
use std::fs;
use std::io;
use std::path::Path;

/// Decode raw file bytes. Invalid input for the encoding is `InvalidData`.
pub fn decode(bytes: &[u8], encoding: Encoding) -> io::Result<String> {
    match encoding {
        Encoding::Utf8 => {
            let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            String::from_utf8(bytes.to_vec()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        }
        Encoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        Encoding::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
            Some(offset) => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("byte 0x{:02x} at offset {offset} is not US-ASCII", bytes[offset]),
            )),
            None => Ok(bytes.iter().map(|&b| b as char).collect()),
        },
    }
}

pub fn read_text(path: &Path, encoding: Encoding) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::reading(path, e))?;
    decode(&bytes, encoding).map_err(|e| Error::reading(path, e))
}

/// Split on `\r\n`, `\n` or a lone `\r`. A final terminator does not start
/// another line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(|c: char| c == '\r' || c == '\n') {
            Some(end) => {
                lines.push(&rest[..end]);
                let skip = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + skip..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}

/// One trimmed record per line. Empty lines are kept as empty records.
pub fn load_lines(path: &Path, encoding: Encoding) -> Result<Vec<String>> {
    let text = read_text(path, encoding)?;
    let lines: Vec<String> = split_lines(&text).into_iter().map(|line| line.trim().to_string()).collect();
    tracing::info!(path = %path.display(), %encoding, records = lines.len(), "loaded records");
    Ok(lines)
}

/// Comma-separated stopwords on any number of lines.
pub fn parse_stopwords(text: &str) -> Stopwords {
    split_lines(text)
        .into_iter()
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .collect()
}

pub fn load_stopwords(path: &Path, encoding: Encoding) -> Result<Stopwords> {
    let stopwords = parse_stopwords(&read_text(path, encoding)?);
    tracing::info!(path = %path.display(), count = stopwords.len(), "loaded stopwords");
    Ok(stopwords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::StopwordFilter;

    #[test]
    fn stopwords_are_unioned_across_lines() {
        let sw = parse_stopwords("the, and,of\nan,the\n\n, ,in");
        assert_eq!(sw.len(), 5);
        for word in ["the", "and", "of", "an", "in"] {
            assert!(sw.is_stopword(word), "{word}");
        }
        assert!(!sw.is_stopword(""));
    }

    #[test]
    fn every_line_terminator_ends_a_record() {
        assert_eq!(split_lines("a\rb\r\nc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n\n\rb\r"), vec!["a", "", "", "b"]);
        assert!(split_lines("").is_empty());
        assert_eq!(parse_stopwords("the\rand,of").len(), 3);
    }

    #[test]
    fn utf8_bom_is_dropped() {
        assert_eq!(decode(b"\xEF\xBB\xBFcaf\xC3\xA9", Encoding::Utf8).unwrap(), "café");
    }

    #[test]
    fn latin1_maps_bytes_to_code_points() {
        assert_eq!(decode(b"caf\xE9", Encoding::Latin1).unwrap(), "café");
    }

    #[test]
    fn invalid_bytes_are_rejected() {
        assert_eq!(decode(b"caf\xE9", Encoding::Utf8).unwrap_err().kind(), io::ErrorKind::InvalidData);
        assert_eq!(decode(b"caf\xE9", Encoding::Ascii).unwrap_err().kind(), io::ErrorKind::InvalidData);
    }
}
