//! HTTP `Range` header parsing.

use crate::error::{Result, VidlibError};

/// An inclusive byte window `[start, end]`. Never empty: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    start: u64,
    end: u64,
}

impl ByteRange {
    /// Window from `start` to `end` inclusive. `None` if `end < start`.
    pub fn new(start: u64, end: u64) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of bytes in the window, at least one.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value for a file of `size` bytes.
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

const PREFIX: &str = "bytes=";

/// Parse a `Range` header against a file of `size` bytes.
///
/// Every comma-separated segment is parsed and validated; callers serve only
/// the first. Blank segments are ignored.
pub fn parse_range(header: &str, size: u64) -> Result<Vec<ByteRange>> {
    let malformed = || VidlibError::MalformedRange(header.to_string());

    let list = header.strip_prefix(PREFIX).ok_or_else(malformed)?;

    let mut ranges = Vec::new();
    for segment in list.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let (start, end) = segment.split_once('-').ok_or_else(malformed)?;
        let (start, end) = (start.trim(), end.trim());

        let range = if start.is_empty() {
            // suffix form: the last N bytes
            let suffix: u64 = end.parse().map_err(|_| malformed())?;
            let suffix = suffix.min(size);
            if suffix == 0 {
                return Err(malformed());
            }
            ByteRange {
                start: size - suffix,
                end: size - 1,
            }
        } else {
            let start: u64 = start.parse().map_err(|_| malformed())?;
            if start >= size {
                return Err(malformed());
            }
            let end = if end.is_empty() {
                size - 1
            } else {
                let end: u64 = end.parse().map_err(|_| malformed())?;
                if end < start {
                    return Err(malformed());
                }
                end.min(size - 1)
            };
            ByteRange { start, end }
        };

        ranges.push(range);
    }

    if ranges.is_empty() {
        return Err(malformed());
    }

    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u64, end: u64) -> ByteRange {
        ByteRange::new(start, end).unwrap()
    }

    fn one(header: &str, size: u64) -> ByteRange {
        let ranges = parse_range(header, size).unwrap();
        assert_eq!(ranges.len(), 1, "{header}");
        ranges[0]
    }

    #[test]
    fn test_explicit_range() {
        let r = one("bytes=0-99", 1000);
        assert_eq!(r, range(0, 99));
        assert_eq!(r.len(), 100);
        assert_eq!(r.content_range(1000), "bytes 0-99/1000");
    }

    #[test]
    fn test_open_ended_range() {
        assert_eq!(one("bytes=500-", 1000), range(500, 999));
    }

    #[test]
    fn test_suffix_range() {
        assert_eq!(one("bytes=-50", 1000), range(950, 999));
        // longer than the file: the whole file
        assert_eq!(one("bytes=-5000", 1000), range(0, 999));
    }

    #[test]
    fn test_end_is_clamped() {
        assert_eq!(one("bytes=900-5000", 1000), range(900, 999));
    }

    #[test]
    fn test_whitespace_is_tolerated() {
        assert_eq!(one("bytes= 10 - 20 ", 1000), range(10, 20));
    }

    #[test]
    fn test_multiple_ranges_are_all_parsed() {
        let ranges = parse_range("bytes=0-9, 20-29,,-5", 100).unwrap();
        assert_eq!(
            ranges,
            vec![
                range(0, 9),
                range(20, 29),
                range(95, 99),
            ]
        );
    }

    #[test]
    fn test_malformed_headers() {
        for header in [
            "",
            "0-99",
            "items=0-99",
            "bytes=",
            "bytes=,",
            "bytes=abc",
            "bytes=a-b",
            "bytes=10-x",
            "bytes=-x",
            "bytes=--5",
            "bytes=0-9,junk",
        ] {
            let err = parse_range(header, 1000).unwrap_err();
            assert!(matches!(err, VidlibError::MalformedRange(_)), "{header}");
        }
    }

    #[test]
    fn test_unsatisfiable_ranges() {
        assert!(parse_range("bytes=2000-3000", 1000).is_err());
        assert!(parse_range("bytes=1000-", 1000).is_err());
        assert!(parse_range("bytes=50-10", 1000).is_err());
        assert!(parse_range("bytes=-0", 1000).is_err());
        assert!(parse_range("bytes=0-0", 0).is_err());
        assert!(parse_range("bytes=-10", 0).is_err());
    }

    #[test]
    fn test_last_byte() {
        assert_eq!(one("bytes=999-999", 1000), range(999, 999));
        assert_eq!(one("bytes=-1", 1000).len(), 1);
    }

    #[test]
    fn test_new_rejects_inverted_window() {
        assert!(ByteRange::new(10, 9).is_none());
        let r = range(7, 7);
        assert_eq!((r.start(), r.end(), r.len()), (7, 7, 1));
    }
}
