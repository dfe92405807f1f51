use crate::error::MediaError;

/// Inclusive byte range `[start, end]` within a file
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Parse a `Range` header value of the form `bytes=<start>-[<end>]`.
    ///
    /// Suffix ranges and multiple ranges are not accepted. A missing `end`
    /// means the last byte of the file.
    pub fn parse(header: &str, file_size: u64) -> Result<Self, MediaError> {
        let spec = header
            .trim()
            .strip_prefix("bytes=")
            .ok_or(MediaError::RangeUnparsable)?;
        let (start, end) = spec.split_once('-').ok_or(MediaError::RangeUnparsable)?;

        let start = parse_digits(start).ok_or(MediaError::RangeUnparsable)?;
        let end = if end.is_empty() {
            None
        } else {
            Some(parse_digits(end).ok_or(MediaError::RangeUnparsable)?)
        };

        let unsatisfiable = MediaError::RangeUnsatisfiable { size: file_size };
        let Some(last) = file_size.checked_sub(1) else {
            return Err(unsatisfiable);
        };
        let end = end.unwrap_or(last);

        if start > last || end > last || start > end {
            return Err(unsatisfiable);
        }

        Ok(Self { start, end })
    }

    pub fn content_range(&self, file_size: u64) -> String {
        format!("bytes {}-{}/{file_size}", self.start, self.end)
    }
}

fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
