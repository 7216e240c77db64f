use std::io::{self, BufRead, BufReader, Read};

/// Protocol error types
#[derive(Debug)]
pub enum ProtocolError {
    Io(io::Error),
    LineTooLong(usize),
    InvalidUtf8,
}

impl From<io::Error> for ProtocolError {
    fn from(err: io::Error) -> Self {
        ProtocolError::Io(err)
    }
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Io(e) => write!(f, "IO error: {}", e),
            ProtocolError::LineTooLong(limit) => {
                write!(f, "Line exceeds {} bytes without a newline", limit)
            }
            ProtocolError::InvalidUtf8 => write!(f, "Line is not valid UTF-8"),
        }
    }
}

impl std::error::Error for ProtocolError {}

pub type Result<T> = std::result::Result<T, ProtocolError>;

pub const DEFAULT_MAX_LINE_LENGTH: usize = 4096;

/// Reads newline-terminated command lines and fixed-size binary chunks from
/// one byte stream.
///
/// Both reads share a single buffer, so a chunk that arrives in the same
/// segment as the preceding `VOICE` line is never lost.
pub struct LineReader<R: Read> {
    inner: BufReader<R>,
    max_line_length: usize,
}

impl<R: Read> LineReader<R> {
    pub fn new(stream: R) -> Self {
        Self::with_max_line_length(stream, DEFAULT_MAX_LINE_LENGTH)
    }

    pub fn with_max_line_length(stream: R, max_line_length: usize) -> Self {
        LineReader {
            inner: BufReader::new(stream),
            max_line_length,
        }
    }

    /// Reads up to the next `\n` and returns the line without the delimiter
    /// (a trailing `\r` is dropped too).
    ///
    /// Returns `Ok(None)` at end of stream. Bytes received before an end of
    /// stream without delimiter are returned as a final line.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = Vec::new();
        let limit = (self.max_line_length as u64).saturating_add(1);

        let read = (&mut self.inner).take(limit).read_until(b'\n', &mut line)?;
        if read == 0 {
            return Ok(None);
        }

        if line.last() == Some(&b'\n') {
            line.pop();
        } else if line.len() > self.max_line_length {
            return Err(ProtocolError::LineTooLong(self.max_line_length));
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        String::from_utf8(line)
            .map(Some)
            .map_err(|_| ProtocolError::InvalidUtf8)
    }

    /// Reads exactly `len` bytes. Returns `Ok(None)` if the stream ends first.
    pub fn read_chunk(&mut self, len: usize) -> Result<Option<Vec<u8>>> {
        let mut chunk = vec![0u8; len];
        match self.inner.read_exact(&mut chunk) {
            Ok(()) => Ok(Some(chunk)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(ProtocolError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(bytes: &[u8]) -> LineReader<Cursor<Vec<u8>>> {
        LineReader::new(Cursor::new(bytes.to_vec()))
    }

    #[test]
    fn test_read_lines_until_end_of_stream() {
        let mut reader = reader(b"REGISTER alice\nCALL bob\n");

        assert_eq!(reader.read_line().unwrap().as_deref(), Some("REGISTER alice"));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("CALL bob"));
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn test_blank_line_is_not_end_of_stream() {
        let mut reader = reader(b"\nHANGUP\n");

        assert_eq!(reader.read_line().unwrap().as_deref(), Some(""));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("HANGUP"));
    }

    #[test]
    fn test_carriage_return_is_stripped() {
        let mut reader = reader(b"ANSWER alice\r\n");
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("ANSWER alice"));
    }

    #[test]
    fn test_partial_line_before_end_of_stream() {
        let mut reader = reader(b"HANG");

        assert_eq!(reader.read_line().unwrap().as_deref(), Some("HANG"));
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn test_line_then_chunk_then_line_keeps_framing() {
        let mut bytes = b"VOICE\n".to_vec();
        bytes.extend_from_slice(&[b'\n'; 8]);
        bytes.extend_from_slice(b"HANGUP\n");
        let mut reader = LineReader::new(Cursor::new(bytes));

        assert_eq!(reader.read_line().unwrap().as_deref(), Some("VOICE"));
        // Payload bytes that look like delimiters are not lines
        assert_eq!(reader.read_chunk(8).unwrap(), Some(vec![b'\n'; 8]));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("HANGUP"));
    }

    #[test]
    fn test_truncated_chunk_is_absent() {
        let mut reader = reader(b"VOICE\nabc");

        reader.read_line().unwrap();
        assert_eq!(reader.read_chunk(1024).unwrap(), None);
    }

    #[test]
    fn test_line_too_long() {
        let mut reader = LineReader::with_max_line_length(Cursor::new(vec![b'x'; 64]), 16);
        assert!(matches!(
            reader.read_line(),
            Err(ProtocolError::LineTooLong(16))
        ));
    }

    #[test]
    fn test_line_at_limit_is_accepted() {
        let mut bytes = vec![b'x'; 16];
        bytes.push(b'\n');
        let mut reader = LineReader::with_max_line_length(Cursor::new(bytes), 16);

        assert_eq!(reader.read_line().unwrap().map(|l| l.len()), Some(16));
    }

    #[test]
    fn test_unbounded_limit_still_reads_lines() {
        let mut reader =
            LineReader::with_max_line_length(Cursor::new(b"HANGUP\n".to_vec()), usize::MAX);

        assert_eq!(reader.read_line().unwrap().as_deref(), Some("HANGUP"));
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn test_invalid_utf8() {
        let mut reader = reader(&[0xFF, 0xFE, b'\n']);
        assert!(matches!(reader.read_line(), Err(ProtocolError::InvalidUtf8)));
    }
}
