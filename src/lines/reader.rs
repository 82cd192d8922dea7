use super::{LinesError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Longest line accepted unless configured otherwise
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

/// Reads `\n`-terminated lines from any reader
pub struct LineReader<R> {
    inner: BufReader<R>,
    max_line_bytes: usize,
    line: usize,
    buf: Vec<u8>,
}

impl<R: Read> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_max_line_bytes(reader, DEFAULT_MAX_LINE_BYTES)
    }

    pub fn with_max_line_bytes(reader: R, max_line_bytes: usize) -> Self {
        Self {
            inner: BufReader::new(reader),
            max_line_bytes: max_line_bytes.max(1),
            line: 0,
            buf: Vec::new(),
        }
    }

    /// Next line without its terminator, `None` at end of input
    pub fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();

        // Read at most one byte past the limit so oversized lines are caught
        // without buffering them whole.
        let limit = self.max_line_bytes as u64 + 1;
        let read = self
            .inner
            .by_ref()
            .take(limit)
            .read_until(b'\n', &mut self.buf)?;
        if read == 0 {
            return Ok(None);
        }
        self.line += 1;

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        } else if self.buf.len() > self.max_line_bytes {
            return Err(LinesError::LineTooLong {
                line: self.line,
                limit: self.max_line_bytes,
            });
        }
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }

        let text = std::str::from_utf8(&self.buf)
            .map_err(|_| LinesError::InvalidUtf8 { line: self.line })?;
        Ok(Some(text.to_owned()))
    }

    /// Every remaining line
    pub fn read_all_lines(&mut self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        while let Some(line) = self.next_line()? {
            lines.push(line);
        }
        Ok(lines)
    }

    /// Number of remaining lines; consumes them
    pub fn count_lines(&mut self) -> Result<usize> {
        let mut count = 0;
        while self.next_line()?.is_some() {
            count += 1;
        }
        Ok(count)
    }
}

/// Read every line of the file at `path`
pub fn read_file_lines(path: impl AsRef<Path>, max_line_bytes: usize) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LinesError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    LineReader::with_max_line_bytes(file, max_line_bytes).read_all_lines()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_all_lines() {
        let mut reader = LineReader::new(Cursor::new("alpha\nbeta\r\n\ngamma"));
        let lines = reader.read_all_lines().unwrap();
        assert_eq!(lines, vec!["alpha", "beta", "", "gamma"]);
    }

    #[test]
    fn test_trailing_newline_adds_no_empty_line() {
        let mut reader = LineReader::new(Cursor::new("one\ntwo\n"));
        assert_eq!(reader.count_lines().unwrap(), 2);
    }

    #[test]
    fn test_empty_input() {
        let mut reader = LineReader::new(Cursor::new(""));
        assert!(reader.read_all_lines().unwrap().is_empty());
    }

    #[test]
    fn test_line_at_limit_accepted() {
        let mut reader = LineReader::with_max_line_bytes(Cursor::new("abcd\nef"), 4);
        assert_eq!(reader.read_all_lines().unwrap(), vec!["abcd", "ef"]);
    }

    #[test]
    fn test_line_over_limit_rejected() {
        let mut reader = LineReader::with_max_line_bytes(Cursor::new("ok\ntoolong\n"), 4);
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("ok"));
        assert!(matches!(
            reader.next_line(),
            Err(LinesError::LineTooLong { line: 2, limit: 4 })
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut reader = LineReader::new(Cursor::new(vec![b'a', b'\n', 0xff, 0xfe]));
        assert!(matches!(
            reader.read_all_lines(),
            Err(LinesError::InvalidUtf8 { line: 2 })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = read_file_lines("/definitely/not/here.txt", DEFAULT_MAX_LINE_BYTES);
        assert!(matches!(result, Err(LinesError::Open { .. })));
    }
}
