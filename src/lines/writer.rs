use super::{LinesError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const WRITE_BUFFER_BYTES: usize = 64 * 1024;

/// Buffered writer that terminates every line with `\n`
pub struct LineWriter<W: Write> {
    inner: BufWriter<W>,
}

impl<W: Write> LineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: BufWriter::with_capacity(WRITE_BUFFER_BYTES, writer),
        }
    }

    /// Write all lines, then flush
    pub fn write_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<()> {
        for line in lines {
            self.put(line.as_ref())?;
        }
        self.inner.flush()?;
        Ok(())
    }

    /// Write one line, then flush
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.put(line)?;
        self.inner.flush()?;
        Ok(())
    }

    fn put(&mut self, line: &str) -> Result<()> {
        self.inner.write_all(line.as_bytes())?;
        self.inner.write_all(b"\n")?;
        Ok(())
    }

    /// Underlying writer, after flushing
    pub fn into_inner(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| LinesError::Io(e.into_error()))
    }
}

/// Create or truncate `path` and write `lines` to it
pub fn write_file_lines<S: AsRef<str>>(path: impl AsRef<Path>, lines: &[S]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| LinesError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    LineWriter::new(file).write_lines(lines)
}
