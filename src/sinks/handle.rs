//! Line-oriented handle destinations: stdout, stderr, append-mode files

use crate::core::error::{LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// A human-readable output handle. Every line written through a handle gets a
/// trailing newline; memory and events destinations take the line as-is.
#[derive(Debug)]
pub enum LineHandle {
    Stdout,
    Stderr,
    File(BufWriter<File>),
}

impl LineHandle {
    /// Open `path` for appending, creating it if needed.
    pub fn file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| LoggerError::file_sink(path.display().to_string(), err.to_string()))?;
        Ok(LineHandle::File(BufWriter::new(file)))
    }

    pub(crate) fn write_line(&mut self, line: &str) -> Result<()> {
        match self {
            LineHandle::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(line.as_bytes())?;
                out.write_all(b"\n")?;
            }
            LineHandle::Stderr => {
                let mut out = io::stderr().lock();
                out.write_all(line.as_bytes())?;
                out.write_all(b"\n")?;
            }
            LineHandle::File(writer) => {
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    pub(crate) fn flush(&mut self) -> Result<()> {
        match self {
            LineHandle::Stdout => io::stdout().flush()?,
            LineHandle::Stderr => io::stderr().flush()?,
            LineHandle::File(writer) => writer.flush()?,
        }
        Ok(())
    }
}

impl Drop for LineHandle {
    fn drop(&mut self) {
        // Ensure buffered file output reaches disk
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_handle_appends_newline_framed_lines() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("lines.log");

        let mut handle = LineHandle::file(&path).expect("open file handle");
        handle.write_line("|0| first").expect("write");
        handle.write_line("|0| second").expect("write");
        handle.flush().expect("flush");

        let content = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(content, "|0| first\n|0| second\n");
    }

    #[test]
    fn file_handle_appends_to_existing_content() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("append.log");

        {
            let mut handle = LineHandle::file(&path).expect("open");
            handle.write_line("one").expect("write");
        }
        {
            let mut handle = LineHandle::file(&path).expect("reopen");
            handle.write_line("two").expect("write");
        }

        let content = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(content, "one\ntwo\n");
    }

    #[test]
    fn unopenable_path_reports_file_sink_error() {
        let err = LineHandle::file("/definitely/not/a/real/dir/x.log").unwrap_err();
        assert!(err.to_string().contains("file sink error"));
    }
}
