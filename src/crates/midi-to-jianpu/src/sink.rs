use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jianpu_core::OutputSink;

/// Writes the rendered text to a file, truncating whatever was there
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for FileSink {
    type Error = io::Error;

    fn set_output(&mut self, text: &str) -> Result<(), Self::Error> {
        fs::write(&self.path, text)
    }
}

/// Prints the rendered text to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    type Error = io::Error;

    fn set_output(&mut self, text: &str) -> Result<(), Self::Error> {
        use std::io::Write;

        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    }
}
