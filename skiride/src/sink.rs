//! Durable, line-oriented record sinks
use skiride_core::LatencyRecord;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Destination for completed latency records.
pub trait RecordSink: Send + Sync {
    fn append(&self, record: &LatencyRecord, method: &str) -> io::Result<()>;
}

/// Appends one CSV line per record; the file is opened and closed on every write.
#[derive(Clone, Debug)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for CsvFileSink {
    fn append(&self, record: &LatencyRecord, method: &str) -> io::Result<()> {
        let line = record
            .to_csv_line(method)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // One write per line keeps concurrent appends from interleaving.
        file.write_all(line.as_bytes())
    }
}
