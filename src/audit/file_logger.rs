use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{AuditEvent, AuditSubscriber};

/// Default sink: appends each event's message plus a newline to a durable log.
pub struct FileLogger {
    path: PathBuf,
}

impl FileLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }
}

impl AuditSubscriber for FileLogger {
    fn name(&self) -> &str { "file_logger" }

    fn on_event(&self, event: &AuditEvent) -> anyhow::Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open audit log {}", self.path.display()))?;
        let line = format!("{}\n", event.message);
        f.write_all(line.as_bytes())
            .with_context(|| format!("append audit log {}", self.path.display()))?;
        Ok(())
    }
}
