use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::identity::SessionId;

/// File name the export is offered under for a given session.
pub fn export_file_name(session_id: &SessionId) -> String {
    format!("bitvoyager_metrics_{session_id}.json")
}

/// Hands a finished export document to the participant.
pub trait ExportSink: Send + Sync {
    /// Deliver `contents` under `file_name`, returning where it ended up.
    fn deliver(&self, file_name: &str, contents: &str) -> Result<PathBuf>;
}

/// Writes exports into a directory on disk.
#[derive(Debug, Clone)]
pub struct FileExporter {
    dir: PathBuf,
}

impl FileExporter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl ExportSink for FileExporter {
    fn deliver(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create export directory {}", self.dir.display()))?;
        let path = self.dir.join(file_name);
        fs::write(&path, contents)
            .with_context(|| format!("failed to write export to {}", path.display()))?;
        Ok(path)
    }
}
