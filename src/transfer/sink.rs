use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

/// Receives finished export documents, e.g. a download prompt or a folder on disk.
pub trait ExportSink {
    fn save(&self, file_name: &str, contents: &str) -> Result<()>;
}

/// Writes exports as files inside one directory, creating it on first use.
pub struct DirectoryExportSink {
    dir: PathBuf,
}

impl DirectoryExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportSink for DirectoryExportSink {
    fn save(&self, file_name: &str, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create export directory {}", self.dir.display()))?;
        let path = self.dir.join(file_name);
        fs::write(&path, contents)
            .with_context(|| format!("failed to write export to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_into_created_directory() {
        let dir = tempdir().unwrap();
        let sink = DirectoryExportSink::new(dir.path().join("exports"));
        sink.save("demo.json", "{}").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("exports").join("demo.json")).unwrap(),
            "{}"
        );
    }
}
