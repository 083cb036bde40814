use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::OrganizerConfig;

/// One immediate child of a directory, as seen by the organizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
    pub extension: Option<String>,
}

impl DirectoryEntry {
    pub fn new(path: PathBuf, is_dir: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = if is_dir {
            None
        } else {
            path.extension().map(|e| e.to_string_lossy().to_string())
        };

        Self {
            path,
            name,
            is_dir,
            extension,
        }
    }

    pub fn is_video(&self, config: &OrganizerConfig) -> bool {
        !self.is_dir
            && self
                .extension
                .as_deref()
                .is_some_and(|ext| config.is_video_extension(ext))
    }
}

/// Supplies the immediate children of a directory.
///
/// Implementations must return entries sorted by name in byte order; the
/// organizer relies on that for deterministic numbering.
pub trait DirectoryLister {
    fn list(&self, dir: &Path) -> Result<Vec<DirectoryEntry>>;
}

/// Lister backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLister;

impl DirectoryLister for FsLister {
    fn list(&self, dir: &Path) -> Result<Vec<DirectoryEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        {
            let entry =
                entry.with_context(|| format!("Failed to read entry in: {}", dir.display()))?;
            // Follows symlinks, like `Path::is_dir`.
            let is_dir = entry.path().is_dir();
            entries.push(DirectoryEntry::new(entry.path(), is_dir));
        }

        sort_entries(&mut entries);
        Ok(entries)
    }
}

pub fn sort_entries(entries: &mut [DirectoryEntry]) {
    entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_extension() {
        let file = DirectoryEntry::new(PathBuf::from("/tv/Show/ep1.MKV"), false);
        assert_eq!(file.name, "ep1.MKV");
        assert_eq!(file.extension.as_deref(), Some("MKV"));
        assert!(file.is_video(&OrganizerConfig::default()));

        let dir = DirectoryEntry::new(PathBuf::from("/tv/Show/Season.1.mkv"), true);
        assert_eq!(dir.extension, None);
        assert!(!dir.is_video(&OrganizerConfig::default()));
    }

    #[test]
    fn test_fs_lister_sorts_by_name() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("b.mkv"), "")?;
        fs::write(dir.path().join("a.mkv"), "")?;
        fs::write(dir.path().join("Z.mkv"), "")?;
        fs::create_dir(dir.path().join("Season 1"))?;

        let names: Vec<String> = FsLister
            .list(dir.path())?
            .into_iter()
            .map(|e| e.name)
            .collect();

        assert_eq!(names, vec!["Season 1", "Z.mkv", "a.mkv", "b.mkv"]);
        Ok(())
    }

    #[test]
    fn test_fs_lister_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FsLister.list(&dir.path().join("missing")).is_err());
    }
}
