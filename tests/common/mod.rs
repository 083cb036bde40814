// Shared helpers for integration tests: temp trees and an in-memory lister
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use jellyfin_organizer::config::OrganizerConfig;
use jellyfin_organizer::listing::{sort_entries, DirectoryEntry, DirectoryLister, FsLister};
use jellyfin_organizer::organizer::Organizer;
use jellyfin_organizer::plan::Plan;

pub fn touch(root: &Path, rel: &str) -> Result<PathBuf> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, b"")?;
    Ok(path)
}

pub fn mkdir(root: &Path, rel: &str) -> Result<PathBuf> {
    let path = root.join(rel);
    fs::create_dir_all(&path)?;
    Ok(path)
}

pub fn fs_organizer() -> Organizer<FsLister> {
    Organizer::new(OrganizerConfig::default(), FsLister).unwrap()
}

/// (original name, target name) for every file operation, in plan order.
pub fn renames(plan: &Plan) -> Vec<(String, String)> {
    plan.operations()
        .into_iter()
        .map(|op| (op.original_name(), op.target_name.clone()))
        .collect()
}

/// In-memory directory tree: path -> is_dir.
#[derive(Debug, Default, Clone)]
pub struct MemoryTree {
    nodes: BTreeMap<PathBuf, bool>,
}

impl MemoryTree {
    pub fn new(root: &str) -> Self {
        let mut tree = Self::default();
        tree.add_dir(root);
        tree
    }

    pub fn add_dir(&mut self, path: &str) -> &mut Self {
        self.insert(PathBuf::from(path), true);
        self
    }

    pub fn add_file(&mut self, path: &str) -> &mut Self {
        self.insert(PathBuf::from(path), false);
        self
    }

    fn insert(&mut self, path: PathBuf, is_dir: bool) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.nodes.entry(ancestor.to_path_buf()).or_insert(true);
        }
        self.nodes.insert(path, is_dir);
    }

    pub fn exists(&self, path: &str) -> bool {
        self.nodes.contains_key(Path::new(path))
    }

    /// Applies a plan the way the generated apply script does: file moves
    /// that never overwrite, then guarded folder renames deepest first.
    pub fn apply(&mut self, plan: &Plan) {
        for op in plan.operations() {
            if let Some(folder) = op.season_folder() {
                self.nodes.entry(folder).or_insert(true);
            }
            let destination = op.destination();
            if !self.nodes.contains_key(&destination) && self.nodes.remove(&op.source).is_some() {
                self.nodes.insert(destination, false);
            }
        }

        for rename in plan.folder_renames() {
            let destination = rename.destination();
            if self.nodes.contains_key(&destination) {
                continue;
            }
            let moved: Vec<(PathBuf, bool)> = self
                .nodes
                .iter()
                .filter(|(path, _)| path.starts_with(&rename.source))
                .map(|(path, is_dir)| (path.clone(), *is_dir))
                .collect();
            for (path, is_dir) in moved {
                self.nodes.remove(&path);
                let rest = path.strip_prefix(&rename.source).unwrap_or(Path::new(""));
                self.nodes.insert(destination.join(rest), is_dir);
            }
        }
    }
}

impl DirectoryLister for MemoryTree {
    fn list(&self, dir: &Path) -> Result<Vec<DirectoryEntry>> {
        match self.nodes.get(dir) {
            Some(true) => {}
            _ => return Err(anyhow!("not a directory: {}", dir.display())),
        }

        let mut entries: Vec<DirectoryEntry> = self
            .nodes
            .iter()
            .filter(|(path, _)| path.parent() == Some(dir))
            .map(|(path, is_dir)| DirectoryEntry::new(path.clone(), *is_dir))
            .collect();
        sort_entries(&mut entries);
        Ok(entries)
    }
}

impl DirectoryLister for &MemoryTree {
    fn list(&self, dir: &Path) -> Result<Vec<DirectoryEntry>> {
        (**self).list(dir)
    }
}
