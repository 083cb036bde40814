use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::script::ScriptDialect;

pub const DEFAULT_VIDEO_EXTENSIONS: [&str; 6] = ["mkv", "mp4", "avi", "m4v", "iso", "wmv"];

pub const DEFAULT_FOLDER_IGNORE_KEYWORDS: [&str; 7] = [
    "RAZOR",
    "THE PLAN",
    "CONQUEST",
    "EXTRAS",
    "SPECIALS",
    "FEATURETTES",
    "SAMPLE",
];

pub const DEFAULT_FILE_IGNORE_KEYWORDS: [&str; 3] = ["[IGNORE]", "SAMPLE", "TRAILER"];

/// Keyword and extension tables driving classification.
///
/// Every field can be overridden from a JSON file; fields missing from the
/// file keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizerConfig {
    pub video_extensions: Vec<String>,
    pub folder_ignore_keywords: Vec<String>,
    pub file_ignore_keywords: Vec<String>,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            video_extensions: DEFAULT_VIDEO_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            folder_ignore_keywords: DEFAULT_FOLDER_IGNORE_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            file_ignore_keywords: DEFAULT_FILE_IGNORE_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl OrganizerConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        Ok(config.normalized())
    }

    /// Lower-cases extensions and strips any leading dot so lookups can
    /// compare against `Path::extension` directly.
    fn normalized(mut self) -> Self {
        self.video_extensions = self
            .video_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }

    pub fn is_video_extension(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.video_extensions.iter().any(|ext| *ext == extension)
    }
}

/// How the target directory should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeOverride {
    #[default]
    Auto,
    Show,
    Library,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target: PathBuf,
    pub dialect: ScriptDialect,
    pub output_dir: PathBuf,
    pub mode: ModeOverride,
    pub write_undo: bool,
    pub plan_json: Option<PathBuf>,
    pub organizer: OrganizerConfig,
}

pub struct ConfigBuilder {
    target: Option<PathBuf>,
    dialect: Option<ScriptDialect>,
    output_dir: Option<PathBuf>,
    mode: ModeOverride,
    write_undo: bool,
    plan_json: Option<PathBuf>,
    organizer: Option<OrganizerConfig>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            target: None,
            dialect: None,
            output_dir: None,
            mode: ModeOverride::Auto,
            write_undo: true,
            plan_json: None,
            organizer: None,
        }
    }

    pub fn target<P: AsRef<Path>>(mut self, target: P) -> Self {
        self.target = Some(target.as_ref().to_path_buf());
        self
    }

    pub fn dialect(mut self, dialect: ScriptDialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    pub fn output_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.output_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn mode(mut self, mode: ModeOverride) -> Self {
        self.mode = mode;
        self
    }

    pub fn write_undo(mut self, write_undo: bool) -> Self {
        self.write_undo = write_undo;
        self
    }

    pub fn plan_json(mut self, path: Option<PathBuf>) -> Self {
        self.plan_json = path;
        self
    }

    pub fn organizer(mut self, organizer: OrganizerConfig) -> Self {
        self.organizer = Some(organizer);
        self
    }

    pub fn build(self) -> Result<RunConfig> {
        let target = self
            .target
            .ok_or_else(|| anyhow::anyhow!("Target path is required"))?;

        if !target.exists() {
            anyhow::bail!("Path not found: {}", target.display());
        }
        if !target.is_dir() {
            anyhow::bail!("Not a directory: {}", target.display());
        }

        // Plan paths are recorded verbatim in the scripts, so make them absolute.
        let target = target
            .canonicalize()
            .with_context(|| format!("Failed to resolve path: {}", target.display()))?;

        Ok(RunConfig {
            target,
            dialect: self.dialect.unwrap_or_else(ScriptDialect::host),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from(".")),
            mode: self.mode,
            write_undo: self.write_undo,
            plan_json: self.plan_json,
            organizer: self.organizer.unwrap_or_default(),
        })
    }
}
