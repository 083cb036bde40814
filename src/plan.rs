use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::listing::DirectoryEntry;

/// Canonical season folder name, e.g. `Season 2`.
pub fn season_folder_name(season: u32) -> String {
    format!("Season {season}")
}

/// Canonical disc folder name, e.g. `S2D1`.
pub fn disc_folder_name(season: u32, disc: u32) -> String {
    format!("S{season}D{disc}")
}

/// Canonical episode file name, e.g. `S02E03.mkv`. The extension keeps its
/// original case.
pub fn episode_file_name(season: u32, episode: u32, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("S{season:02}E{episode:02}.{ext}"),
        None => format!("S{season:02}E{episode:02}"),
    }
}

/// A planned move of one video file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameOperation {
    pub source: PathBuf,
    pub target_name: String,
    pub season: u32,
    pub episode: u32,
    /// The file sits at the show root and moves into a season folder that
    /// the apply script has to create.
    pub is_root_move: bool,
}

impl RenameOperation {
    pub fn original_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    fn parent(&self) -> &Path {
        self.source.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Folder the apply script must create before moving, for root moves.
    pub fn season_folder(&self) -> Option<PathBuf> {
        self.is_root_move
            .then(|| self.parent().join(season_folder_name(self.season)))
    }

    pub fn destination(&self) -> PathBuf {
        match self.season_folder() {
            Some(folder) => folder.join(&self.target_name),
            None => self.parent().join(&self.target_name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FolderKind {
    Season,
    Disc,
}

/// A planned rename of an existing season or disc folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRename {
    pub source: PathBuf,
    pub target_name: String,
    pub kind: FolderKind,
}

impl FolderRename {
    pub fn destination(&self) -> PathBuf {
        self.source
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&self.target_name)
    }

    pub fn depth(&self) -> usize {
        self.source.components().count()
    }
}

/// Something the organizer resolved on its own that the user should know about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Conflict {
    /// Two folders map to the same season; the later one in sort order is used.
    SeasonCollision {
        season: u32,
        kept: String,
        displaced: String,
    },
    /// Two folders map to the same disc of a season.
    DiscCollision {
        season: u32,
        disc: u32,
        kept: String,
        displaced: String,
    },
    /// A file would land on a path already claimed earlier in this run.
    DuplicateTarget { source: PathBuf, target: PathBuf },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::SeasonCollision {
                season,
                kept,
                displaced,
            } => write!(
                f,
                "'{displaced}' and '{kept}' both look like season {season}; using '{kept}'"
            ),
            Conflict::DiscCollision {
                season,
                disc,
                kept,
                displaced,
            } => write!(
                f,
                "'{displaced}' and '{kept}' both look like season {season} disc {disc}; using '{kept}'"
            ),
            Conflict::DuplicateTarget { source, target } => write!(
                f,
                "skipping '{}': '{}' is already taken",
                source.display(),
                target.display()
            ),
        }
    }
}

/// Where the files of a season come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonSource {
    /// An existing folder under the show.
    ExistingFolder(PathBuf),
    /// Loose video files at the show root; the season folder does not exist yet.
    SyntheticRoot(Vec<PathBuf>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscPlan {
    pub number: u32,
    pub folder: PathBuf,
    pub folder_name: String,
    pub rename: Option<FolderRename>,
    pub operations: Vec<RenameOperation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonPlan {
    pub number: u32,
    pub source: SeasonSource,
    pub rename: Option<FolderRename>,
    /// Operations for files directly in the season scope, in processing order.
    pub operations: Vec<RenameOperation>,
    pub discs: Vec<DiscPlan>,
}

impl SeasonPlan {
    pub fn folder_name(&self) -> Option<String> {
        match &self.source {
            SeasonSource::ExistingFolder(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string()),
            SeasonSource::SyntheticRoot(_) => None,
        }
    }

    /// Direct files first, then discs in ascending order.
    pub fn all_operations(&self) -> impl Iterator<Item = &RenameOperation> {
        self.operations
            .iter()
            .chain(self.discs.iter().flat_map(|d| d.operations.iter()))
    }

    pub fn folder_renames(&self) -> impl Iterator<Item = &FolderRename> {
        self.rename
            .iter()
            .chain(self.discs.iter().filter_map(|d| d.rename.as_ref()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowPlan {
    pub name: String,
    pub path: PathBuf,
    pub seasons: Vec<SeasonPlan>,
    pub conflicts: Vec<Conflict>,
}

impl ShowPlan {
    pub fn operations(&self) -> impl Iterator<Item = &RenameOperation> {
        self.seasons.iter().flat_map(|s| s.all_operations())
    }

    pub fn folder_renames(&self) -> impl Iterator<Item = &FolderRename> {
        self.seasons.iter().flat_map(|s| s.folder_renames())
    }

    pub fn operation_count(&self) -> usize {
        self.operations().count()
    }

    /// Whether anything in this show would be touched by the apply script.
    pub fn has_changes(&self) -> bool {
        self.operations().next().is_some() || self.folder_renames().next().is_some()
    }
}

/// The full result of a planning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub root: PathBuf,
    pub shows: Vec<ShowPlan>,
}

impl Plan {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            shows: Vec::new(),
        }
    }

    /// File operations in accumulation order: shows in order, then per show
    /// seasons ascending, direct files before discs.
    pub fn operations(&self) -> Vec<&RenameOperation> {
        self.shows.iter().flat_map(|s| s.operations()).collect()
    }

    /// Folder renames ordered deepest path first, so a disc folder is renamed
    /// while its season folder still has the old name.
    pub fn folder_renames(&self) -> Vec<&FolderRename> {
        let mut renames: Vec<&FolderRename> =
            self.shows.iter().flat_map(|s| s.folder_renames()).collect();
        renames.sort_by_key(|r| std::cmp::Reverse(r.depth()));
        renames
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &Conflict> {
        self.shows.iter().flat_map(|s| s.conflicts.iter())
    }

    pub fn has_changes(&self) -> bool {
        self.shows.iter().any(ShowPlan::has_changes)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// How a file relates to the season it is being numbered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The file stays in its current folder.
    InPlace,
    /// The file moves from the show root into a season folder to be created.
    RootMove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileDecision {
    Unchanged,
    Rename(RenameOperation),
    Conflict(Conflict),
}

/// Decides whether a numbered file needs an operation and keeps track of
/// every destination claimed during the run.
#[derive(Debug, Default)]
pub struct OperationPlanner {
    claimed: HashMap<PathBuf, PathBuf>,
}

impl OperationPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the current path of a file that already has its canonical
    /// name so that no other file is planned onto it. Returns whether the
    /// path was claimed.
    pub fn reserve_canonical(
        &mut self,
        file: &DirectoryEntry,
        season: u32,
        episode: u32,
        placement: Placement,
    ) -> bool {
        if placement == Placement::RootMove
            || file.name != episode_file_name(season, episode, file.extension.as_deref())
            || self.claimed.contains_key(&file.path)
        {
            return false;
        }
        self.claimed.insert(file.path.clone(), file.path.clone());
        true
    }

    pub fn plan_file(
        &mut self,
        file: &DirectoryEntry,
        season: u32,
        episode: u32,
        placement: Placement,
    ) -> FileDecision {
        let target_name = episode_file_name(season, episode, file.extension.as_deref());
        let is_root_move = placement == Placement::RootMove;

        let operation = RenameOperation {
            source: file.path.clone(),
            target_name,
            season,
            episode,
            is_root_move,
        };
        let destination = operation.destination();

        if let Some(owner) = self.claimed.get(&destination) {
            if owner != &file.path {
                let conflict = Conflict::DuplicateTarget {
                    source: file.path.clone(),
                    target: destination,
                };
                warn!("{conflict}");
                return FileDecision::Conflict(conflict);
            }
        }
        self.claimed.insert(destination, file.path.clone());

        if file.name == operation.target_name && !is_root_move {
            debug!(file = %file.name, "already canonical");
            return FileDecision::Unchanged;
        }

        debug!(
            file = %file.name,
            target = %operation.target_name,
            is_root_move,
            "planned rename"
        );
        FileDecision::Rename(operation)
    }
}
