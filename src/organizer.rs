use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classifier::PathClassifier;
use crate::config::{ModeOverride, OrganizerConfig};
use crate::ignore::IgnoreFilter;
use crate::listing::{DirectoryEntry, DirectoryLister};
use crate::plan::{
    disc_folder_name, season_folder_name, Conflict, DiscPlan, FileDecision, FolderKind,
    FolderRename, OperationPlanner, Placement, Plan, RenameOperation, SeasonPlan, SeasonSource,
    ShowPlan,
};
use crate::sequencer::EpisodeSequencer;

/// Whether the target directory is one show or a library of shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanMode {
    SingleShow,
    Library,
}

/// A show is assumed when the target directly holds season folders or video files.
pub fn detect_mode(children: &[DirectoryEntry], config: &OrganizerConfig) -> ScanMode {
    let has_season_folders = children.iter().filter(|e| e.is_dir).any(|e| {
        let name = e.name.to_lowercase();
        name.contains("season") || name.contains("staffel")
    });
    let has_video_files = children.iter().any(|e| e.is_video(config));

    if has_season_folders || has_video_files {
        ScanMode::SingleShow
    } else {
        ScanMode::Library
    }
}

/// The backing of a season while it is being planned.
enum SeasonScope {
    Folder(DirectoryEntry),
    Root(Vec<DirectoryEntry>),
}

impl SeasonScope {
    fn into_source(self) -> SeasonSource {
        match self {
            SeasonScope::Folder(dir) => SeasonSource::ExistingFolder(dir.path),
            SeasonScope::Root(files) => {
                SeasonSource::SyntheticRoot(files.into_iter().map(|f| f.path).collect())
            }
        }
    }
}

/// Walks shows and turns their layout into a [`Plan`].
#[derive(Debug)]
pub struct Organizer<L: DirectoryLister> {
    lister: L,
    classifier: PathClassifier,
    filter: IgnoreFilter,
    config: OrganizerConfig,
}

impl<L: DirectoryLister> Organizer<L> {
    pub fn new(config: OrganizerConfig, lister: L) -> Result<Self> {
        Ok(Self {
            lister,
            classifier: PathClassifier::new()?,
            filter: IgnoreFilter::new(&config),
            config,
        })
    }

    /// Plans every show under `target`. Shows are always visited in full;
    /// filtering of unchanged shows happens only when rendering.
    pub fn plan(&self, target: &Path, mode: ModeOverride) -> Result<(ScanMode, Plan)> {
        let children = self.lister.list(target)?;
        let mode = match mode {
            ModeOverride::Auto => detect_mode(&children, &self.config),
            ModeOverride::Show => ScanMode::SingleShow,
            ModeOverride::Library => ScanMode::Library,
        };
        info!(target = %target.display(), ?mode, "scanning");

        let mut planner = OperationPlanner::new();
        let mut plan = Plan::new(target.to_path_buf());

        match mode {
            ScanMode::SingleShow => {
                plan.shows.push(self.plan_show(target, &mut planner)?);
            }
            ScanMode::Library => {
                for show in children.iter().filter(|e| e.is_dir) {
                    plan.shows.push(self.plan_show(&show.path, &mut planner)?);
                }
            }
        }

        Ok((mode, plan))
    }

    pub fn plan_show(&self, show: &Path, planner: &mut OperationPlanner) -> Result<ShowPlan> {
        let name = show
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| show.display().to_string());
        debug!(show = %name, "planning show");

        let entries = self
            .lister
            .list(show)
            .with_context(|| format!("Failed to scan show: {name}"))?;
        let root_files: Vec<DirectoryEntry> = entries
            .iter()
            .filter(|e| e.is_video(&self.config))
            .cloned()
            .collect();

        let mut conflicts = Vec::new();
        let mut seasons: BTreeMap<u32, SeasonScope> = BTreeMap::new();

        for folder in entries.iter().filter(|e| e.is_dir) {
            if self.filter.is_ignored_folder(&folder.name) {
                debug!(folder = %folder.name, "ignored folder");
                continue;
            }
            let Some(number) = self.classifier.season_number(&folder.name) else {
                continue;
            };
            if let Some(SeasonScope::Folder(previous)) =
                seasons.insert(number, SeasonScope::Folder(folder.clone()))
            {
                let conflict = Conflict::SeasonCollision {
                    season: number,
                    kept: folder.name.clone(),
                    displaced: previous.name,
                };
                warn!(show = %name, "{conflict}");
                conflicts.push(conflict);
            }
        }

        let has_candidates = root_files
            .iter()
            .any(|f| !self.filter.is_ignored_file(&f.name));
        if has_candidates {
            if seasons.contains_key(&1) {
                warn!(
                    show = %name,
                    "root level video files left in place because a season 1 folder exists"
                );
            } else {
                seasons.insert(1, SeasonScope::Root(root_files));
            }
        }

        let mut season_plans = Vec::with_capacity(seasons.len());
        for (number, scope) in seasons {
            season_plans.push(self.plan_season(number, scope, planner, &mut conflicts)?);
        }

        Ok(ShowPlan {
            name,
            path: show.to_path_buf(),
            seasons: season_plans,
            conflicts,
        })
    }

    fn plan_season(
        &self,
        number: u32,
        scope: SeasonScope,
        planner: &mut OperationPlanner,
        conflicts: &mut Vec<Conflict>,
    ) -> Result<SeasonPlan> {
        let target_name = season_folder_name(number);
        let mut sequencer = EpisodeSequencer::new();
        let mut discs: BTreeMap<u32, DirectoryEntry> = BTreeMap::new();

        let (direct_files, placement, rename) = match &scope {
            SeasonScope::Root(files) => (files.clone(), Placement::RootMove, None),
            SeasonScope::Folder(folder) => {
                let rename = (folder.name != target_name).then(|| FolderRename {
                    source: folder.path.clone(),
                    target_name: target_name.clone(),
                    kind: FolderKind::Season,
                });

                let mut direct_files = Vec::new();
                for item in self.lister.list(&folder.path)? {
                    if item.is_dir {
                        if self.filter.is_ignored_folder(&item.name) {
                            continue;
                        }
                        let Some(disc) = self
                            .classifier
                            .disc_number(&item.name, number)
                            .filter(|d| *d > 0)
                        else {
                            continue;
                        };
                        let kept_name = item.name.clone();
                        if let Some(previous) = discs.insert(disc, item) {
                            let conflict = Conflict::DiscCollision {
                                season: number,
                                disc,
                                kept: kept_name,
                                displaced: previous.name,
                            };
                            warn!("{conflict}");
                            conflicts.push(conflict);
                        }
                    } else if item.is_video(&self.config) {
                        direct_files.push(item);
                    }
                }
                (direct_files, Placement::InPlace, rename)
            }
        };

        let operations = self.plan_files(
            &direct_files,
            number,
            placement,
            &mut sequencer,
            planner,
            conflicts,
        );

        let mut disc_plans = Vec::with_capacity(discs.len());
        for (disc, folder) in discs {
            let disc_name = disc_folder_name(number, disc);
            let rename = (folder.name != disc_name).then(|| FolderRename {
                source: folder.path.clone(),
                target_name: disc_name,
                kind: FolderKind::Disc,
            });

            let files: Vec<DirectoryEntry> = self
                .lister
                .list(&folder.path)?
                .into_iter()
                .filter(|e| e.is_video(&self.config))
                .collect();
            // Same sequencer: numbering continues across discs.
            let operations = self.plan_files(
                &files,
                number,
                Placement::InPlace,
                &mut sequencer,
                planner,
                conflicts,
            );

            disc_plans.push(DiscPlan {
                number: disc,
                folder_name: folder.name,
                folder: folder.path,
                rename,
                operations,
            });
        }

        Ok(SeasonPlan {
            number,
            source: scope.into_source(),
            rename,
            operations,
            discs: disc_plans,
        })
    }

    fn plan_files(
        &self,
        files: &[DirectoryEntry],
        season: u32,
        placement: Placement,
        sequencer: &mut EpisodeSequencer,
        planner: &mut OperationPlanner,
        conflicts: &mut Vec<Conflict>,
    ) -> Vec<RenameOperation> {
        let mut numbered = Vec::with_capacity(files.len());
        for file in files {
            if self.filter.is_ignored_file(&file.name) {
                debug!(file = %file.name, "ignored file");
                continue;
            }

            let tag = self.classifier.explicit_tag(&file.name);
            if let Some(tag) = tag {
                if tag.season != season {
                    warn!(
                        file = %file.name,
                        season,
                        tagged_season = tag.season,
                        "episode code names a different season; numbering it in season {season}"
                    );
                }
            }

            let Some(episode) = sequencer.assign(tag.map(|t| t.episode)) else {
                warn!(file = %file.name, season, "no episode number left in this season; skipping");
                continue;
            };
            numbered.push((file, episode));
        }

        // Files already at their canonical name keep it, whatever sorts before them.
        for (file, episode) in &numbered {
            planner.reserve_canonical(file, season, *episode, placement);
        }

        let mut operations = Vec::new();
        for (file, episode) in numbered {
            match planner.plan_file(file, season, episode, placement) {
                FileDecision::Unchanged => {}
                FileDecision::Rename(operation) => operations.push(operation),
                FileDecision::Conflict(conflict) => conflicts.push(conflict),
            }
        }

        operations
    }
}
