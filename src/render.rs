use std::fmt;
use std::path::PathBuf;

use crate::plan::{season_folder_name, FolderRename, Plan, RenameOperation, SeasonSource, ShowPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Show,
    Folder,
    File,
    Note,
}

/// One line of the review tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub kind: LineKind,
    pub level: usize,
    pub label: String,
    /// New name when the entry changes.
    pub target: Option<String>,
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
}

impl TreeLine {
    fn show(show: &ShowPlan) -> Self {
        Self {
            kind: LineKind::Show,
            level: 0,
            label: show.name.clone(),
            target: None,
            source: Some(show.path.clone()),
            destination: None,
        }
    }

    fn folder(level: usize, label: String, rename: Option<&FolderRename>) -> Self {
        Self {
            kind: LineKind::Folder,
            level,
            label,
            target: rename.map(|r| r.target_name.clone()),
            source: rename.map(|r| r.source.clone()),
            destination: rename.map(FolderRename::destination),
        }
    }

    fn file(level: usize, operation: &RenameOperation) -> Self {
        Self {
            kind: LineKind::File,
            level,
            label: operation.original_name(),
            target: Some(operation.target_name.clone()),
            source: Some(operation.source.clone()),
            destination: Some(operation.destination()),
        }
    }

    fn note(level: usize, message: String) -> Self {
        Self {
            kind: LineKind::Note,
            level,
            label: message,
            target: None,
            source: None,
            destination: None,
        }
    }
}

impl fmt::Display for TreeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = "    ".repeat(self.level);
        match (self.kind, &self.target) {
            (LineKind::Show, _) => write!(f, "📺 {}", self.label),
            (LineKind::Note, _) => write!(f, "{indent}⚠ {}", self.label),
            (_, Some(target)) => write!(f, "{indent}├── {}  ->  {target}", self.label),
            (_, None) => write!(f, "{indent}└── {}", self.label),
        }
    }
}

/// Projects a plan into tree lines. Shows with nothing to change are left
/// out entirely.
pub fn render_tree(plan: &Plan) -> Vec<TreeLine> {
    plan.shows
        .iter()
        .filter(|show| show.has_changes())
        .flat_map(render_show)
        .collect()
}

fn render_show(show: &ShowPlan) -> Vec<TreeLine> {
    let mut lines = vec![TreeLine::show(show)];

    for conflict in &show.conflicts {
        lines.push(TreeLine::note(1, conflict.to_string()));
    }

    for season in &show.seasons {
        match &season.source {
            SeasonSource::SyntheticRoot(_) => {
                let mut line = TreeLine::folder(1, "(show root)".to_string(), None);
                line.target = Some(format!("{} (new folder)", season_folder_name(season.number)));
                lines.push(line);
            }
            SeasonSource::ExistingFolder(_) => {
                let label = season.folder_name().unwrap_or_default();
                lines.push(TreeLine::folder(1, label, season.rename.as_ref()));
            }
        }

        lines.extend(season.operations.iter().map(|op| TreeLine::file(2, op)));

        for disc in &season.discs {
            lines.push(TreeLine::folder(2, disc.folder_name.clone(), disc.rename.as_ref()));
            lines.extend(disc.operations.iter().map(|op| TreeLine::file(3, op)));
        }
    }

    lines
}

/// The tree as printable text, one blank line before each show.
pub fn render_text(lines: &[TreeLine]) -> String {
    let mut out = String::new();
    for line in lines {
        if line.kind == LineKind::Show {
            out.push('\n');
        }
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}
