use crate::plan::Plan;

/// How the review screen was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Accepted,
    Aborted,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlanStats {
    pub shows: usize,
    pub files: usize,
    pub root_moves: usize,
    pub folders: usize,
    pub conflicts: usize,
}

impl PlanStats {
    pub fn from_plan(plan: &Plan) -> Self {
        let operations = plan.operations();
        Self {
            shows: plan.shows.iter().filter(|s| s.has_changes()).count(),
            files: operations.len(),
            root_moves: operations.iter().filter(|op| op.is_root_move).count(),
            folders: plan.folder_renames().len(),
            conflicts: plan.conflicts().count(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} show(s), {} file(s) ({} into new season folders), {} folder rename(s), {} conflict(s)",
            self.shows, self.files, self.root_moves, self.folders, self.conflicts
        )
    }
}
