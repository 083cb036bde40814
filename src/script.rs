use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::plan::{FolderRename, Plan, RenameOperation};

const HEADER: &str = "Generated by Jellyfin Organizer";
const UNDO_HEADER: &str = "Undo script generated by Jellyfin Organizer";

/// Shell flavour of the generated scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ScriptDialect {
    /// bash script using `mkdir -p` and `mv -n`
    Posix,
    /// batch file using `mkdir` and guarded `move`
    Windows,
}

impl ScriptDialect {
    pub fn host() -> Self {
        if cfg!(windows) {
            ScriptDialect::Windows
        } else {
            ScriptDialect::Posix
        }
    }

    pub fn apply_file_name(self) -> &'static str {
        match self {
            ScriptDialect::Posix => "apply_renames.sh",
            ScriptDialect::Windows => "apply_renames.bat",
        }
    }

    pub fn undo_file_name(self) -> &'static str {
        match self {
            ScriptDialect::Posix => "undo_renames.sh",
            ScriptDialect::Windows => "undo_renames.bat",
        }
    }

    fn quote(self, path: &Path) -> String {
        let raw = path.display().to_string();
        match self {
            ScriptDialect::Posix => format!("'{}'", raw.replace('\'', r"'\''")),
            ScriptDialect::Windows => format!("\"{}\"", raw.replace('%', "%%")),
        }
    }

    fn header(self, out: &mut String, title: &str) {
        match self {
            ScriptDialect::Posix => {
                out.push_str("#!/bin/bash\n");
                let _ = writeln!(out, "# {title}");
            }
            ScriptDialect::Windows => {
                out.push_str("@echo off\n");
                let _ = writeln!(out, "REM {title}");
            }
        }
    }

    fn make_dir(self, out: &mut String, dir: &Path) {
        let dir = self.quote(dir);
        let _ = match self {
            ScriptDialect::Posix => writeln!(out, "mkdir -p {dir}"),
            ScriptDialect::Windows => writeln!(out, "if not exist {dir} mkdir {dir}"),
        };
    }

    /// Move that never replaces an existing file.
    fn move_file(self, out: &mut String, from: &Path, to: &Path) {
        if is_case_only_rename(from, to) {
            return self.move_via_temp(out, from, to);
        }
        let (from, to) = (self.quote(from), self.quote(to));
        let _ = match self {
            ScriptDialect::Posix => writeln!(out, "mv -n {from} {to}"),
            ScriptDialect::Windows => writeln!(out, "if not exist {to} move {from} {to}"),
        };
    }

    /// Folder rename that is skipped when the destination exists, so one
    /// folder is never moved inside another.
    fn rename_dir(self, out: &mut String, from: &Path, to: &Path) {
        if is_case_only_rename(from, to) {
            return self.move_via_temp(out, from, to);
        }
        let (from, to) = (self.quote(from), self.quote(to));
        let _ = match self {
            ScriptDialect::Posix => writeln!(out, "[ -e {to} ] || mv -n {from} {to}"),
            ScriptDialect::Windows => writeln!(out, "if not exist {to} move {from} {to}"),
        };
    }

    /// Rename through a temporary name. On a case-insensitive filesystem the
    /// existence guard would see the source itself, so the guard runs after
    /// the source has moved aside and puts it back if the target is taken.
    fn move_via_temp(self, out: &mut String, from: &Path, to: &Path) {
        let temp = temp_path(to);
        let (from, to, temp) = (self.quote(from), self.quote(to), self.quote(&temp));
        let _ = match self {
            ScriptDialect::Posix => writeln!(
                out,
                "[ -e {temp} ] || {{ mv -n {from} {temp} && if [ -e {to} ]; then mv -n {temp} {from}; else mv -n {temp} {to}; fi; }}"
            ),
            ScriptDialect::Windows => writeln!(
                out,
                "if not exist {temp} (move {from} {temp} >nul && (if exist {to} (move {temp} {from}) else (move {temp} {to})))"
            ),
        };
    }

    fn remove_empty_dir(self, out: &mut String, dir: &Path) {
        let dir = self.quote(dir);
        let _ = match self {
            ScriptDialect::Posix => writeln!(out, "rmdir {dir} 2>/dev/null"),
            ScriptDialect::Windows => writeln!(out, "rmdir {dir} 2>nul"),
        };
    }
}

/// Source and target live in the same folder and differ only in letter case.
fn is_case_only_rename(from: &Path, to: &Path) -> bool {
    let (Some(from_name), Some(to_name)) = (from.file_name(), to.file_name()) else {
        return false;
    };
    from.parent() == to.parent()
        && from_name != to_name
        && from_name
            .to_string_lossy()
            .eq_ignore_ascii_case(&to_name.to_string_lossy())
}

fn temp_path(to: &Path) -> PathBuf {
    let mut name = to.file_name().unwrap_or_default().to_os_string();
    name.push(".renaming");
    to.with_file_name(name)
}

/// Apply script: file moves in plan order, then folder renames deepest first.
pub fn emit_apply(plan: &Plan, dialect: ScriptDialect) -> String {
    let mut out = String::new();
    dialect.header(&mut out, HEADER);

    let mut created = HashSet::new();
    for op in plan.operations() {
        if let Some(folder) = op.season_folder() {
            if created.insert(folder.clone()) {
                dialect.make_dir(&mut out, &folder);
            }
        }
        dialect.move_file(&mut out, &op.source, &op.destination());
    }

    for rename in plan.folder_renames() {
        dialect.rename_dir(&mut out, &rename.source, &rename.destination());
    }

    out
}

/// Undo script: reverses [`emit_apply`] step by step. Folder renames are
/// undone first so the recorded file paths are valid again.
pub fn emit_undo(plan: &Plan, dialect: ScriptDialect) -> String {
    let mut out = String::new();
    dialect.header(&mut out, UNDO_HEADER);

    let renames: Vec<&FolderRename> = plan.folder_renames();
    for rename in renames.iter().rev() {
        dialect.rename_dir(&mut out, &rename.destination(), &rename.source);
    }

    let operations: Vec<&RenameOperation> = plan.operations();
    for op in operations.iter().rev() {
        dialect.move_file(&mut out, &op.destination(), &op.source);
    }

    let mut removed = HashSet::new();
    for op in &operations {
        if let Some(folder) = op.season_folder() {
            if removed.insert(folder.clone()) {
                dialect.remove_empty_dir(&mut out, &folder);
            }
        }
    }

    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPaths {
    pub apply: PathBuf,
    pub undo: Option<PathBuf>,
}

/// Writes the apply script (and optionally the undo script) into `output_dir`,
/// replacing scripts left by an earlier run.
pub fn write_scripts(
    plan: &Plan,
    dialect: ScriptDialect,
    output_dir: &Path,
    write_undo: bool,
) -> Result<ScriptPaths> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let apply = output_dir.join(dialect.apply_file_name());
    write_script(&apply, &emit_apply(plan, dialect))?;
    info!(path = %apply.display(), "apply script written");

    let undo = if write_undo {
        let undo = output_dir.join(dialect.undo_file_name());
        write_script(&undo, &emit_undo(plan, dialect))?;
        info!(path = %undo.display(), "undo script written");
        Some(undo)
    } else {
        None
    };

    Ok(ScriptPaths { apply, undo })
}

fn write_script(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .with_context(|| format!("Failed to write script: {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Failed to mark script executable: {}", path.display()))?;
    }

    Ok(())
}
