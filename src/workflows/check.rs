use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use similar::TextDiff;
use walkdir::WalkDir;

use super::render::RenderedWorkflow;

// ── Types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Rendered but not on disk yet.
    Added,
    /// On disk with different contents.
    Modified,
    /// A `deploy-*.yml` on disk with no product behind it.
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    Context(String),
    Insert(String),
    Delete(String),
    HunkHeader(String),
}

/// Difference between what would be rendered and what is on disk.
#[derive(Debug, Clone)]
pub struct FileDiff {
    pub file_name: String,
    pub kind: ChangeKind,
    pub lines: Vec<DiffLine>,
}

impl fmt::Display for FileDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = format!("a/{}", self.file_name);
        let b = format!("b/{}", self.file_name);
        let (old, new) = match self.kind {
            ChangeKind::Added => ("/dev/null", b.as_str()),
            ChangeKind::Modified => (a.as_str(), b.as_str()),
            ChangeKind::Deleted => (a.as_str(), "/dev/null"),
        };
        writeln!(f, "--- {old}")?;
        writeln!(f, "+++ {new}")?;
        for line in &self.lines {
            match line {
                DiffLine::HunkHeader(h) => writeln!(f, "{h}")?,
                DiffLine::Context(t) => writeln!(f, " {t}")?,
                DiffLine::Insert(t) => writeln!(f, "+{t}")?,
                DiffLine::Delete(t) => writeln!(f, "-{t}")?,
            }
        }
        Ok(())
    }
}

// ── Comparison ───────────────────────────────────────────────────────

/// Compare rendered workflows against `out_dir` without writing anything.
/// An empty result means the directory is up to date.
pub fn check_outputs(rendered: &[RenderedWorkflow], out_dir: &Path) -> Result<Vec<FileDiff>> {
    let mut diffs = Vec::new();

    for workflow in rendered {
        let path = out_dir.join(&workflow.file_name);
        if !path.is_file() {
            diffs.push(FileDiff {
                file_name: workflow.file_name.clone(),
                kind: ChangeKind::Added,
                lines: make_add_lines(&workflow.contents),
            });
            continue;
        }
        let on_disk = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        if on_disk != workflow.contents {
            diffs.push(FileDiff {
                file_name: workflow.file_name.clone(),
                kind: ChangeKind::Modified,
                lines: make_unified_diff(&on_disk, &workflow.contents),
            });
        }
    }

    let expected: HashSet<&str> = rendered.iter().map(|w| w.file_name.as_str()).collect();
    let mut orphans = Vec::new();
    if out_dir.is_dir() {
        for entry in WalkDir::new(out_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if is_workflow_file(&name) && !expected.contains(name.as_str()) {
                let content = std::fs::read_to_string(entry.path()).unwrap_or_default();
                orphans.push(FileDiff {
                    file_name: name,
                    kind: ChangeKind::Deleted,
                    lines: make_delete_lines(&content),
                });
            }
        }
    }

    // Sort by name for stable ordering.
    orphans.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    diffs.extend(orphans);
    Ok(diffs)
}

fn is_workflow_file(name: &str) -> bool {
    name.starts_with("deploy-") && name.ends_with(".yml")
}

fn make_unified_diff(old: &str, new: &str) -> Vec<DiffLine> {
    let text_diff = TextDiff::from_lines(old, new);
    let mut lines = Vec::new();

    for hunk in text_diff.unified_diff().context_radius(3).iter_hunks() {
        lines.push(DiffLine::HunkHeader(format!("{}", hunk.header())));
        for change in hunk.iter_changes() {
            let text = change.value().trim_end_matches('\n').to_string();
            match change.tag() {
                similar::ChangeTag::Equal => lines.push(DiffLine::Context(text)),
                similar::ChangeTag::Insert => lines.push(DiffLine::Insert(text)),
                similar::ChangeTag::Delete => lines.push(DiffLine::Delete(text)),
            }
        }
    }

    lines
}

fn make_add_lines(content: &str) -> Vec<DiffLine> {
    let mut lines = vec![DiffLine::HunkHeader("@@ new file @@".into())];
    lines.extend(content.lines().map(|l| DiffLine::Insert(l.to_string())));
    lines
}

fn make_delete_lines(content: &str) -> Vec<DiffLine> {
    let mut lines = vec![DiffLine::HunkHeader("@@ deleted file @@".into())];
    lines.extend(content.lines().map(|l| DiffLine::Delete(l.to_string())));
    lines
}
