//! Human-readable previews of a diff

use std::fmt::Write;

use super::diff::{DiffEntry, DiffKind, ParameterDiff};
use crate::config::Namespace;

/// Which side of a diff is the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Local file → store
    Push,
    /// Store → local file
    Restore,
}

impl Direction {
    fn title(self, kind: DiffKind) -> &'static str {
        match (self, kind) {
            (_, DiffKind::Update) => "Updates",
            (_, DiffKind::Unchanged) => "Unchanged",
            (Self::Push, DiffKind::Add) => "Additions",
            (Self::Push, DiffKind::Orphan) => "Deleted",
            (Self::Restore, DiffKind::Add) => "Removals",
            (Self::Restore, DiffKind::Orphan) => "Added",
        }
    }

    /// Marker and value text for one entry; `None` for unchanged entries
    fn line(self, entry: &DiffEntry) -> Option<(char, String)> {
        match (self, entry) {
            (_, DiffEntry::Unchanged { .. }) => None,
            (Self::Push, DiffEntry::Update { old, new }) => Some(('~', format!("{old} => {new}"))),
            (Self::Restore, DiffEntry::Update { old, new }) => {
                Some(('~', format!("{new} => {old}")))
            }
            (Self::Push, DiffEntry::Add { value }) => Some(('+', value.clone())),
            (Self::Restore, DiffEntry::Add { value }) => Some(('-', value.clone())),
            (Self::Push, DiffEntry::Orphan { old }) => Some(('-', old.clone())),
            (Self::Restore, DiffEntry::Orphan { old }) => Some(('+', old.clone())),
        }
    }
}

/// Sections in display order
const SECTIONS: [DiffKind; 3] = [DiffKind::Update, DiffKind::Add, DiffKind::Orphan];

/// Preview of a push (local file → store).
///
/// ```text
/// Updates
///  ~ /cfg/prod/app.yaml/a: 1 => 2
/// Additions
///  + /cfg/prod/app.yaml/b: x
/// Deleted
///  - /cfg/prod/app.yaml/c: y
/// ```
///
/// Unchanged parameters are not shown; sections without entries are omitted.
pub fn render_push(diff: &ParameterDiff) -> String {
    render(diff, Direction::Push, |path| path.to_string())
}

/// Preview of a restore (store → local file).
///
/// The store is the source here, so the verbs flip: parameters only present
/// locally are removals, parameters only in the store are additions, and
/// updates read `local => stored`. Keys are shown relative to the namespace
/// and joined with dots.
pub fn render_restore(diff: &ParameterDiff, namespace: &Namespace) -> String {
    render(diff, Direction::Restore, |path| namespace.display_key(path))
}

fn render<F>(diff: &ParameterDiff, direction: Direction, display_path: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut out = String::new();
    for kind in SECTIONS {
        let lines: Vec<String> = diff
            .by_kind(kind)
            .filter_map(|(path, entry)| {
                let (marker, text) = direction.line(entry)?;
                Some(format!(" {marker} {}: {text}", display_path(path.as_str())))
            })
            .collect();
        if lines.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}", direction.title(kind));
        for line in lines {
            let _ = writeln!(out, "{line}");
        }
    }
    out
}
