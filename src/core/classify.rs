//! Artifact-kind classification from naming conventions.

use crate::rules::WhenFilter;

/// Classify an artifact path into the kind filters that apply to it.
///
/// The file-type kind is decided by suffix (table, then view, then comment);
/// the backup kind by folder name (tables, then views). The two are
/// independent, so a path carries zero, one or two kinds.
pub fn classify(path: &str) -> Vec<WhenFilter> {
    let mut kinds = Vec::with_capacity(2);

    if path.ends_with(".tbl") {
        kinds.push(WhenFilter::CreateTable);
    } else if path.ends_with(".viw") {
        kinds.push(WhenFilter::CreateView);
    } else if path.ends_with(".cmt") {
        kinds.push(WhenFilter::CreateComment);
    }

    if path.contains("Auto_Backup_Tables") {
        kinds.push(WhenFilter::CreateBackupTable);
    } else if path.contains("Auto_Backup_Views") {
        kinds.push(WhenFilter::CreateBackupView);
    }

    kinds
}
