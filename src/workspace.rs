use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::document::FileDocument;
use crate::models::{DocumentOutline, GroupOutline};
use crate::outline::{OutlineGroup, OutlineModel};

/// Outline every file in `file_paths` in parallel.
///
/// Documents without declarations are dropped unless `keep_empty` is set;
/// unreadable documents are always kept so the error is reported.
pub fn outline_files<P: AsRef<Path> + Sync>(
    file_paths: &[P],
    root: &Path,
    groups: &[OutlineGroup],
    model: &OutlineModel,
    keep_empty: bool,
    cancelled: &AtomicBool,
) -> Vec<DocumentOutline> {
    let mut results: Vec<DocumentOutline> = file_paths
        .par_iter()
        .filter_map(|path| {
            if cancelled.load(Ordering::Relaxed) {
                return None;
            }
            let outline = outline_file(path.as_ref(), root, groups, model);
            if outline.error.is_none() && outline.declaration_count() == 0 && !keep_empty {
                return None;
            }
            Some(outline)
        })
        .collect();

    results.sort_by_cached_key(|d| d.path.to_ascii_lowercase());
    results
}

fn outline_file(path: &Path, root: &Path, groups: &[OutlineGroup], model: &OutlineModel) -> DocumentOutline {
    let relative = normalized_relative(root, path);

    let doc = match FileDocument::new(path).load() {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            tracing::debug!("{} looks binary, skipping", relative);
            return DocumentOutline {
                path: relative,
                groups: Vec::new(),
                error: None,
            };
        }
        Err(e) => {
            tracing::warn!("{}", e);
            return DocumentOutline {
                path: relative,
                groups: Vec::new(),
                error: Some(e.to_string()),
            };
        }
    };

    if !doc.is_capl() {
        tracing::debug!("{} is not a .can/.cin document, no entries", relative);
    }

    let groups = groups
        .iter()
        .map(|&group| GroupOutline {
            group,
            entries: model.entries_for(group.kind, &doc),
        })
        .collect();

    DocumentOutline {
        path: relative,
        groups,
        error: None,
    }
}

/// `full` relative to `root` with forward slashes, or `full` as-is when it
/// lies outside `root`.
pub fn normalized_relative(root: &Path, full: &Path) -> String {
    let shown = full.strip_prefix(root).unwrap_or(full).to_string_lossy();
    if cfg!(windows) {
        shown.replace('\\', "/")
    } else {
        shown.into_owned()
    }
}
