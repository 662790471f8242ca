use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::exclusion::ExclusionFilter;
use crate::glob::NamePatterns;

/// Recursively collect files under `root` whose names match `patterns`.
///
/// Subdirectories are walked in parallel; the result is sorted
/// case-insensitively so output order does not depend on scheduling.
pub fn find_files(
    root: &Path,
    patterns: &NamePatterns,
    filter: &ExclusionFilter,
    cancelled: &AtomicBool,
) -> Vec<PathBuf> {
    let mut results = Vec::new();
    find_files_recursive(root, patterns, filter, cancelled, &mut results);
    results.sort_by_cached_key(|p| p.to_string_lossy().to_ascii_lowercase());
    results
}

fn find_files_recursive(
    dir: &Path,
    patterns: &NamePatterns,
    filter: &ExclusionFilter,
    cancelled: &AtomicBool,
    results: &mut Vec<PathBuf>,
) {
    if cancelled.load(Ordering::Relaxed) {
        return;
    }

    let entries = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            tracing::debug!("skipping {}: {}", dir.display(), e);
            return;
        }
    };

    let mut subdirs = Vec::new();

    for entry in entries.flatten() {
        let Ok(ft) = entry.file_type() else {
            continue;
        };
        let name = entry.file_name();
        let name_str = name.to_string_lossy();

        if ft.is_file() {
            if patterns.matches(&name_str) {
                results.push(entry.path());
            }
        } else if ft.is_dir() && !filter.is_excluded(&name_str) {
            subdirs.push(entry.path());
        }
    }

    let sub_results: Vec<Vec<PathBuf>> = subdirs
        .par_iter()
        .map(|subdir| {
            let mut sub = Vec::new();
            find_files_recursive(subdir, patterns, filter, cancelled, &mut sub);
            sub
        })
        .collect();

    for sub in sub_results {
        results.extend(sub);
    }
}
