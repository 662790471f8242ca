use std::collections::HashSet;

/// Directory names skipped during discovery. CANoe configurations keep
/// logging output and automatic backups next to the sources.
const DEFAULT_EXCLUSIONS: &[&str] = &[
    ".git", ".svn", ".hg", ".vs", ".vscode", ".idea",
    "node_modules", "target", "build", "dist",
    "backup", "logging", "logs", "__pycache__",
];

#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    names: HashSet<String>,
}

impl ExclusionFilter {
    pub fn new(additional: &[String], disable_defaults: bool) -> Self {
        let defaults = DEFAULT_EXCLUSIONS
            .iter()
            .filter(|_| !disable_defaults)
            .map(|name| name.to_string());
        let names = defaults
            .chain(additional.iter().cloned())
            .map(|name| name.to_ascii_lowercase())
            .collect();
        Self { names }
    }

    /// Case-insensitive check of a bare directory name.
    pub fn is_excluded(&self, dir_name: &str) -> bool {
        if dir_name.bytes().any(|b| b.is_ascii_uppercase()) {
            self.names.contains(&dir_name.to_ascii_lowercase())
        } else {
            self.names.contains(dir_name)
        }
    }
}
