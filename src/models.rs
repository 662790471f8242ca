use crate::outline::{OutlineEntry, OutlineGroup, SortOrder};

pub struct MetaInfo {
    pub elapsed_ms: u128,
    pub timeout: bool,
    pub files_scanned: usize,
    pub files_outlined: usize,
    pub declarations: usize,
    pub sort_order: SortOrder,
}

/// Entries of one group within one document.
pub struct GroupOutline {
    pub group: OutlineGroup,
    pub entries: Vec<OutlineEntry>,
}

pub struct DocumentOutline {
    pub path: String,
    pub groups: Vec<GroupOutline>,
    pub error: Option<String>,
}

impl DocumentOutline {
    pub fn declaration_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }
}

#[derive(Default)]
pub struct OutputEnvelope {
    pub meta: Option<MetaInfo>,
    pub documents: Option<Vec<DocumentOutline>>,
    pub error: Option<String>,
}
