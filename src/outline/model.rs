use super::collate;
use super::entry::OutlineEntry;
use super::{OutlineGroup, SortOrder, GROUPS};
use crate::document::{is_capl_path, Document, DocumentEvent, DocumentSource, LineIndex};
use crate::error::OutlineError;
use crate::signature::{self, DeclarationKind};

/// Storage for the user's sort-order preference.
pub trait SortPreference {
    fn persist(&mut self, order: SortOrder) -> Result<(), OutlineError>;
}

type RefreshListener = Box<dyn Fn(u64) + Send + Sync>;

/// Scan one document for `kind` and return its sorted entries.
///
/// Pure and cache-free: every call rescans the text.
pub fn outline_document(doc: &Document, kind: DeclarationKind, order: SortOrder) -> Vec<OutlineEntry> {
    if !doc.is_capl() {
        return Vec::new();
    }

    let lines = LineIndex::new(&doc.text);
    let mut entries: Vec<OutlineEntry> = signature::scan(&doc.text, kind)
        .into_iter()
        .map(|record| OutlineEntry::from_record(record, &lines, &doc.path))
        .collect();
    sort_entries(&mut entries, order);
    entries
}

/// Stable sort, so equal keys keep scan order.
pub fn sort_entries(entries: &mut [OutlineEntry], order: SortOrder) {
    match order {
        SortOrder::Position => entries.sort_by_key(|e| e.location.line),
        SortOrder::Alphabetical => {
            entries.sort_by(|a, b| collate::compare(&a.display_label, &b.display_label))
        }
    }
}

/// Sort-order state plus the refresh signal consumers re-render on.
///
/// Holds no declarations between queries.
pub struct OutlineModel {
    sort_order: SortOrder,
    revision: u64,
    listeners: Vec<RefreshListener>,
}

impl Default for OutlineModel {
    fn default() -> Self {
        Self::new(SortOrder::default())
    }
}

impl OutlineModel {
    pub fn new(sort_order: SortOrder) -> Self {
        Self {
            sort_order,
            revision: 0,
            listeners: Vec::new(),
        }
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Number of refreshes fired so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&mut self, listener: impl Fn(u64) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Invalidate everything; the next query rescans from scratch.
    pub fn refresh(&mut self) {
        self.revision += 1;
        tracing::trace!(revision = self.revision, "outline refresh");
        for listener in &self.listeners {
            listener(self.revision);
        }
    }

    /// The fixed top-level groups, testcases first.
    pub fn groups(&self) -> [OutlineGroup; 2] {
        GROUPS
    }

    pub fn entries<S: DocumentSource + ?Sized>(&self, kind: DeclarationKind, source: &S) -> Vec<OutlineEntry> {
        match source.active_document() {
            Some(doc) => self.entries_for(kind, &doc),
            None => Vec::new(),
        }
    }

    pub fn entries_for(&self, kind: DeclarationKind, doc: &Document) -> Vec<OutlineEntry> {
        outline_document(doc, kind, self.sort_order)
    }

    /// Switch the order; refreshes only when the state actually changes.
    /// Returns whether it changed.
    pub fn set_sort_order(&mut self, order: SortOrder) -> bool {
        if self.sort_order == order {
            return false;
        }
        tracing::debug!("sort order {} -> {}", self.sort_order, order);
        self.sort_order = order;
        self.refresh();
        true
    }

    pub fn sort_by_position(&mut self, prefs: &mut dyn SortPreference) -> Result<(), OutlineError> {
        self.sort_and_persist(SortOrder::Position, prefs)
    }

    pub fn sort_by_alphabetical(&mut self, prefs: &mut dyn SortPreference) -> Result<(), OutlineError> {
        self.sort_and_persist(SortOrder::Alphabetical, prefs)
    }

    fn sort_and_persist(&mut self, order: SortOrder, prefs: &mut dyn SortPreference) -> Result<(), OutlineError> {
        self.set_sort_order(order);
        prefs.persist(order)
    }

    /// Adopt an order changed in configuration, without writing it back.
    pub fn apply_preference(&mut self, order: SortOrder) -> bool {
        self.set_sort_order(order)
    }

    /// React to editor activity. Returns whether a refresh fired.
    pub fn handle_event(&mut self, event: &DocumentEvent) -> bool {
        if !is_capl_path(event.path()) {
            return false;
        }
        tracing::debug!("{:?}", event);
        self.refresh();
        true
    }
}
