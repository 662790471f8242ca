//! Outline model
//!
//! Turns scanner records into display entries, grouped by declaration kind
//! and ordered by the current sort order.

mod collate;
mod entry;
mod model;
mod params;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use entry::{EntryDetail, OutlineEntry, OutlineLocation};
pub use model::{outline_document, sort_entries, OutlineModel, SortPreference};
pub use params::{split_parameter_types, UNKNOWN_TYPE};

use crate::error::OutlineError;
use crate::signature::DeclarationKind;

/// Display ordering of entries within a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Position,
    Alphabetical,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Position => "position",
            SortOrder::Alphabetical => "alphabetical",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = OutlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "position" => Ok(SortOrder::Position),
            "alphabetical" => Ok(SortOrder::Alphabetical),
            other => Err(OutlineError::InvalidSortOrder(other.to_owned())),
        }
    }
}

/// A top-level outline group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineGroup {
    pub kind: DeclarationKind,
    pub label: &'static str,
}

pub const GROUPS: [OutlineGroup; 2] = [
    OutlineGroup {
        kind: DeclarationKind::TestCase,
        label: "Test Cases",
    },
    OutlineGroup {
        kind: DeclarationKind::Function,
        label: "Functions",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_order_round_trips_through_str() {
        assert_eq!("position".parse::<SortOrder>().unwrap(), SortOrder::Position);
        assert_eq!("alphabetical".parse::<SortOrder>().unwrap(), SortOrder::Alphabetical);
        assert_eq!(SortOrder::Alphabetical.to_string(), "alphabetical");
    }

    #[test]
    fn sort_order_rejects_unknown() {
        let err = "name".parse::<SortOrder>().unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn group_labels() {
        assert_eq!(GROUPS[0].label, "Test Cases");
        assert_eq!(GROUPS[1].label, "Functions");
    }
}
