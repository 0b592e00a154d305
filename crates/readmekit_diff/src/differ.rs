//! Section-level semantic diffing.
//!
//! Compares two documents by section identifier instead of line by line, so
//! cosmetic whitespace changes do not register as drift while reordering
//! does.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use readmekit_render::{Document, Section};

/// How one section differs between document A and document B.
///
/// `Added` and `Removed` are directional A→B.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
    Moved,
    Unchanged,
}

/// One entry of a diff report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionChange {
    pub id: String,
    pub kind: ChangeKind,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// Ordered diff outcome: exactly one entry per section identifier present
/// in either document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffReport {
    pub changes: Vec<SectionChange>,
}

impl DiffReport {
    /// True when every section is unchanged.
    pub fn is_clean(&self) -> bool {
        self.changes
            .iter()
            .all(|change| change.kind == ChangeKind::Unchanged)
    }

    /// Entries that represent drift, in report order.
    pub fn drifted(&self) -> impl Iterator<Item = &SectionChange> {
        self.changes
            .iter()
            .filter(|change| change.kind != ChangeKind::Unchanged)
    }
}

/// Pure section-level differ.
pub struct SemanticDiffer;

impl SemanticDiffer {
    /// Diff two documents.
    ///
    /// Report order: identifiers as they appear in A, then identifiers only
    /// in B in B's order. Duplicate identifiers within one document collapse
    /// to the last occurrence, so the report carries exactly one entry per
    /// identifier. Content is compared after normalization; a position
    /// change on identical content reports `moved`, never `unchanged`,
    /// because reordering is itself a drift signal.
    pub fn diff(a: &Document, b: &Document) -> DiffReport {
        let a_sections = unique_sections(a);
        let b_sections = unique_sections(b);
        let b_positions: BTreeMap<&str, usize> = b_sections
            .iter()
            .enumerate()
            .map(|(position, section)| (section.id.as_str(), position))
            .collect();

        let mut changes = Vec::new();

        for (position, section) in a_sections.iter().enumerate() {
            let change = match b_positions.get(section.id.as_str()) {
                None => SectionChange {
                    id: section.id.clone(),
                    kind: ChangeKind::Removed,
                    before: Some(section.normalized_body()),
                    after: None,
                },
                Some(&other_position) => {
                    let before = section.normalized_body();
                    let after = b_sections[other_position].normalized_body();
                    if before != after {
                        SectionChange {
                            id: section.id.clone(),
                            kind: ChangeKind::Modified,
                            before: Some(before),
                            after: Some(after),
                        }
                    } else if other_position != position {
                        SectionChange {
                            id: section.id.clone(),
                            kind: ChangeKind::Moved,
                            before: None,
                            after: None,
                        }
                    } else {
                        SectionChange {
                            id: section.id.clone(),
                            kind: ChangeKind::Unchanged,
                            before: None,
                            after: None,
                        }
                    }
                }
            };
            changes.push(change);
        }

        for section in &b_sections {
            if a_sections.iter().all(|other| other.id != section.id) {
                changes.push(SectionChange {
                    id: section.id.clone(),
                    kind: ChangeKind::Added,
                    before: None,
                    after: Some(section.normalized_body()),
                });
            }
        }

        debug!(
            "Diffed {} section(s), {} drifted",
            changes.len(),
            changes
                .iter()
                .filter(|change| change.kind != ChangeKind::Unchanged)
                .count()
        );
        DiffReport { changes }
    }
}

/// Collapse duplicate identifiers: the last occurrence supplies the
/// content, the identifier keeps its first position.
fn unique_sections(document: &Document) -> Vec<&Section> {
    let mut order: Vec<&str> = Vec::new();
    let mut latest: BTreeMap<&str, &Section> = BTreeMap::new();
    for section in &document.sections {
        if !latest.contains_key(section.id.as_str()) {
            order.push(section.id.as_str());
        }
        latest.insert(section.id.as_str(), section);
    }
    order.into_iter().map(|id| latest[id]).collect()
}
