//! # readmekit_diff
//!
//! Section-level semantic diffing for readmekit.
//!
//! `SemanticDiffer` compares two documents by section identifier and
//! reports exactly one change per identifier in the union of both key
//! sets: added, removed, modified, moved, or unchanged. Typical use is
//! drift detection between a committed document and a fresh render.

pub mod differ;

pub use differ::{ChangeKind, DiffReport, SectionChange, SemanticDiffer};
