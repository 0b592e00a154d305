//! # readmekit_render
//!
//! Document model and deterministic rendering for readmekit.
//!
//! A `Document` is an ordered sequence of sections with stable identifiers
//! derived from their headings. `SectionRenderer` turns a spec, the section
//! rule table, and a precomputed repository metadata map into a document:
//! one section per rule, in rule order, with byte-identical output for
//! identical inputs.
//!
//! Rendering is pure: storage access and metadata collection live in the
//! caller.

pub mod document;
pub mod error;
pub mod renderer;

pub use document::{normalize_body, section_id, Document, Section};
pub use error::{RenderError, RenderResult};
pub use renderer::SectionRenderer;
