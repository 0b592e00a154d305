//! Parsed document representation.
//!
//! A document is an ordered sequence of sections. Section identifiers are
//! derived from headings (case-folded, whitespace collapsed) so validation
//! and diffing are insensitive to cosmetic heading differences.

use serde::{Deserialize, Serialize};

/// Derive the stable identifier for a section heading.
pub fn section_id(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a section body for comparison: trim each line, collapse runs
/// of blank lines to one, drop leading/trailing blank lines.
pub fn normalize_body(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !lines.is_empty() && !lines.last().is_some_and(|last| last.is_empty()) {
                lines.push("");
            }
        } else {
            lines.push(trimmed);
        }
    }
    while lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// One section of a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub level: u8,
    pub body: String,
}

impl Section {
    pub fn new(title: impl Into<String>, level: u8, body: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: section_id(&title),
            title,
            level,
            body: body.into(),
        }
    }

    /// The body as compared by the validator and the differ.
    pub fn normalized_body(&self) -> String {
        normalize_body(&self.body)
    }
}

/// An ordered, immutable document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Parse markdown text into sections, splitting on heading lines.
    ///
    /// Text before the first heading carries no section and is ignored.
    pub fn parse(text: &str) -> Self {
        let mut sections: Vec<Section> = Vec::new();
        let mut current: Option<(String, u8, Vec<String>)> = None;

        for line in text.lines() {
            if line.starts_with('#') {
                if let Some((title, level, lines)) = current.take() {
                    sections.push(Section::new(title, level, body_from_lines(lines)));
                }
                let stripped = line.trim_start_matches('#');
                // Saturate rather than wrap on absurd runs of '#'.
                let level = u8::try_from(line.len() - stripped.len()).unwrap_or(u8::MAX);
                current = Some((stripped.trim().to_string(), level, Vec::new()));
            } else if let Some((_, _, lines)) = current.as_mut() {
                lines.push(line.to_string());
            }
        }
        if let Some((title, level, lines)) = current.take() {
            sections.push(Section::new(title, level, body_from_lines(lines)));
        }

        Self { sections }
    }

    /// Serialize back to markdown. Deterministic: the same document always
    /// yields byte-identical text, and `parse` inverts it.
    pub fn to_markdown(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for section in &self.sections {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!(
                "{} {}",
                "#".repeat(section.level as usize),
                section.title
            ));
            if !section.body.is_empty() {
                lines.push(String::new());
                lines.extend(section.body.lines().map(str::to_string));
            }
        }
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// First section with the given identifier.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    /// Ordinal position of the section with the given identifier.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|section| section.id == id)
    }

    /// Total character count of the serialized document.
    pub fn char_count(&self) -> usize {
        self.to_markdown().chars().count()
    }
}

fn body_from_lines(lines: Vec<String>) -> String {
    let mut lines = lines;
    while lines.first().is_some_and(|line| line.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
