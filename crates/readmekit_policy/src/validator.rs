//! Rule-driven document validation.
//!
//! Every active rule contributes violations to one accumulated report; the
//! validator never short-circuits, so a single pass shows every problem.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use readmekit_spec::{
    FieldValue, ReadmeSpec, RenderKind, RuleKind, RuleParams, RuleSet, SectionRule,
};

use readmekit_render::{section_id, Document, SectionRenderer};

use crate::error::{PolicyError, PolicyResult};

/// One rule violation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Violation {
    pub rule_id: String,
    pub section: Option<String>,
    pub message: String,
}

/// Ordered, accumulated validation outcome.
///
/// Empty iff the document satisfies every active rule. Pass/fail is derived
/// by the caller; a non-empty report is a normal value, never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    fn push(
        &mut self,
        rule_id: &str,
        section: Option<String>,
        message: impl Into<String>,
    ) {
        self.violations.push(Violation {
            rule_id: rule_id.to_string(),
            section,
            message: message.into(),
        });
    }
}

/// Validator running the rule-definition table against a document.
pub struct RuleValidator {
    renderer: SectionRenderer,
    ordered_item: Regex,
}

impl Default for RuleValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleValidator {
    pub fn new() -> Self {
        Self {
            renderer: SectionRenderer::new(),
            ordered_item: Regex::new(r"^(\d+)\.\s+(.*)$").unwrap(),
        }
    }

    /// Run every rule in table order and accumulate violations.
    pub fn validate(
        &self,
        document: &Document,
        spec: &ReadmeSpec,
        rules: &RuleSet,
    ) -> PolicyResult<ValidationReport> {
        let mut report = ValidationReport::default();

        for rule in &rules.rules {
            match rule.kind {
                RuleKind::Structure => {
                    self.check_structure(&rule.id, document, spec, rules, &mut report)?
                }
                RuleKind::BannedTerms => {
                    self.check_banned_terms(&rule.id, &rule.params, document, spec, rules, &mut report)?
                }
                RuleKind::Length => self.check_length(&rule.id, document, spec, &mut report),
                RuleKind::Tone => self.check_tone(&rule.id, document, spec, rules, &mut report)?,
                RuleKind::Fidelity => {
                    self.check_fidelity(&rule.id, document, spec, rules, &mut report)?
                }
            }
        }

        debug!("Validation finished with {} violation(s)", report.len());
        Ok(report)
    }

    /// Required sections present, in declared order, at the declared
    /// heading level; audience lists well-formed.
    fn check_structure(
        &self,
        rule_id: &str,
        document: &Document,
        spec: &ReadmeSpec,
        rules: &RuleSet,
        report: &mut ValidationReport,
    ) -> PolicyResult<()> {
        let mut present: Vec<String> = Vec::new();

        for section_rule in rules.required_sections() {
            let heading = self.renderer.canonical_heading(section_rule, spec)?;
            let id = section_id(&heading);
            match document.section(&id) {
                None => report.push(
                    rule_id,
                    Some(id),
                    format!("missing required section '{heading}'"),
                ),
                Some(section) => {
                    if section.level != section_rule.heading_level {
                        report.push(
                            rule_id,
                            Some(id.clone()),
                            format!(
                                "heading level for '{heading}' is {} but the rules require {}",
                                section.level, section_rule.heading_level
                            ),
                        );
                    }
                    present.push(id);
                }
            }
        }

        let mut by_position = present.clone();
        by_position.sort_by_key(|id| document.position(id).unwrap_or(usize::MAX));
        for (expected, id) in present.iter().enumerate() {
            let actual = by_position
                .iter()
                .position(|other| other == id)
                .unwrap_or(expected);
            if actual != expected {
                report.push(
                    rule_id,
                    Some(id.clone()),
                    format!(
                        "required section '{id}' expected at position {} but found at position {}",
                        expected + 1,
                        actual + 1
                    ),
                );
            }
        }

        if spec.audience.include.is_empty() {
            report.push(rule_id, None, "audience include list must not be empty");
        }
        if spec.audience.exclude.is_empty() {
            report.push(rule_id, None, "audience exclude list must not be empty");
        }
        let shared: Vec<&str> = spec
            .audience
            .include
            .iter()
            .filter(|item| {
                spec.audience
                    .exclude
                    .iter()
                    .any(|other| other.eq_ignore_ascii_case(item))
            })
            .map(String::as_str)
            .collect();
        if !shared.is_empty() {
            report.push(
                rule_id,
                None,
                format!(
                    "audience include and exclude share entries: {}",
                    shared.join(", ")
                ),
            );
        }

        Ok(())
    }

    /// Case-insensitive whole-token scan of every section body. One
    /// violation per distinct term per section, however often it occurs.
    fn check_banned_terms(
        &self,
        rule_id: &str,
        params: &RuleParams,
        document: &Document,
        spec: &ReadmeSpec,
        rules: &RuleSet,
        report: &mut ValidationReport,
    ) -> PolicyResult<()> {
        let banned_label = &rules.labels.constraints.banned_terms;

        let mut seen = HashSet::new();
        let terms: Vec<&str> = spec
            .constraints
            .banned_terms
            .iter()
            .filter(|term| !term.is_empty() && seen.insert(term.to_lowercase()))
            .map(String::as_str)
            .collect();

        // Compile each term's matcher once, not per section.
        let mut matchers: Vec<(&str, Option<Regex>)> = Vec::with_capacity(terms.len());
        for term in terms {
            let regex = if params.whole_word {
                Some(whole_word_regex(term, !params.case_sensitive)?)
            } else {
                None
            };
            matchers.push((term, regex));
        }

        for section in &document.sections {
            let haystack = sanitized_body(&section.body, banned_label);
            for (term, regex) in &matchers {
                let found = match regex {
                    Some(regex) => regex.is_match(&haystack),
                    None if params.case_sensitive => haystack.contains(*term),
                    None => haystack.to_lowercase().contains(&term.to_lowercase()),
                };
                if found {
                    report.push(
                        rule_id,
                        Some(section.id.clone()),
                        format!("banned term '{term}' present in section '{}'", section.title),
                    );
                }
            }
        }

        Ok(())
    }

    fn check_length(
        &self,
        rule_id: &str,
        document: &Document,
        spec: &ReadmeSpec,
        report: &mut ValidationReport,
    ) {
        let actual = document.char_count();
        let limit = spec.constraints.max_length;
        if actual > limit {
            report.push(
                rule_id,
                None,
                format!("document length {actual} exceeds max_length {limit}"),
            );
        }
    }

    /// Scan every section against the active tone profile's lexicon:
    /// phrases as case-insensitive substrings, patterns as regexes.
    fn check_tone(
        &self,
        rule_id: &str,
        document: &Document,
        spec: &ReadmeSpec,
        rules: &RuleSet,
        report: &mut ValidationReport,
    ) -> PolicyResult<()> {
        let profile_name = &spec.constraints.tone_profile;
        let profile = rules
            .tone_profile(profile_name)
            .ok_or_else(|| PolicyError::UnknownToneProfile(profile_name.clone()))?;

        let patterns: Vec<(String, Regex)> = profile
            .disallowed_patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|regex| (pattern.clone(), regex))
                    .map_err(|error| PolicyError::PatternCompile {
                        pattern: pattern.clone(),
                        message: error.to_string(),
                    })
            })
            .collect::<PolicyResult<_>>()?;

        for section in &document.sections {
            let lowered = section.body.to_lowercase();
            for phrase in &profile.disallowed_terms {
                if !phrase.is_empty() && lowered.contains(&phrase.to_lowercase()) {
                    report.push(
                        rule_id,
                        Some(section.id.clone()),
                        format!(
                            "tone profile '{profile_name}' disallows phrase '{phrase}' in section '{}'",
                            section.title
                        ),
                    );
                }
            }
            for (pattern, regex) in &patterns {
                if regex.is_match(&section.body) {
                    report.push(
                        rule_id,
                        Some(section.id.clone()),
                        format!(
                            "tone profile '{profile_name}' disallows pattern '{pattern}' in section '{}'",
                            section.title
                        ),
                    );
                }
            }
        }

        Ok(())
    }

    /// Section content matches what the spec dictates for each render kind.
    fn check_fidelity(
        &self,
        rule_id: &str,
        document: &Document,
        spec: &ReadmeSpec,
        rules: &RuleSet,
        report: &mut ValidationReport,
    ) -> PolicyResult<()> {
        for section_rule in &rules.sections {
            let heading = self.renderer.canonical_heading(section_rule, spec)?;
            let id = section_id(&heading);
            let Some(section) = document.section(&id) else {
                // Presence of required sections is the structure rule's job.
                continue;
            };

            match section_rule.render {
                RenderKind::Title => {
                    if section.title != heading {
                        report.push(
                            rule_id,
                            Some(id.clone()),
                            format!(
                                "title heading '{}' does not match expected '{heading}'",
                                section.title
                            ),
                        );
                    }
                }
                RenderKind::Paragraph => {
                    if let Some(FieldValue::Scalar(expected)) =
                        lookup(section_rule, spec)
                    {
                        let expected = expected.trim();
                        if !expected.is_empty()
                            && !section.normalized_body().contains(expected)
                        {
                            report.push(
                                rule_id,
                                Some(id.clone()),
                                format!(
                                    "section '{heading}' does not include the expected paragraph"
                                ),
                            );
                        }
                    }
                }
                RenderKind::Audience => {
                    if let Some(FieldValue::Audience(audience)) = lookup(section_rule, spec) {
                        if audience.include.is_empty() && audience.exclude.is_empty() {
                            continue;
                        }
                        let labels = &rules.labels.audience;
                        for label in [&labels.include, &labels.exclude] {
                            if !section.body.contains(label.as_str()) {
                                report.push(
                                    rule_id,
                                    Some(id.clone()),
                                    format!("audience section missing '{label}' label"),
                                );
                            }
                        }
                        for item in audience.include.iter().chain(&audience.exclude) {
                            if !section.body.contains(item.as_str()) {
                                report.push(
                                    rule_id,
                                    Some(id.clone()),
                                    format!("audience item missing: {item}"),
                                );
                            }
                        }
                    }
                }
                RenderKind::List => {
                    if let Some(FieldValue::List(expected)) = lookup(section_rule, spec) {
                        if extract_bullets(&section.body) != expected {
                            report.push(
                                rule_id,
                                Some(id.clone()),
                                format!("list items mismatch in section '{heading}'"),
                            );
                        }
                    }
                }
                RenderKind::OrderedList => {
                    if let Some(FieldValue::List(expected)) = lookup(section_rule, spec) {
                        if extract_ordered(&section.body, &self.ordered_item) != expected {
                            report.push(
                                rule_id,
                                Some(id.clone()),
                                format!("ordered list items mismatch in section '{heading}'"),
                            );
                        }
                    }
                }
                RenderKind::RepoMapTable => {
                    if let Some(FieldValue::RepoMap(entries)) = lookup(section_rule, spec) {
                        if entries.is_empty() {
                            continue;
                        }
                        self.check_repo_table(rule_id, &id, &heading, section.body.as_str(), entries, rules, report);
                    }
                }
                RenderKind::ConstraintsList => {
                    let labels = &rules.labels.constraints;
                    let constraints = &spec.constraints;
                    let banned = if constraints.banned_terms.is_empty() {
                        "None".to_string()
                    } else {
                        constraints.banned_terms.join(", ")
                    };
                    let expected_lines = [
                        format!("{}: {} chars", labels.max_length, constraints.max_length),
                        format!("{}: {banned}", labels.banned_terms),
                        format!("{}: {}", labels.tone_profile, constraints.tone_profile),
                    ];
                    for line in expected_lines {
                        if !section.body.contains(&line) {
                            report.push(
                                rule_id,
                                Some(id.clone()),
                                format!("constraints section missing line: {line}"),
                            );
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn check_repo_table(
        &self,
        rule_id: &str,
        id: &str,
        heading: &str,
        body: &str,
        entries: &[readmekit_spec::RepoMapEntry],
        rules: &RuleSet,
        report: &mut ValidationReport,
    ) {
        let rows = parse_table_rows(body);
        let labels = &rules.labels.repo_map;

        match rows.split_first() {
            None => {
                report.push(
                    rule_id,
                    Some(id.to_string()),
                    format!("section '{heading}' is missing its table"),
                );
            }
            Some((header, body_rows)) => {
                if header != labels.columns.as_slice() {
                    report.push(
                        rule_id,
                        Some(id.to_string()),
                        format!("table header mismatch in section '{heading}'"),
                    );
                }

                let mut expected: Vec<_> = entries.iter().collect();
                expected.sort_by(|a, b| a.path.cmp(&b.path));

                if body_rows.len() != expected.len() {
                    report.push(
                        rule_id,
                        Some(id.to_string()),
                        format!(
                            "table row count in section '{heading}' is {} but the spec lists {}",
                            body_rows.len(),
                            expected.len()
                        ),
                    );
                    return;
                }

                // The Exists column depends on repo metadata the validator
                // does not receive; path and description are checked here.
                for (row, entry) in body_rows.iter().zip(expected) {
                    let path = row.first().map(String::as_str).unwrap_or("");
                    let description = row.get(1).map(String::as_str).unwrap_or("");
                    if path != entry.path || description != entry.description {
                        report.push(
                            rule_id,
                            Some(id.to_string()),
                            format!("table row mismatch for path '{}'", entry.path),
                        );
                    }
                }
            }
        }
    }
}

fn lookup<'a>(rule: &SectionRule, spec: &'a ReadmeSpec) -> Option<FieldValue<'a>> {
    rule.field.as_deref().and_then(|name| spec.field(name))
}

/// Drop the constraints section's own banned-terms line before scanning,
/// otherwise listing the banned terms would always trip the scan.
fn sanitized_body(body: &str, banned_label: &str) -> String {
    let prefix = format!("{banned_label}:");
    body.lines()
        .filter(|line| {
            let rest = line.trim_start().trim_start_matches('-').trim_start();
            !rest.starts_with(&prefix)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn whole_word_regex(term: &str, case_insensitive: bool) -> PolicyResult<Regex> {
    let pattern = format!(r"\b{}\b", regex::escape(term));
    RegexBuilder::new(&pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|error| PolicyError::PatternCompile {
            pattern,
            message: error.to_string(),
        })
}

fn extract_bullets(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| line.trim().strip_prefix("- "))
        .map(|item| item.trim().to_string())
        .collect()
}

fn extract_ordered(body: &str, pattern: &Regex) -> Vec<String> {
    body.lines()
        .filter_map(|line| pattern.captures(line.trim()))
        .map(|captures| captures[2].trim().to_string())
        .collect()
}

fn parse_table_rows(body: &str) -> Vec<Vec<String>> {
    body.lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            let inner = trimmed.strip_prefix('|')?;
            let cells: Vec<String> = inner
                .trim_end_matches('|')
                .split('|')
                .map(|cell| cell.trim().to_string())
                .collect();
            if cells.len() < 2 || cells.iter().all(|cell| cell.replace('-', "").is_empty()) {
                return None;
            }
            Some(cells)
        })
        .collect()
}
