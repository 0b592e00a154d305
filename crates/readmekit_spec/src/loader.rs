//! Parsing of raw specification and rule inputs into typed models.

use std::collections::{BTreeMap, HashSet};

use regex::Regex;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{FieldIssue, LoadError, RuleLoadError, SchemaError, SpecResult};
use crate::models::{
    Audience, Constraints, ReadmeSpec, RenderLabels, RepoMapEntry, RuleSet, SectionRule,
    ToneProfile, ValidationRule,
};

/// The three raw rule tables, as read from storage.
#[derive(Debug, Clone, Copy)]
pub struct RawRules<'a> {
    pub sections: &'a str,
    pub validation: &'a str,
    pub tone: &'a str,
}

/// Loader for specification and rule inputs.
pub struct SpecLoader;

impl SpecLoader {
    /// Load and cross-check a spec and its rule tables in one step.
    ///
    /// Schema problems and rule-table problems are reported through their
    /// own error types; the spec's tone profile must exist in the lexicon.
    pub fn load(raw_spec: &str, raw_rules: &RawRules<'_>) -> SpecResult<(ReadmeSpec, RuleSet)> {
        let spec = Self::load_spec(raw_spec)?;
        let rules = Self::load_rules(raw_rules)?;

        if !rules
            .tone_profiles
            .contains_key(&spec.constraints.tone_profile)
        {
            return Err(LoadError::Rules(RuleLoadError::UnknownToneProfile(
                spec.constraints.tone_profile.clone(),
            )));
        }

        Ok((spec, rules))
    }

    /// Parse a raw specification document.
    ///
    /// Every missing required field and every shape mismatch is collected
    /// into a single `SchemaError` so one attempt shows all problems.
    pub fn load_spec(raw: &str) -> Result<ReadmeSpec, SchemaError> {
        let value: Value = serde_yaml::from_str(raw)?;
        let map = value.as_mapping().ok_or(SchemaError::NotAMapping)?;

        let mut issues = Vec::new();

        let project_name = scalar_field(map, "project_name", &mut issues);
        let one_sentence_value_prop = scalar_field(map, "one_sentence_value_prop", &mut issues);
        let audience = audience_field(map, &mut issues);
        let problem_statement = scalar_field(map, "problem_statement", &mut issues);
        let solution_summary = scalar_field(map, "solution_summary", &mut issues);
        let outcomes = list_field(map, "outcomes", &mut issues);
        let quick_start = list_field(map, "quick_start", &mut issues);
        let repo_map = repo_map_field(map, &mut issues);
        let non_goals = list_field(map, "non_goals", &mut issues);
        let constraints = constraints_field(map, &mut issues);

        if !issues.is_empty() {
            return Err(SchemaError::Fields(issues));
        }

        debug!("Loaded spec for project '{}'", project_name);

        Ok(ReadmeSpec {
            project_name,
            one_sentence_value_prop,
            audience,
            problem_statement,
            solution_summary,
            outcomes,
            quick_start,
            repo_map,
            non_goals,
            constraints,
        })
    }

    /// Parse the three rule tables and enforce their invariants.
    pub fn load_rules(raw: &RawRules<'_>) -> Result<RuleSet, RuleLoadError> {
        #[derive(Deserialize)]
        struct SectionsDoc {
            sections: Vec<SectionRule>,
        }

        #[derive(Deserialize)]
        struct ValidationDoc {
            #[serde(default)]
            labels: RenderLabels,
            #[serde(default)]
            rules: Vec<ValidationRule>,
        }

        #[derive(Deserialize)]
        struct ToneDoc {
            profiles: BTreeMap<String, ToneProfile>,
        }

        let sections_doc: SectionsDoc =
            serde_yaml::from_str(raw.sections).map_err(|source| RuleLoadError::Yaml {
                table: "sections",
                source,
            })?;
        let validation_doc: ValidationDoc =
            serde_yaml::from_str(raw.validation).map_err(|source| RuleLoadError::Yaml {
                table: "validation",
                source,
            })?;
        let tone_doc: ToneDoc =
            serde_yaml::from_str(raw.tone).map_err(|source| RuleLoadError::Yaml {
                table: "tone",
                source,
            })?;

        if sections_doc.sections.is_empty() {
            return Err(RuleLoadError::EmptySections);
        }

        let mut seen = HashSet::new();
        for rule in &sections_doc.sections {
            if !seen.insert(rule.id.as_str()) {
                return Err(RuleLoadError::DuplicateSectionId(rule.id.clone()));
            }
        }

        let mut seen = HashSet::new();
        for rule in &validation_doc.rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(RuleLoadError::DuplicateRuleId(rule.id.clone()));
            }
        }

        // Reject malformed tone patterns at load time so later scans cannot
        // fail on configuration that was never valid.
        for (name, profile) in &tone_doc.profiles {
            for pattern in &profile.disallowed_patterns {
                if let Err(error) = Regex::new(pattern) {
                    return Err(RuleLoadError::InvalidPattern {
                        profile: name.clone(),
                        pattern: pattern.clone(),
                        message: error.to_string(),
                    });
                }
            }
        }

        debug!(
            "Loaded {} section rules, {} validation rules, {} tone profiles",
            sections_doc.sections.len(),
            validation_doc.rules.len(),
            tone_doc.profiles.len()
        );

        Ok(RuleSet {
            sections: sections_doc.sections,
            rules: validation_doc.rules,
            labels: validation_doc.labels,
            tone_profiles: tone_doc.profiles,
        })
    }
}

fn scalar_field(map: &Mapping, name: &str, issues: &mut Vec<FieldIssue>) -> String {
    match map.get(name) {
        None => {
            issues.push(FieldIssue::new(name, "missing required field"));
            String::new()
        }
        Some(Value::String(text)) => {
            if text.trim().is_empty() {
                issues.push(FieldIssue::new(name, "must be a non-empty string"));
            }
            text.clone()
        }
        Some(_) => {
            issues.push(FieldIssue::new(name, "must be a string"));
            String::new()
        }
    }
}

fn string_items(value: &Value, name: &str, issues: &mut Vec<FieldIssue>) -> Vec<String> {
    match value {
        Value::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(text) => out.push(text.clone()),
                    _ => {
                        issues.push(FieldIssue::new(name, "must be a list of strings"));
                        return Vec::new();
                    }
                }
            }
            out
        }
        _ => {
            issues.push(FieldIssue::new(name, "must be a list of strings"));
            Vec::new()
        }
    }
}

fn list_field(map: &Mapping, name: &str, issues: &mut Vec<FieldIssue>) -> Vec<String> {
    match map.get(name) {
        None => {
            issues.push(FieldIssue::new(name, "missing required field"));
            Vec::new()
        }
        Some(value) => {
            let items = string_items(value, name, issues);
            if items.is_empty() && matches!(value, Value::Sequence(seq) if seq.is_empty()) {
                issues.push(FieldIssue::new(name, "must not be empty"));
            }
            items
        }
    }
}

fn audience_field(map: &Mapping, issues: &mut Vec<FieldIssue>) -> Audience {
    let value = match map.get("audience") {
        None => {
            issues.push(FieldIssue::new("audience", "missing required field"));
            return Audience::default();
        }
        Some(value) => value,
    };

    let inner = match value.as_mapping() {
        Some(inner) => inner,
        None => {
            issues.push(FieldIssue::new("audience", "must be a mapping"));
            return Audience::default();
        }
    };

    let include = match inner.get("include") {
        Some(value) => string_items(value, "audience.include", issues),
        None => {
            issues.push(FieldIssue::new("audience.include", "missing required field"));
            Vec::new()
        }
    };
    let exclude = match inner.get("exclude") {
        Some(value) => string_items(value, "audience.exclude", issues),
        None => {
            issues.push(FieldIssue::new("audience.exclude", "missing required field"));
            Vec::new()
        }
    };

    Audience { include, exclude }
}

fn repo_map_field(map: &Mapping, issues: &mut Vec<FieldIssue>) -> Vec<RepoMapEntry> {
    let value = match map.get("repo_map") {
        None => {
            issues.push(FieldIssue::new("repo_map", "missing required field"));
            return Vec::new();
        }
        Some(value) => value,
    };

    let items = match value.as_sequence() {
        Some(items) => items,
        None => {
            issues.push(FieldIssue::new(
                "repo_map",
                "must be a list of path/description entries",
            ));
            return Vec::new();
        }
    };

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let entry = item.as_mapping().and_then(|entry| {
            let path = entry.get("path")?.as_str()?;
            let description = entry.get("description")?.as_str()?;
            Some(RepoMapEntry {
                path: path.to_string(),
                description: description.to_string(),
            })
        });
        match entry {
            Some(entry) => entries.push(entry),
            None => {
                issues.push(FieldIssue::new(
                    "repo_map",
                    "entries require string path and description",
                ));
                return Vec::new();
            }
        }
    }

    entries
}

fn constraints_field(map: &Mapping, issues: &mut Vec<FieldIssue>) -> Constraints {
    let fallback = Constraints {
        max_length: 0,
        banned_terms: Vec::new(),
        tone_profile: String::new(),
    };

    let value = match map.get("constraints") {
        None => {
            issues.push(FieldIssue::new("constraints", "missing required field"));
            return fallback;
        }
        Some(value) => value,
    };

    let inner = match value.as_mapping() {
        Some(inner) => inner,
        None => {
            issues.push(FieldIssue::new("constraints", "must be a mapping"));
            return fallback;
        }
    };

    let max_length = match inner.get("max_length").and_then(Value::as_u64) {
        Some(length) => length as usize,
        None => {
            issues.push(FieldIssue::new(
                "constraints.max_length",
                "must be a non-negative integer",
            ));
            0
        }
    };

    // An empty banned-terms list is legal; the field itself is not optional.
    let banned_terms = match inner.get("banned_terms") {
        Some(value) => string_items(value, "constraints.banned_terms", issues),
        None => {
            issues.push(FieldIssue::new(
                "constraints.banned_terms",
                "missing required field",
            ));
            Vec::new()
        }
    };

    let tone_profile = match inner.get("tone_profile") {
        Some(Value::String(name)) if !name.trim().is_empty() => name.clone(),
        Some(_) => {
            issues.push(FieldIssue::new(
                "constraints.tone_profile",
                "must be a non-empty string",
            ));
            String::new()
        }
        None => {
            issues.push(FieldIssue::new(
                "constraints.tone_profile",
                "missing required field",
            ));
            String::new()
        }
    };

    Constraints {
        max_length,
        banned_terms,
        tone_profile,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;

    const VALID_SPEC: &str = r#"
project_name: demo
one_sentence_value_prop: One tool for canonical READMEs.
audience:
  include: [maintainers]
  exclude: [end users]
problem_statement: READMEs drift from reality.
solution_summary: Generate them from a spec.
outcomes:
  - A reproducible README
quick_start:
  - Install the tool
repo_map:
  - path: src/
    description: Source code
non_goals:
  - Prose quality judgment
constraints:
  max_length: 5200
  banned_terms: [magic]
  tone_profile: plain
"#;

    const SECTIONS: &str = r#"
sections:
  - id: title
    title: Title
    heading_level: 1
    required: true
    render: title
  - id: why
    title: Why
    required: true
    field: problem_statement
    render: paragraph
"#;

    const VALIDATION: &str = r#"
rules:
  - id: required-sections
    kind: structure
  - id: banned-terms
    kind: banned_terms
"#;

    const TONE: &str = r#"
profiles:
  plain:
    disallowed_terms: [revolutionary]
"#;

    #[test]
    fn test_load_valid_inputs() {
        let raw_rules = RawRules {
            sections: SECTIONS,
            validation: VALIDATION,
            tone: TONE,
        };
        let (spec, rules) = SpecLoader::load(VALID_SPEC, &raw_rules).unwrap();

        assert_eq!(spec.project_name, "demo");
        assert_eq!(spec.constraints.max_length, 5200);
        assert_eq!(rules.sections.len(), 2);
        assert_eq!(rules.rules.len(), 2);
        assert!(rules.tone_profile("plain").is_some());
    }

    #[test]
    fn test_missing_field_is_named() {
        let raw = VALID_SPEC.replace("problem_statement: READMEs drift from reality.\n", "");
        let error = SpecLoader::load_spec(&raw).unwrap_err();

        match error {
            SchemaError::Fields(issues) => {
                assert!(issues.iter().any(|issue| issue.field == "problem_statement"));
            }
            other => panic!("expected field issues, got {other:?}"),
        }
    }

    #[test]
    fn test_all_problems_collected_in_one_pass() {
        let raw = r#"
project_name: 42
audience: not-a-mapping
outcomes: scalar
constraints:
  max_length: plenty
  banned_terms: []
  tone_profile: plain
"#;
        let error = SpecLoader::load_spec(raw).unwrap_err();

        match error {
            SchemaError::Fields(issues) => {
                let fields: Vec<_> = issues.iter().map(|issue| issue.field.as_str()).collect();
                assert!(fields.contains(&"project_name"));
                assert!(fields.contains(&"audience"));
                assert!(fields.contains(&"outcomes"));
                assert!(fields.contains(&"constraints.max_length"));
                // Missing fields are reported alongside shape mismatches.
                assert!(fields.contains(&"problem_statement"));
                assert!(fields.contains(&"quick_start"));
            }
            other => panic!("expected field issues, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_section_id_rejected() {
        let sections = r#"
sections:
  - id: why
    title: Why
    render: paragraph
  - id: why
    title: Why Again
    render: paragraph
"#;
        let raw_rules = RawRules {
            sections,
            validation: VALIDATION,
            tone: TONE,
        };
        let error = SpecLoader::load_rules(&raw_rules).unwrap_err();
        assert!(matches!(error, RuleLoadError::DuplicateSectionId(id) if id == "why"));
    }

    #[test]
    fn test_duplicate_rule_id_rejected() {
        let validation = r#"
rules:
  - id: check
    kind: structure
  - id: check
    kind: length
"#;
        let raw_rules = RawRules {
            sections: SECTIONS,
            validation,
            tone: TONE,
        };
        let error = SpecLoader::load_rules(&raw_rules).unwrap_err();
        assert!(matches!(error, RuleLoadError::DuplicateRuleId(id) if id == "check"));
    }

    #[test]
    fn test_unknown_tone_profile_rejected() {
        let spec = VALID_SPEC.replace("tone_profile: plain", "tone_profile: breathless");
        let raw_rules = RawRules {
            sections: SECTIONS,
            validation: VALIDATION,
            tone: TONE,
        };
        let error = SpecLoader::load(&spec, &raw_rules).unwrap_err();
        assert!(matches!(
            error,
            LoadError::Rules(RuleLoadError::UnknownToneProfile(name)) if name == "breathless"
        ));
    }

    #[test]
    fn test_invalid_tone_pattern_rejected() {
        let tone = r#"
profiles:
  plain:
    disallowed_patterns: ["([unclosed"]
"#;
        let raw_rules = RawRules {
            sections: SECTIONS,
            validation: VALIDATION,
            tone,
        };
        let error = SpecLoader::load_rules(&raw_rules).unwrap_err();
        assert!(matches!(error, RuleLoadError::InvalidPattern { profile, .. } if profile == "plain"));
    }

    #[test]
    fn test_empty_list_field_rejected() {
        let raw = VALID_SPEC.replace(
            "outcomes:\n  - A reproducible README",
            "outcomes: []",
        );
        let error = SpecLoader::load_spec(&raw).unwrap_err();
        match error {
            SchemaError::Fields(issues) => {
                assert!(issues
                    .iter()
                    .any(|issue| issue.field == "outcomes" && issue.problem.contains("empty")));
            }
            other => panic!("expected field issues, got {other:?}"),
        }
    }
}
