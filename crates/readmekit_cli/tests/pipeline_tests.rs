//! End-to-end pipeline tests over in-memory fixtures.
//!
//! Exercises the full generate/validate/diff flow the CLI wires together,
//! without touching the filesystem.

use std::collections::BTreeMap;

use readmekit_diff::{ChangeKind, SemanticDiffer};
use readmekit_policy::RuleValidator;
use readmekit_render::{Document, SectionRenderer};
use readmekit_spec::{RawRules, ReadmeSpec, RepoMetadata, RuleSet, SpecLoader};

const SPEC: &str = r#"
project_name: readmekit
one_sentence_value_prop: Canonical READMEs generated from an explicit spec.
audience:
  include:
    - library maintainers
  exclude:
    - end users looking for tutorials
problem_statement: README files drift away from what the repository contains.
solution_summary: Generate the document from a structured spec.
outcomes:
  - A README that can be regenerated byte-for-byte
quick_start:
  - Write README_SPEC.yaml
  - Run readmekit generate
repo_map:
  - path: spec/
    description: Rule tables
  - path: crates/
    description: Workspace members
non_goals:
  - Judging prose quality
constraints:
  max_length: 5200
  banned_terms:
    - magic
  tone_profile: matter_of_fact
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
  - id: solution
    title: How It Works
    required: true
    field: solution_summary
    render: paragraph
  - id: audience
    title: Who This Is For
    required: true
    field: audience
    render: audience
  - id: outcomes
    title: Outcomes
    required: true
    field: outcomes
    render: list
  - id: quick-start
    title: Quick Start
    required: true
    field: quick_start
    render: ordered_list
  - id: repo-map
    title: Repository Map
    required: true
    field: repo_map
    render: repo_map_table
  - id: non-goals
    title: Non-Goals
    field: non_goals
    render: list
  - id: constraints
    title: Constraints
    required: true
    field: constraints
    render: constraints_list
"#;

const VALIDATION: &str = r#"
rules:
  - id: required-sections
    kind: structure
  - id: banned-terms
    kind: banned_terms
  - id: max-length
    kind: length
  - id: tone
    kind: tone
  - id: content-fidelity
    kind: fidelity
"#;

const TONE: &str = r#"
profiles:
  matter_of_fact:
    disallowed_terms:
      - revolutionary
"#;

fn load() -> (ReadmeSpec, RuleSet) {
    let raw_rules = RawRules {
        sections: SECTIONS,
        validation: VALIDATION,
        tone: TONE,
    };
    SpecLoader::load(SPEC, &raw_rules).unwrap()
}

fn metadata() -> RepoMetadata {
    let mut map = BTreeMap::new();
    map.insert("spec/".to_string(), true);
    map.insert("crates/".to_string(), true);
    map
}

#[test]
fn test_generate_is_byte_identical_across_runs() {
    let (spec, rules) = load();
    let renderer = SectionRenderer::new();

    let first = renderer.render(&spec, &rules, &metadata()).unwrap();
    let second = renderer.render(&spec, &rules, &metadata()).unwrap();
    assert_eq!(first.to_markdown(), second.to_markdown());
}

#[test]
fn test_validate_of_fresh_render_is_empty() {
    let (spec, rules) = load();
    let document = SectionRenderer::new()
        .render(&spec, &rules, &metadata())
        .unwrap();

    let report = RuleValidator::new()
        .validate(&document, &spec, &rules)
        .unwrap();
    assert!(report.is_empty(), "violations: {:?}", report.violations);
}

#[test]
fn test_validate_survives_markdown_round_trip() {
    // The CLI re-parses the committed file; the parsed form must validate
    // exactly like the in-memory render.
    let (spec, rules) = load();
    let rendered = SectionRenderer::new()
        .render(&spec, &rules, &metadata())
        .unwrap();
    let reparsed = Document::parse(&rendered.to_markdown());

    let report = RuleValidator::new()
        .validate(&reparsed, &spec, &rules)
        .unwrap();
    assert!(report.is_empty(), "violations: {:?}", report.violations);
}

#[test]
fn test_diff_of_identical_renders_is_all_unchanged() {
    let (spec, rules) = load();
    let renderer = SectionRenderer::new();
    let a = renderer.render(&spec, &rules, &metadata()).unwrap();
    let b = renderer.render(&spec, &rules, &metadata()).unwrap();

    let report = SemanticDiffer::diff(&a, &b);
    assert!(report.is_clean());
    assert!(report
        .changes
        .iter()
        .all(|change| change.kind == ChangeKind::Unchanged));
}

#[test]
fn test_hand_edit_shows_up_as_modified() {
    let (spec, rules) = load();
    let expected = SectionRenderer::new()
        .render(&spec, &rules, &metadata())
        .unwrap();

    let edited = expected
        .to_markdown()
        .replace("Generate the document", "Hand-edit the document");
    let actual = Document::parse(&edited);

    let report = SemanticDiffer::diff(&actual, &expected);
    let drifted: Vec<_> = report.drifted().collect();
    assert_eq!(drifted.len(), 1);
    assert_eq!(drifted[0].id, "how it works");
    assert_eq!(drifted[0].kind, ChangeKind::Modified);
    assert!(drifted[0]
        .after
        .as_deref()
        .unwrap()
        .contains("Generate the document"));
}

#[test]
fn test_deleted_section_shows_up_as_added_in_fresh_render() {
    let (spec, rules) = load();
    let expected = SectionRenderer::new()
        .render(&spec, &rules, &metadata())
        .unwrap();

    let mut actual = expected.clone();
    actual.sections.retain(|section| section.id != "outcomes");

    let report = SemanticDiffer::diff(&actual, &expected);
    let kinds: Vec<_> = report
        .drifted()
        .map(|change| (change.id.as_str(), change.kind))
        .collect();
    // Everything after the deleted section shifts position.
    assert!(kinds.contains(&("outcomes", ChangeKind::Added)));
    assert!(kinds
        .iter()
        .all(|(id, kind)| *id == "outcomes" || *kind == ChangeKind::Moved));
}

#[test]
fn test_banned_term_flows_through_pipeline() {
    let (mut spec, rules) = load();
    spec.solution_summary = "It just works by magic.".to_string();

    let document = SectionRenderer::new()
        .render(&spec, &rules, &metadata())
        .unwrap();
    let report = RuleValidator::new()
        .validate(&document, &spec, &rules)
        .unwrap();

    let banned: Vec<_> = report
        .violations
        .iter()
        .filter(|violation| violation.rule_id == "banned-terms")
        .collect();
    assert_eq!(banned.len(), 1);
    assert_eq!(banned[0].section.as_deref(), Some("how it works"));
}
