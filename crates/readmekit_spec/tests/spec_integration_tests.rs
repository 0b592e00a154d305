//! Integration tests for spec and rule-table loading.

use readmekit_spec::{
    LoadError, RawRules, RenderKind, RuleKind, RuleLoadError, SchemaError, SpecLoader,
};

const SPEC: &str = r#"
project_name: readmekit
one_sentence_value_prop: Canonical READMEs generated from an explicit spec.
audience:
  include:
    - library maintainers
    - release engineers
  exclude:
    - end users looking for tutorials
problem_statement: >
  README files drift away from what the repository actually contains.
solution_summary: >
  Generate the document from a structured spec and keep it honest with
  rule-based validation and section-level diffing.
outcomes:
  - A README that can be regenerated byte-for-byte
  - Drift that shows up as a failing check, not a surprise
quick_start:
  - Write README_SPEC.yaml
  - Run readmekit generate
  - Commit the result
repo_map:
  - path: crates/
    description: Workspace members
  - path: spec/
    description: Rule tables
non_goals:
  - Judging prose quality
  - Network or model-based generation
constraints:
  max_length: 5200
  banned_terms:
    - magic
    - blazingly
  tone_profile: matter_of_fact
"#;

const SECTIONS: &str = r#"
sections:
  - id: title
    title: Title
    heading_level: 1
    required: true
    render: title
    title_template: "{project_name}"
  - id: value-prop
    title: What This Is
    required: true
    field: one_sentence_value_prop
    render: paragraph
    intro_key: value_prop
  - id: audience
    title: Who This Is For
    required: true
    field: audience
    render: audience
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
labels:
  audience:
    include: Include
    exclude: Exclude
  constraints:
    max_length: Max length
    banned_terms: Banned terms
    tone_profile: Tone profile
  repo_map:
    columns: [Path, Description, Exists]
    exists_true: "yes"
    exists_false: "no"
rules:
  - id: required-sections
    kind: structure
  - id: banned-terms
    kind: banned_terms
    params:
      whole_word: true
      case_sensitive: false
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
      - game-changing
      - world-class
    disallowed_patterns:
      - '\b\w+er than ever\b'
    section_intros:
      value_prop: "In one sentence:"
"#;

fn raw_rules() -> RawRules<'static> {
    RawRules {
        sections: SECTIONS,
        validation: VALIDATION,
        tone: TONE,
    }
}

#[test]
fn test_full_fixture_loads() {
    let (spec, rules) = SpecLoader::load(SPEC, &raw_rules()).unwrap();

    assert_eq!(spec.project_name, "readmekit");
    assert_eq!(spec.outcomes.len(), 2);
    assert_eq!(spec.quick_start.len(), 3);
    assert_eq!(spec.repo_map.len(), 2);
    assert_eq!(spec.constraints.max_length, 5200);
    assert_eq!(spec.constraints.banned_terms, vec!["magic", "blazingly"]);

    assert_eq!(rules.sections.len(), 10);
    assert_eq!(rules.sections[0].render, RenderKind::Title);
    assert!(rules.sections[0].required);
    assert!(!rules.sections[8].required);
    assert_eq!(rules.rules.len(), 5);
    assert_eq!(rules.rules[1].kind, RuleKind::BannedTerms);
    assert!(rules.rules[1].params.whole_word);

    let profile = rules.tone_profile("matter_of_fact").unwrap();
    assert_eq!(profile.disallowed_terms.len(), 3);
    assert_eq!(
        profile.section_intros.get("value_prop").map(String::as_str),
        Some("In one sentence:")
    );
}

#[test]
fn test_required_sections_in_declared_order() {
    let (_, rules) = SpecLoader::load(SPEC, &raw_rules()).unwrap();
    let required: Vec<_> = rules.required_sections().map(|rule| rule.id.as_str()).collect();
    assert_eq!(
        required,
        vec![
            "title",
            "value-prop",
            "audience",
            "why",
            "solution",
            "outcomes",
            "quick-start",
            "repo-map",
            "constraints"
        ]
    );
}

#[test]
fn test_schema_error_names_every_missing_field() {
    let stripped = "project_name: readmekit\n";
    let error = SpecLoader::load_spec(stripped).unwrap_err();

    let message = error.to_string();
    for field in [
        "one_sentence_value_prop",
        "audience",
        "problem_statement",
        "solution_summary",
        "outcomes",
        "quick_start",
        "repo_map",
        "non_goals",
        "constraints",
    ] {
        assert!(message.contains(field), "missing '{field}' in: {message}");
    }
}

#[test]
fn test_non_mapping_spec_rejected() {
    let error = SpecLoader::load_spec("- just\n- a\n- list\n").unwrap_err();
    assert!(matches!(error, SchemaError::NotAMapping));
}

#[test]
fn test_spec_tone_profile_must_exist() {
    let spec = SPEC.replace("tone_profile: matter_of_fact", "tone_profile: marketing");
    let error = SpecLoader::load(&spec, &raw_rules()).unwrap_err();
    assert!(matches!(
        error,
        LoadError::Rules(RuleLoadError::UnknownToneProfile(name)) if name == "marketing"
    ));
}

#[test]
fn test_empty_sections_table_rejected() {
    let rules = RawRules {
        sections: "sections: []\n",
        validation: VALIDATION,
        tone: TONE,
    };
    let error = SpecLoader::load_rules(&rules).unwrap_err();
    assert!(matches!(error, RuleLoadError::EmptySections));
}
