//! Data models for the README specification and rule tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Repository facts supplied by the caller: path -> whether it exists.
///
/// The core never inspects a repository itself; adapters precompute this map.
pub type RepoMetadata = BTreeMap<String, bool>;

/// A fully loaded README specification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadmeSpec {
    pub project_name: String,
    pub one_sentence_value_prop: String,
    pub audience: Audience,
    pub problem_statement: String,
    pub solution_summary: String,
    pub outcomes: Vec<String>,
    pub quick_start: Vec<String>,
    pub repo_map: Vec<RepoMapEntry>,
    pub non_goals: Vec<String>,
    pub constraints: Constraints,
}

/// Who the document is written for, and who it is not.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Audience {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

/// One row of the repository map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoMapEntry {
    pub path: String,
    pub description: String,
}

/// Hard constraints the rendered document must satisfy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Constraints {
    pub max_length: usize,
    pub banned_terms: Vec<String>,
    pub tone_profile: String,
}

/// A spec field value as seen by the renderer and validator.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Scalar(&'a str),
    List(&'a [String]),
    Audience(&'a Audience),
    RepoMap(&'a [RepoMapEntry]),
    Constraints(&'a Constraints),
}

impl ReadmeSpec {
    /// Look up a field by its spec name.
    ///
    /// Section rules reference fields by these names; an unknown name is a
    /// configuration bug surfaced by the renderer, not a schema error.
    pub fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "project_name" => Some(FieldValue::Scalar(&self.project_name)),
            "one_sentence_value_prop" => Some(FieldValue::Scalar(&self.one_sentence_value_prop)),
            "audience" => Some(FieldValue::Audience(&self.audience)),
            "problem_statement" => Some(FieldValue::Scalar(&self.problem_statement)),
            "solution_summary" => Some(FieldValue::Scalar(&self.solution_summary)),
            "outcomes" => Some(FieldValue::List(&self.outcomes)),
            "quick_start" => Some(FieldValue::List(&self.quick_start)),
            "repo_map" => Some(FieldValue::RepoMap(&self.repo_map)),
            "non_goals" => Some(FieldValue::List(&self.non_goals)),
            "constraints" => Some(FieldValue::Constraints(&self.constraints)),
            _ => None,
        }
    }
}

/// How a section's content is laid out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RenderKind {
    Title,
    Paragraph,
    Audience,
    List,
    OrderedList,
    RepoMapTable,
    ConstraintsList,
}

/// One entry of the section order/requiredness table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionRule {
    pub id: String,
    pub title: String,
    #[serde(default = "default_heading_level")]
    pub heading_level: u8,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub field: Option<String>,
    pub render: RenderKind,
    #[serde(default)]
    pub intro_key: Option<String>,
    #[serde(default)]
    pub title_template: Option<String>,
}

fn default_heading_level() -> u8 {
    2
}

/// The check a validation rule performs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Structure,
    BannedTerms,
    Length,
    Tone,
    Fidelity,
}

/// Parameters attached to a validation rule definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleParams {
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "default_true")]
    pub whole_word: bool,
}

impl Default for RuleParams {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            whole_word: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// One entry of the validation rule table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationRule {
    pub id: String,
    pub kind: RuleKind,
    #[serde(default)]
    pub params: RuleParams,
}

/// Labels for the audience section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AudienceLabels {
    #[serde(default = "default_include_label")]
    pub include: String,
    #[serde(default = "default_exclude_label")]
    pub exclude: String,
}

impl Default for AudienceLabels {
    fn default() -> Self {
        Self {
            include: default_include_label(),
            exclude: default_exclude_label(),
        }
    }
}

fn default_include_label() -> String {
    "Include".to_string()
}

fn default_exclude_label() -> String {
    "Exclude".to_string()
}

/// Labels for the constraints section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConstraintLabels {
    #[serde(default = "default_max_length_label")]
    pub max_length: String,
    #[serde(default = "default_banned_terms_label")]
    pub banned_terms: String,
    #[serde(default = "default_tone_profile_label")]
    pub tone_profile: String,
}

impl Default for ConstraintLabels {
    fn default() -> Self {
        Self {
            max_length: default_max_length_label(),
            banned_terms: default_banned_terms_label(),
            tone_profile: default_tone_profile_label(),
        }
    }
}

fn default_max_length_label() -> String {
    "Max length".to_string()
}

fn default_banned_terms_label() -> String {
    "Banned terms".to_string()
}

fn default_tone_profile_label() -> String {
    "Tone profile".to_string()
}

/// Presentation of the repository map table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoMapLabels {
    #[serde(default = "default_repo_map_columns")]
    pub columns: Vec<String>,
    #[serde(default = "default_exists_true")]
    pub exists_true: String,
    #[serde(default = "default_exists_false")]
    pub exists_false: String,
}

impl Default for RepoMapLabels {
    fn default() -> Self {
        Self {
            columns: default_repo_map_columns(),
            exists_true: default_exists_true(),
            exists_false: default_exists_false(),
        }
    }
}

fn default_repo_map_columns() -> Vec<String> {
    vec![
        "Path".to_string(),
        "Description".to_string(),
        "Exists".to_string(),
    ]
}

fn default_exists_true() -> String {
    "yes".to_string()
}

fn default_exists_false() -> String {
    "no".to_string()
}

/// Presentation labels shared by the renderer and the fidelity checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderLabels {
    #[serde(default)]
    pub audience: AudienceLabels,
    #[serde(default)]
    pub constraints: ConstraintLabels,
    #[serde(default)]
    pub repo_map: RepoMapLabels,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl Default for RenderLabels {
    fn default() -> Self {
        Self {
            audience: AudienceLabels::default(),
            constraints: ConstraintLabels::default(),
            repo_map: RepoMapLabels::default(),
            placeholder: default_placeholder(),
        }
    }
}

fn default_placeholder() -> String {
    "_To be provided._".to_string()
}

/// A tone profile: what the document must not sound like.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToneProfile {
    /// Case-insensitive phrases that must not appear anywhere.
    #[serde(default)]
    pub disallowed_terms: Vec<String>,
    /// Case-insensitive regexes for disallowed rhetorical patterns.
    #[serde(default)]
    pub disallowed_patterns: Vec<String>,
    /// Optional intro paragraphs keyed by a section rule's `intro_key`.
    #[serde(default)]
    pub section_intros: BTreeMap<String, String>,
}

/// The three independent rule tables, loaded once and treated as immutable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleSet {
    pub sections: Vec<SectionRule>,
    pub rules: Vec<ValidationRule>,
    #[serde(default)]
    pub labels: RenderLabels,
    pub tone_profiles: BTreeMap<String, ToneProfile>,
}

impl RuleSet {
    /// Look up a tone profile by name.
    pub fn tone_profile(&self, name: &str) -> Option<&ToneProfile> {
        self.tone_profiles.get(name)
    }

    /// Section rules marked required, in declared order.
    pub fn required_sections(&self) -> impl Iterator<Item = &SectionRule> {
        self.sections.iter().filter(|rule| rule.required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        let spec = ReadmeSpec {
            project_name: "demo".to_string(),
            one_sentence_value_prop: "v".to_string(),
            audience: Audience::default(),
            problem_statement: "p".to_string(),
            solution_summary: "s".to_string(),
            outcomes: vec!["o".to_string()],
            quick_start: vec!["q".to_string()],
            repo_map: Vec::new(),
            non_goals: Vec::new(),
            constraints: Constraints {
                max_length: 100,
                banned_terms: Vec::new(),
                tone_profile: "plain".to_string(),
            },
        };

        assert!(matches!(
            spec.field("project_name"),
            Some(FieldValue::Scalar("demo"))
        ));
        assert!(matches!(spec.field("outcomes"), Some(FieldValue::List(_))));
        assert!(spec.field("no_such_field").is_none());
    }

    #[test]
    fn test_rule_params_defaults() {
        let params: RuleParams = serde_yaml::from_str("{}").unwrap();
        assert!(!params.case_sensitive);
        assert!(params.whole_word);
    }

    #[test]
    fn test_render_kind_snake_case() {
        let kind: RenderKind = serde_yaml::from_str("repo_map_table").unwrap();
        assert_eq!(kind, RenderKind::RepoMapTable);
    }
}
