//! Deterministic README rendering from a spec and section rules.

use regex::Regex;
use tracing::debug;

use readmekit_spec::{
    FieldValue, ReadmeSpec, RenderKind, RepoMetadata, RuleSet, SectionRule, ToneProfile,
};

use crate::document::{Document, Section};
use crate::error::{RenderError, RenderResult};

/// Pure renderer: identical `(spec, rules, metadata)` inputs always yield
/// byte-identical documents. No timestamps, no generated identifiers, no
/// locale-dependent formatting.
pub struct SectionRenderer {
    template_pattern: Regex,
}

impl Default for SectionRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionRenderer {
    pub fn new() -> Self {
        Self {
            // Match {field_name} placeholders in title templates
            template_pattern: Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").unwrap(),
        }
    }

    /// Render one section per section rule, in rule order.
    pub fn render(
        &self,
        spec: &ReadmeSpec,
        rules: &RuleSet,
        metadata: &RepoMetadata,
    ) -> RenderResult<Document> {
        let profile = rules
            .tone_profile(&spec.constraints.tone_profile)
            .ok_or_else(|| RenderError::UnknownToneProfile(spec.constraints.tone_profile.clone()))?;

        let mut sections = Vec::with_capacity(rules.sections.len());
        for rule in &rules.sections {
            if let Some(section) = self.render_section(rule, spec, rules, metadata, profile)? {
                sections.push(section);
            }
        }

        let document = Document::new(sections);
        let actual = document.char_count();
        if actual > spec.constraints.max_length {
            return Err(RenderError::LengthExceeded {
                actual,
                limit: spec.constraints.max_length,
            });
        }

        debug!(
            "Rendered {} sections, {} characters",
            document.sections.len(),
            actual
        );
        Ok(document)
    }

    /// The heading a section rule produces for a given spec.
    ///
    /// Title sections expand their template; all others use the rule title
    /// verbatim. The validator uses the same headings for its checks.
    pub fn canonical_heading(&self, rule: &SectionRule, spec: &ReadmeSpec) -> RenderResult<String> {
        match rule.render {
            RenderKind::Title => {
                let template = rule.title_template.as_deref().unwrap_or("{project_name}");
                self.expand_template(template, &rule.id, spec)
            }
            _ => Ok(rule.title.clone()),
        }
    }

    fn render_section(
        &self,
        rule: &SectionRule,
        spec: &ReadmeSpec,
        rules: &RuleSet,
        metadata: &RepoMetadata,
        profile: &ToneProfile,
    ) -> RenderResult<Option<Section>> {
        let heading = self.canonical_heading(rule, spec)?;

        if rule.render == RenderKind::Title {
            return Ok(Some(Section::new(heading, rule.heading_level, "")));
        }

        let content = self.render_content(rule, spec, rules, metadata)?;

        let content = if content.is_empty() {
            if rule.required {
                // Required sections are always emitted; an empty backing
                // field becomes an explicit placeholder block.
                vec![rules.labels.placeholder.clone()]
            } else {
                return Ok(None);
            }
        } else {
            content
        };

        let mut lines: Vec<String> = Vec::new();
        if let Some(intro) = rule
            .intro_key
            .as_ref()
            .and_then(|key| profile.section_intros.get(key))
        {
            lines.push(intro.clone());
            lines.push(String::new());
        }
        lines.extend(content);

        Ok(Some(Section::new(
            heading,
            rule.heading_level,
            lines.join("\n"),
        )))
    }

    fn render_content(
        &self,
        rule: &SectionRule,
        spec: &ReadmeSpec,
        rules: &RuleSet,
        metadata: &RepoMetadata,
    ) -> RenderResult<Vec<String>> {
        let field_name = rule
            .field
            .as_deref()
            .ok_or_else(|| RenderError::MissingField {
                section: rule.id.clone(),
            })?;
        let value = spec
            .field(field_name)
            .ok_or_else(|| RenderError::UnknownField {
                section: rule.id.clone(),
                field: field_name.to_string(),
            })?;

        let mismatch = |expected: &'static str| RenderError::FieldMismatch {
            section: rule.id.clone(),
            field: field_name.to_string(),
            expected,
        };

        match rule.render {
            RenderKind::Title => unreachable!("title sections have no content"),
            RenderKind::Paragraph => {
                let FieldValue::Scalar(text) = value else {
                    return Err(mismatch("string"));
                };
                let text = text.trim();
                if text.is_empty() {
                    Ok(Vec::new())
                } else {
                    Ok(vec![text.to_string()])
                }
            }
            RenderKind::Audience => {
                let FieldValue::Audience(audience) = value else {
                    return Err(mismatch("audience mapping"));
                };
                if audience.include.is_empty() && audience.exclude.is_empty() {
                    return Ok(Vec::new());
                }
                let labels = &rules.labels.audience;
                let mut lines = vec![format!("**{}**", labels.include)];
                lines.extend(audience.include.iter().map(|item| format!("- {item}")));
                lines.push(String::new());
                lines.push(format!("**{}**", labels.exclude));
                lines.extend(audience.exclude.iter().map(|item| format!("- {item}")));
                Ok(lines)
            }
            RenderKind::List => {
                let FieldValue::List(items) = value else {
                    return Err(mismatch("list"));
                };
                Ok(items.iter().map(|item| format!("- {item}")).collect())
            }
            RenderKind::OrderedList => {
                let FieldValue::List(items) = value else {
                    return Err(mismatch("list"));
                };
                Ok(items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| format!("{}. {item}", index + 1))
                    .collect())
            }
            RenderKind::RepoMapTable => {
                let FieldValue::RepoMap(entries) = value else {
                    return Err(mismatch("repo map"));
                };
                if entries.is_empty() {
                    return Ok(Vec::new());
                }
                let labels = &rules.labels.repo_map;

                // Sort by path so output is independent of spec ordering.
                let mut entries: Vec<_> = entries.iter().collect();
                entries.sort_by(|a, b| a.path.cmp(&b.path));

                let mut lines = vec![
                    format!("| {} |", labels.columns.join(" | ")),
                    format!("|{}", " --- |".repeat(labels.columns.len())),
                ];
                for entry in entries {
                    let exists = metadata.get(&entry.path).copied().unwrap_or(false);
                    let exists_label = if exists {
                        &labels.exists_true
                    } else {
                        &labels.exists_false
                    };
                    lines.push(format!(
                        "| {} | {} | {} |",
                        entry.path, entry.description, exists_label
                    ));
                }
                Ok(lines)
            }
            RenderKind::ConstraintsList => {
                let FieldValue::Constraints(constraints) = value else {
                    return Err(mismatch("constraints mapping"));
                };
                let labels = &rules.labels.constraints;
                let banned = if constraints.banned_terms.is_empty() {
                    "None".to_string()
                } else {
                    constraints.banned_terms.join(", ")
                };
                Ok(vec![
                    format!(
                        "- {}: {} chars",
                        labels.max_length, constraints.max_length
                    ),
                    format!("- {}: {}", labels.banned_terms, banned),
                    format!(
                        "- {}: {}",
                        labels.tone_profile, constraints.tone_profile
                    ),
                ])
            }
        }
    }

    fn expand_template(
        &self,
        template: &str,
        section: &str,
        spec: &ReadmeSpec,
    ) -> RenderResult<String> {
        let mut out = String::new();
        let mut last = 0;
        for captures in self.template_pattern.captures_iter(template) {
            let matched = captures.get(0).expect("capture 0 always present");
            out.push_str(&template[last..matched.start()]);
            let name = &captures[1];
            match spec.field(name) {
                Some(FieldValue::Scalar(value)) => out.push_str(value),
                Some(_) => {
                    return Err(RenderError::FieldMismatch {
                        section: section.to_string(),
                        field: name.to_string(),
                        expected: "string",
                    })
                }
                None => {
                    return Err(RenderError::UnknownField {
                        section: section.to_string(),
                        field: name.to_string(),
                    })
                }
            }
            last = matched.end();
        }
        out.push_str(&template[last..]);
        Ok(out)
    }
}
