//! Applies a rule catalog to parsed manifests.

use crate::validator::catalog::{Check, RuleCatalog, ValidationRule};
use crate::validator::document::{FieldPath, Lookup, ManifestDocument, type_name};
use crate::validator::types::{Finding, RuleCode, Severity};
use serde::Serialize;
use serde_yaml::Value;

/// Outcome of validating one manifest.
///
/// Two validations of the same document with the same validator compare
/// equal; there is no hidden state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// The declared kind, as written. `None` when `kind` is absent.
    pub kind: Option<String>,
    /// Whether the manifest passed.
    pub valid: bool,
    /// Findings in rule-evaluation order.
    pub findings: Vec<Finding>,
    /// `metadata.name`, when available.
    pub name: Option<String>,
    /// `metadata.namespace`, when available.
    pub namespace: Option<String>,
}

impl ValidationResult {
    /// Assemble a result, deriving validity from the findings.
    ///
    /// Without `strict`, only error findings invalidate; with it, any finding does.
    pub fn new(
        kind: Option<String>,
        name: Option<String>,
        namespace: Option<String>,
        findings: Vec<Finding>,
        strict: bool,
    ) -> Self {
        let valid = findings
            .iter()
            .all(|f| f.severity == Severity::Warning && !strict);
        Self {
            kind,
            valid,
            findings,
            name,
            namespace,
        }
    }

    /// Number of error-severity findings.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of warning-severity findings.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    /// The highest severity among the findings.
    pub fn max_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }
}

/// Validates manifests against an injected rule catalog.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'c> {
    catalog: &'c RuleCatalog,
    strict: bool,
}

impl<'c> Validator<'c> {
    /// Create a validator over a catalog. Strict mode is off.
    pub fn new(catalog: &'c RuleCatalog) -> Self {
        Self {
            catalog,
            strict: false,
        }
    }

    /// Promote warnings to errors for validity purposes.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Whether strict mode is on.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// The catalog in use.
    pub fn catalog(&self) -> &'c RuleCatalog {
        self.catalog
    }

    /// Validate a single document.
    ///
    /// An absent or unsupported kind yields exactly one error finding and no
    /// further rule evaluation. Otherwise every rule of the kind runs and all
    /// findings are collected.
    pub fn validate(&self, document: &ManifestDocument) -> ValidationResult {
        let declared = document.get("kind").filter(|v| !v.is_null());
        let kind_label = declared.map(render_scalar);
        let name = document.name().map(str::to_string);
        let namespace = document.namespace().map(str::to_string);

        let rules = document
            .kind()
            .and_then(|kind| self.catalog.lookup(kind))
            .map(|(_, rules)| rules);

        let Some(rules) = rules else {
            log::debug!(
                "document {}: unsupported kind {:?}",
                document.index(),
                kind_label
            );
            let finding = Finding::error(
                RuleCode::UNKNOWN_KIND,
                format!(
                    "unsupported or unknown kind: {}",
                    kind_label.as_deref().unwrap_or("<missing>")
                ),
            )
            .with_path("kind");
            return ValidationResult::new(kind_label, name, namespace, vec![finding], self.strict);
        };

        let mut findings = Vec::new();
        for rule in rules {
            evaluate(rule, document, &mut findings);
        }

        log::debug!(
            "document {} ({}): {} rule(s), {} finding(s)",
            document.index(),
            kind_label.as_deref().unwrap_or_default(),
            rules.len(),
            findings.len()
        );

        ValidationResult::new(kind_label, name, namespace, findings, self.strict)
    }
}

/// Pick the path a rule should inspect.
///
/// The first path holding a value wins. Failing that, the first path that ran
/// into a non-mapping is reported, and otherwise the primary path is missing.
fn resolve<'d>(rule: &'d ValidationRule, document: &'d ManifestDocument) -> (&'d FieldPath, Lookup<'d>) {
    let lookups: Vec<_> = rule
        .paths()
        .map(|path| (path, document.lookup(path)))
        .collect();

    lookups
        .iter()
        .find(|(_, lookup)| lookup.exists())
        .or_else(|| {
            lookups
                .iter()
                .find(|(_, lookup)| matches!(lookup, Lookup::NotAMapping { .. }))
        })
        .copied()
        .unwrap_or((rule.primary_path(), Lookup::Missing))
}

fn evaluate(rule: &ValidationRule, document: &ManifestDocument, findings: &mut Vec<Finding>) {
    let (path, lookup) = resolve(rule, document);
    let per_item = matches!(rule.check, Check::EachItemHasFields(_));
    let report = |message: String, at: String| {
        Finding::new(rule.severity, rule.code.clone(), message).with_path(at)
    };

    match lookup {
        // A missing or malformed container list is reported by the presence rule.
        Lookup::Missing | Lookup::NotAMapping { .. } if per_item => {}
        Lookup::Missing => findings.push(report(
            format!("missing required field: {}", rule.path_label()),
            rule.primary_path().to_string(),
        )),
        Lookup::NotAMapping { depth, found } => findings.push(report(
            format!("expected a mapping at {}, found {}", path.prefix(depth), found),
            path.to_string(),
        )),
        Lookup::Found(value) => check_value(rule, path, value, findings),
    }
}

fn check_value(rule: &ValidationRule, path: &FieldPath, value: &Value, findings: &mut Vec<Finding>) {
    let at = path.to_string();
    let report = |message: String, at: String| {
        Finding::new(rule.severity, rule.code.clone(), message).with_path(at)
    };

    match &rule.check {
        Check::NonEmptyString => {
            if !is_non_empty_string(value) {
                findings.push(report(rule.message.clone(), at));
            }
        }
        Check::Equals(expected) => {
            if value.as_str() != Some(expected.as_str()) {
                findings.push(report(rule.message.clone(), at));
            }
        }
        Check::NonEmptySequence => match value.as_sequence() {
            Some(items) if !items.is_empty() => {}
            Some(_) => findings.push(report(format!("{} must not be empty", at), at)),
            None => findings.push(report(
                format!("{}, found {}", rule.message, type_name(value)),
                at,
            )),
        },
        Check::Mapping => {
            if !value.is_mapping() {
                findings.push(report(
                    format!("{}, found {}", rule.message, type_name(value)),
                    at,
                ));
            }
        }
        Check::EachItemHasFields(fields) => {
            let Some(items) = value.as_sequence() else {
                return;
            };
            for (i, item) in items.iter().enumerate() {
                let item_at = format!("{}[{}]", at, i);
                if !item.is_mapping() {
                    findings.push(report(
                        format!("{}: {}, found {}", item_at, rule.message, type_name(item)),
                        item_at,
                    ));
                    continue;
                }
                for field in fields {
                    let field_at = format!("{}.{}", item_at, field);
                    match item.get(field.as_str()) {
                        None | Some(Value::Null) => findings.push(report(
                            format!("{}: missing required field '{}'", item_at, field),
                            field_at,
                        )),
                        Some(v) if !is_non_empty_string(v) => findings.push(report(
                            format!("{} must be a non-empty string", field_at),
                            field_at,
                        )),
                        Some(_) => {}
                    }
                }
            }
        }
    }
}

fn is_non_empty_string(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.trim().is_empty())
}

/// Render a `kind` value for messages without reinterpreting it.
fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => format!("<{}>", type_name(other)),
    }
}
