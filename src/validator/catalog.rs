//! Rule catalog: which structural checks apply to which resource kind.
//!
//! The set of supported kinds is closed. Each kind carries an ordered list of
//! rules; the validator evaluates them in that order. Catalogs are plain
//! values, built once and shared read-only.

use crate::validator::document::FieldPath;
use crate::validator::types::{RuleCode, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const POD_CONTAINERS: &[&str] = &["spec.containers"];
const DEPLOYMENT_CONTAINERS: &[&str] = &["spec.template.spec.containers", "spec.containers"];

/// Resource kinds the validator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Pod,
    Deployment,
    Service,
    ConfigMap,
    Secret,
}

impl ResourceKind {
    /// All supported kinds, in catalog order.
    pub const ALL: [ResourceKind; 5] = [
        Self::Pod,
        Self::Deployment,
        Self::Service,
        Self::ConfigMap,
        Self::Secret,
    ];

    /// Get the string representation matching Kubernetes kind names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pod => "Pod",
            Self::Deployment => "Deployment",
            Self::Service => "Service",
            Self::ConfigMap => "ConfigMap",
            Self::Secret => "Secret",
        }
    }

    /// Parse from a Kubernetes kind string. Matching is case-sensitive.
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "Pod" => Some(Self::Pod),
            "Deployment" => Some(Self::Deployment),
            "Service" => Some(Self::Service),
            "ConfigMap" => Some(Self::ConfigMap),
            "Secret" => Some(Self::Secret),
            _ => None,
        }
    }

    /// The apiVersion this kind is usually served under.
    pub fn default_api_version(&self) -> &'static str {
        match self {
            Self::Deployment => "apps/v1",
            _ => "v1",
        }
    }

    /// Where the container list lives, for kinds that run containers.
    ///
    /// The first path is canonical; later paths are accepted alternates.
    pub fn container_paths(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Pod => Some(POD_CONTAINERS),
            Self::Deployment => Some(DEPLOYMENT_CONTAINERS),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a rule requires of the value at its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// A string with at least one non-whitespace character.
    NonEmptyString,
    /// A string equal to the given value.
    Equals(String),
    /// A sequence with at least one item.
    NonEmptySequence,
    /// A mapping. Empty mappings pass.
    Mapping,
    /// Every item of a sequence carries the listed non-empty string fields.
    /// Absence of the sequence itself is left to other rules.
    EachItemHasFields(Vec<String>),
}

/// A single structural rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRule {
    /// Stable rule identifier.
    pub code: RuleCode,
    /// Canonical field path.
    primary: FieldPath,
    /// Paths accepted when the primary one is absent, in order.
    alternates: Vec<FieldPath>,
    /// The requirement placed on the value.
    pub check: Check,
    /// Severity of findings produced by this rule.
    pub severity: Severity,
    /// Message used when the value exists but fails the check.
    pub message: String,
}

impl ValidationRule {
    /// Create an error-severity rule over a single path.
    pub fn new(
        code: impl Into<RuleCode>,
        path: &str,
        check: Check,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            primary: FieldPath::parse(path),
            alternates: Vec::new(),
            check,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Accept another path when the primary one is absent.
    pub fn with_alternate(mut self, path: &str) -> Self {
        self.alternates.push(FieldPath::parse(path));
        self
    }

    /// Set the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// The canonical path.
    pub fn primary_path(&self) -> &FieldPath {
        &self.primary
    }

    /// Every accepted path, primary first.
    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        std::iter::once(&self.primary).chain(&self.alternates)
    }

    /// Human-readable rendering of all accepted paths.
    pub fn path_label(&self) -> String {
        if self.alternates.is_empty() {
            return self.primary.to_string();
        }
        let alternates: Vec<String> = self.alternates.iter().map(ToString::to_string).collect();
        format!("{} (or {})", self.primary, alternates.join(", "))
    }
}

/// Lookup from resource kind to its ordered rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleCatalog {
    rules: BTreeMap<ResourceKind, Vec<ValidationRule>>,
}

impl RuleCatalog {
    /// A catalog that recognizes no kinds.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in catalog covering every `ResourceKind`.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for kind in ResourceKind::ALL {
            catalog.rules.insert(kind, builtin_rules(kind));
        }
        catalog
    }

    /// Append a rule to a kind's list, registering the kind if needed.
    pub fn with_rule(mut self, kind: ResourceKind, rule: ValidationRule) -> Self {
        self.rules.entry(kind).or_default().push(rule);
        self
    }

    /// Resolve a kind string against the catalog.
    pub fn lookup(&self, kind: &str) -> Option<(ResourceKind, &[ValidationRule])> {
        let kind = ResourceKind::from_kind(kind)?;
        self.rules.get(&kind).map(|rules| (kind, rules.as_slice()))
    }

    /// Rules for a kind, empty when the kind is not registered.
    pub fn rules_for(&self, kind: ResourceKind) -> &[ValidationRule] {
        self.rules.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Registered kinds, in catalog order.
    pub fn kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.rules.keys().copied()
    }

    /// Total number of rules across all kinds.
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Whether the catalog holds no rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn builtin_rules(kind: ResourceKind) -> Vec<ValidationRule> {
    let mut rules = vec![
        ValidationRule::new(
            "api-version",
            "apiVersion",
            Check::NonEmptyString,
            "apiVersion must be a non-empty string",
        ),
        ValidationRule::new(
            "kind-matches",
            "kind",
            Check::Equals(kind.as_str().to_string()),
            format!("kind must be {}", kind),
        ),
        ValidationRule::new(
            "metadata-name",
            "metadata.name",
            Check::NonEmptyString,
            "metadata.name must be a non-empty string",
        ),
    ];

    match kind {
        ResourceKind::Pod | ResourceKind::Deployment => {
            if let Some((primary, alternates)) =
                kind.container_paths().and_then(|p| p.split_first())
            {
                let mut present = ValidationRule::new(
                    "containers-present",
                    primary,
                    Check::NonEmptySequence,
                    format!("{} must be a non-empty sequence", primary),
                );
                let mut fields = ValidationRule::new(
                    "container-fields",
                    primary,
                    Check::EachItemHasFields(vec!["name".to_string(), "image".to_string()]),
                    "container must be a mapping",
                );
                for alt in alternates {
                    present = present.with_alternate(alt);
                    fields = fields.with_alternate(alt);
                }
                rules.push(present);
                rules.push(fields);
            }
        }
        ResourceKind::Service => rules.push(ValidationRule::new(
            "ports-present",
            "spec.ports",
            Check::NonEmptySequence,
            "spec.ports must be a non-empty sequence",
        )),
        ResourceKind::ConfigMap => rules.push(ValidationRule::new(
            "data-present",
            "data",
            Check::Mapping,
            "data must be a mapping",
        )),
        ResourceKind::Secret => rules.push(
            ValidationRule::new(
                "data-present",
                "data",
                Check::Mapping,
                "data must be a mapping",
            )
            .with_alternate("stringData"),
        ),
    }

    rules
}
