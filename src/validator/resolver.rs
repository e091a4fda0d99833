//! Fills conventional defaults into manifests that are missing required fields.
//!
//! The resolver never touches its input. It returns a repaired copy together
//! with one line per change, so callers can show what was done before writing
//! anything back. For a supported kind the repaired copy always passes the
//! built-in catalog.

use crate::validator::catalog::ResourceKind;
use crate::validator::document::ManifestDocument;
use serde_yaml::{Mapping, Value};

pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_IMAGE: &str = "nginx:latest";
pub const DEFAULT_IMAGE_PULL_POLICY: &str = "IfNotPresent";
pub const DEFAULT_RESTART_POLICY: &str = "Always";
pub const DEFAULT_REPLICAS: u64 = 1;
pub const DEFAULT_SERVICE_PORT: u64 = 80;
pub const DEFAULT_TARGET_PORT: u64 = 8080;

/// Defaults used when filling missing fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Namespace given to objects that declare none.
    pub namespace: String,
    /// Image given to containers that declare none.
    pub image: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            image: DEFAULT_IMAGE.to_string(),
        }
    }
}

impl ResolveOptions {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

/// A repaired manifest and the changes made to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub document: ManifestDocument,
    /// Human-readable description of each change, in the order applied.
    pub fixes: Vec<String>,
    /// Set when the manifest could not be fully resolved.
    pub note: Option<String>,
}

impl Resolution {
    /// Whether anything was changed.
    pub fn is_modified(&self) -> bool {
        !self.fixes.is_empty()
    }

    /// Whether every kind-specific default could be applied.
    pub fn is_complete(&self) -> bool {
        self.note.is_none()
    }
}

/// Produce a repaired copy of `document`.
pub fn resolve(document: &ManifestDocument, options: &ResolveOptions) -> Resolution {
    let mut root = document.root().clone();
    let mut fixes = Vec::new();

    let kind = match root.get("kind") {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.as_str().map(str::to_string).unwrap_or_default()),
    };
    let supported = kind.as_deref().and_then(ResourceKind::from_kind);

    let api_version = supported.map_or("v1", |k| k.default_api_version());
    if !is_non_empty_str(root.get("apiVersion")) {
        root.insert("apiVersion".into(), api_version.into());
        fixes.push(format!("set apiVersion to {}", api_version));
    }

    let Some(kind) = kind else {
        return finish(
            document,
            root,
            fixes,
            Some("missing kind: cannot resolve further".to_string()),
        );
    };

    let fallback_name = if kind.is_empty() {
        "resource-default".to_string()
    } else {
        format!("{}-default", kind.to_lowercase())
    };
    let name = resolve_metadata(&mut root, &fallback_name, options, &mut fixes);

    let Some(kind) = supported else {
        log::debug!("no kind-specific defaults for {:?}", kind);
        return finish(
            document,
            root,
            fixes,
            Some(format!("unsupported kind {:?}: only common fields resolved", kind)),
        );
    };

    match kind {
        ResourceKind::Pod => edit_mapping(&mut root, "spec", "spec", &mut fixes, |spec, fixes| {
            resolve_containers(spec, "spec", options, fixes);
            if !spec.contains_key("restartPolicy") {
                spec.insert("restartPolicy".into(), DEFAULT_RESTART_POLICY.into());
                fixes.push(format!("set spec.restartPolicy to {}", DEFAULT_RESTART_POLICY));
            }
        }),
        ResourceKind::Deployment => edit_mapping(&mut root, "spec", "spec", &mut fixes, |spec, fixes| {
            resolve_deployment(spec, &name, options, fixes)
        }),
        ResourceKind::Service => edit_mapping(&mut root, "spec", "spec", &mut fixes, |spec, fixes| {
            if !spec.contains_key("selector") {
                spec.insert("selector".into(), app_labels(&name));
                fixes.push(format!("set spec.selector to app={}", name));
            }
            if !is_non_empty_sequence(spec.get("ports")) {
                let mut port = Mapping::new();
                port.insert("port".into(), DEFAULT_SERVICE_PORT.into());
                port.insert("targetPort".into(), DEFAULT_TARGET_PORT.into());
                spec.insert("ports".into(), Value::Sequence(vec![Value::Mapping(port)]));
                fixes.push(format!(
                    "set spec.ports to port {} -> {}",
                    DEFAULT_SERVICE_PORT, DEFAULT_TARGET_PORT
                ));
            }
        }),
        ResourceKind::ConfigMap => resolve_data(&mut root, &["data"], &mut fixes),
        ResourceKind::Secret => resolve_data(&mut root, &["data", "stringData"], &mut fixes),
    }

    finish(document, root, fixes, None)
}

fn finish(
    original: &ManifestDocument,
    root: Mapping,
    fixes: Vec<String>,
    note: Option<String>,
) -> Resolution {
    Resolution {
        document: ManifestDocument::new(root).with_position(original.index(), original.line()),
        fixes,
        note,
    }
}

/// Ensure `metadata`, `metadata.name` and `metadata.namespace`. Returns the name.
fn resolve_metadata(
    root: &mut Mapping,
    fallback_name: &str,
    options: &ResolveOptions,
    fixes: &mut Vec<String>,
) -> String {
    edit_mapping(root, "metadata", "metadata", fixes, |metadata, fixes| {
        if !is_non_empty_str(metadata.get("name")) {
            metadata.insert("name".into(), fallback_name.into());
            fixes.push(format!("set metadata.name to {}", fallback_name));
        }
        if !metadata.contains_key("namespace") {
            metadata.insert("namespace".into(), options.namespace.as_str().into());
            fixes.push(format!("set metadata.namespace to {}", options.namespace));
        }

        metadata
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(fallback_name)
            .to_string()
    })
}

/// Fill a Deployment `spec`.
fn resolve_deployment(
    spec: &mut Mapping,
    name: &str,
    options: &ResolveOptions,
    fixes: &mut Vec<String>,
) {
    if !spec.contains_key("replicas") {
        spec.insert("replicas".into(), DEFAULT_REPLICAS.into());
        fixes.push(format!("set spec.replicas to {}", DEFAULT_REPLICAS));
    }
    if !spec.contains_key("selector") {
        let mut selector = Mapping::new();
        selector.insert("matchLabels".into(), app_labels(name));
        spec.insert("selector".into(), Value::Mapping(selector));
        fixes.push(format!("set spec.selector.matchLabels to app={}", name));
    }

    if !is_present(spec.get("template")) {
        let mut template = Mapping::new();
        let mut metadata = Mapping::new();
        metadata.insert("labels".into(), app_labels(name));
        template.insert("metadata".into(), Value::Mapping(metadata));

        let mut pod_spec = Mapping::new();
        if let Some(containers) = spec.remove("containers") {
            if containers.is_sequence() {
                fixes.push("moved spec.containers into spec.template.spec".to_string());
            }
            pod_spec.insert("containers".into(), containers);
        }
        template.insert("spec".into(), Value::Mapping(pod_spec));
        spec.insert("template".into(), Value::Mapping(template));
        fixes.push("added spec.template".to_string());
    }

    edit_mapping(spec, "template", "spec.template", fixes, |template, fixes| {
        edit_mapping(template, "spec", "spec.template.spec", fixes, |pod_spec, fixes| {
            resolve_containers(pod_spec, "spec.template.spec", options, fixes)
        })
    })
}

/// Ensure `spec.containers` is a non-empty list of complete containers.
fn resolve_containers(
    spec: &mut Mapping,
    at: &str,
    options: &ResolveOptions,
    fixes: &mut Vec<String>,
) {
    if !is_non_empty_sequence(spec.get("containers")) {
        spec.insert(
            "containers".into(),
            Value::Sequence(vec![Value::Mapping(Mapping::new())]),
        );
        fixes.push(format!("added a default container to {}.containers", at));
    }

    let Some(Value::Sequence(containers)) = spec.get_mut("containers") else {
        return;
    };

    for (i, item) in containers.iter_mut().enumerate() {
        let here = format!("{}.containers[{}]", at, i);
        if !item.is_mapping() {
            *item = Value::Mapping(Mapping::new());
            fixes.push(format!("replaced {} with a mapping", here));
        }
        let Value::Mapping(container) = item else {
            continue;
        };

        if !is_non_empty_str(container.get("name")) {
            let name = format!("container-{}", i);
            fixes.push(format!("set {}.name to {}", here, name));
            container.insert("name".into(), name.into());
        }
        if !is_non_empty_str(container.get("image")) {
            container.insert("image".into(), options.image.as_str().into());
            fixes.push(format!("set {}.image to {}", here, options.image));
        }
        if !container.contains_key("imagePullPolicy") {
            container.insert("imagePullPolicy".into(), DEFAULT_IMAGE_PULL_POLICY.into());
            fixes.push(format!(
                "set {}.imagePullPolicy to {}",
                here, DEFAULT_IMAGE_PULL_POLICY
            ));
        }
    }
}

/// Ensure the first present key of `keys` holds a mapping, adding `keys[0]` if none is present.
fn resolve_data(root: &mut Mapping, keys: &[&str], fixes: &mut Vec<String>) {
    let present = keys.iter().find(|k| is_present(root.get(**k)));
    match present {
        Some(key) => {
            if !root.get(*key).is_some_and(Value::is_mapping) {
                root.insert((*key).into(), Value::Mapping(Mapping::new()));
                fixes.push(format!("replaced {} with an empty mapping", key));
            }
        }
        None => {
            if let Some(key) = keys.first() {
                root.insert((*key).into(), Value::Mapping(Mapping::new()));
                fixes.push(format!("added empty {}", key));
            }
        }
    }
}

/// Run `edit` on the mapping under `key`, first adding it or replacing a
/// non-mapping value. The key keeps its position.
fn edit_mapping<R>(
    parent: &mut Mapping,
    key: &str,
    label: &str,
    fixes: &mut Vec<String>,
    edit: impl FnOnce(&mut Mapping, &mut Vec<String>) -> R,
) -> R {
    let slot = parent.entry(key.into()).or_insert(Value::Null);
    let mut mapping = match std::mem::take(slot) {
        Value::Mapping(mapping) => mapping,
        Value::Null => {
            fixes.push(format!("added {}", label));
            Mapping::new()
        }
        _ => {
            fixes.push(format!("replaced {} with a mapping", label));
            Mapping::new()
        }
    };
    let result = edit(&mut mapping, fixes);
    *slot = Value::Mapping(mapping);
    result
}

fn app_labels(name: &str) -> Value {
    let mut labels = Mapping::new();
    labels.insert("app".into(), name.into());
    Value::Mapping(labels)
}

fn is_present(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !v.is_null())
}

fn is_non_empty_str(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty())
}

fn is_non_empty_sequence(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_sequence)
        .is_some_and(|s| !s.is_empty())
}
