use kube_aegis::validator::{
    ManifestDocument, ResolveOptions, RuleCatalog, Validator, parse_documents, resolve,
};
use proptest::prelude::*;
use serde_yaml::{Mapping, Value};

const KINDS: [&str; 5] = ["Pod", "Deployment", "Service", "ConfigMap", "Secret"];

fn document(entries: Vec<(&str, Value)>) -> ManifestDocument {
    let mut root = Mapping::new();
    for (key, value) in entries {
        root.insert(key.into(), value);
    }
    ManifestDocument::new(root)
}

fn metadata(name: &str) -> Value {
    let mut metadata = Mapping::new();
    metadata.insert("name".into(), name.into());
    Value::Mapping(metadata)
}

fn unknown_kind() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9]{0,15}".prop_filter("must not be a supported kind", |k| {
        !KINDS.contains(&k.as_str())
    })
}

proptest! {
    #[test]
    fn unknown_kind_yields_exactly_one_finding(kind in unknown_kind(), name in "[a-z]{1,10}") {
        let catalog = RuleCatalog::builtin();
        let doc = document(vec![
            ("apiVersion", "v1".into()),
            ("kind", kind.as_str().into()),
            ("metadata", metadata(&name)),
        ]);

        let result = Validator::new(&catalog).validate(&doc);
        prop_assert!(!result.valid);
        prop_assert_eq!(result.findings.len(), 1);
        prop_assert_eq!(
            &result.findings[0].message,
            &format!("unsupported or unknown kind: {}", kind)
        );
    }

    #[test]
    fn missing_name_is_reported_once(kind_index in 0..KINDS.len()) {
        let catalog = RuleCatalog::builtin();
        let doc = document(vec![
            ("apiVersion", "v1".into()),
            ("kind", KINDS[kind_index].into()),
            ("metadata", Value::Mapping(Mapping::new())),
        ]);

        let result = Validator::new(&catalog).validate(&doc);
        let about_name = result
            .findings
            .iter()
            .filter(|f| f.path.as_deref() == Some("metadata.name"))
            .count();
        prop_assert!(!result.valid);
        prop_assert_eq!(about_name, 1);
    }

    #[test]
    fn validation_is_repeatable(kind_index in 0..KINDS.len(), strict in any::<bool>()) {
        let catalog = RuleCatalog::builtin();
        let validator = Validator::new(&catalog).strict(strict);
        let doc = document(vec![("kind", KINDS[kind_index].into())]);

        let first = validator.validate(&doc);
        let second = validator.validate(&doc);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn resolved_manifests_validate_clean(
        kind_index in 0..KINDS.len(),
        with_api_version in any::<bool>(),
        name in proptest::option::of("[a-z]{1,10}"),
    ) {
        let mut entries = vec![("kind", Value::from(KINDS[kind_index]))];
        if with_api_version {
            entries.push(("apiVersion", "v1".into()));
        }
        if let Some(name) = &name {
            entries.push(("metadata", metadata(name)));
        }
        let doc = document(entries);

        let resolution = resolve(&doc, &ResolveOptions::default());
        let catalog = RuleCatalog::builtin();
        let result = Validator::new(&catalog).strict(true).validate(&resolution.document);
        prop_assert!(result.valid, "findings: {:?}", result.findings);
    }

    #[test]
    fn stream_documents_are_counted(count in 1usize..6) {
        let stream = (0..count)
            .map(|i| format!("kind: ConfigMap\nmetadata:\n  name: cfg-{}\n", i))
            .collect::<Vec<_>>()
            .join("---\n");

        let documents = parse_documents(&stream);
        prop_assert_eq!(documents.len(), count);
        for (i, parsed) in documents.iter().enumerate() {
            let doc = parsed.as_ref().unwrap();
            prop_assert_eq!(doc.index(), i);
            prop_assert_eq!(doc.line(), 1 + i * 4);
        }
    }
}
