//! Handler for the `fix` command.

use crate::error::{AegisError, Result};
use crate::validator::batch::{STDIN_LABEL, Verdict};
use crate::validator::catalog::RuleCatalog;
use crate::validator::parser::{decode_text, parse_documents};
use crate::validator::repair::repair_syntax;
use crate::validator::resolver::{Resolution, ResolveOptions, resolve};
use crate::validator::validate::Validator;
use colored::Colorize;
use std::io::Read;
use std::path::Path;

/// Resolve every document of `file`, printing the result or writing it back.
///
/// `-` reads standard input. Text that does not parse gets one pass of line
/// repairs before giving up. Fixes go to stderr so stdout carries only the
/// manifest stream. The returned verdict is that of the resolved documents.
pub fn handle_fix(file: &Path, write: bool, options: &ResolveOptions) -> Result<Verdict> {
    let from_stdin = file.as_os_str() == "-";
    if from_stdin && write {
        return Err(AegisError::InvalidInput(
            "--write needs a file; standard input cannot be written back".to_string(),
        ));
    }

    let bytes = if from_stdin {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .map_err(|e| AegisError::io(STDIN_LABEL, e))?;
        bytes
    } else {
        std::fs::read(file).map_err(|e| AegisError::io(file, e))?
    };
    let content = decode_text(&bytes)?;
    let (resolutions, repaired) = match resolve_stream(content, options) {
        Ok(resolutions) => (resolutions, false),
        Err(AegisError::Parse(err)) => {
            let repair = repair_syntax(content);
            if !repair.is_modified() {
                return Err(AegisError::Parse(err));
            }
            log::info!("input did not parse; retrying after {} repair(s)", repair.fixes.len());
            for fix in &repair.fixes {
                eprintln!("{} {}", "repaired".green().bold(), fix);
            }
            (resolve_stream(&repair.text, options)?, true)
        }
        Err(err) => return Err(err),
    };

    for (position, resolution) in resolutions.iter().enumerate() {
        for fix in &resolution.fixes {
            eprintln!("{} document {}: {}", "fixed".green().bold(), position + 1, fix);
        }
        if let Some(note) = &resolution.note {
            eprintln!("{} document {}: {}", "warning".yellow().bold(), position + 1, note);
        }
    }

    let output = render_stream(&resolutions)?;
    let modified = repaired || resolutions.iter().any(Resolution::is_modified);

    if write {
        if modified {
            std::fs::write(file, &output).map_err(|e| AegisError::io(file, e))?;
            eprintln!("Wrote {}", file.display());
        } else {
            eprintln!("Nothing to fix in {}", file.display());
        }
    } else {
        print!("{}", output);
    }

    let catalog = RuleCatalog::builtin();
    let validator = Validator::new(&catalog);
    Ok(resolutions
        .iter()
        .map(|r| {
            if validator.validate(&r.document).valid {
                Verdict::Valid
            } else {
                Verdict::Invalid
            }
        })
        .fold(Verdict::Valid, Verdict::worst))
}

/// Resolve every document of a stream. Any unparseable document aborts.
pub fn resolve_stream(content: &str, options: &ResolveOptions) -> Result<Vec<Resolution>> {
    parse_documents(content)
        .into_iter()
        .map(|parsed| {
            let document = parsed?;
            Ok(resolve(&document, options))
        })
        .collect()
}

/// Serialize resolved documents back into a `---`-separated stream.
pub fn render_stream(resolutions: &[Resolution]) -> Result<String> {
    let mut output = String::new();
    for (position, resolution) in resolutions.iter().enumerate() {
        if position > 0 {
            output.push_str("---\n");
        }
        output.push_str(&serde_yaml::to_string(&resolution.document.to_value())?);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::parser::ParseError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_stream() {
        let resolutions =
            resolve_stream("kind: Pod\n---\nkind: Service\nmetadata: {name: api}\n", &ResolveOptions::default())
                .unwrap();
        assert_eq!(resolutions.len(), 2);
        assert_eq!(resolutions[0].document.name(), Some("pod-default"));
        assert_eq!(resolutions[1].document.name(), Some("api"));

        let output = render_stream(&resolutions).unwrap();
        let reparsed = parse_documents(&output);
        assert_eq!(reparsed.len(), 2);
        assert!(reparsed.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn test_unparseable_document_aborts() {
        let err = resolve_stream("kind: Pod\n---\nkind: [oops\n", &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, AegisError::Parse(ParseError::Syntax { .. })));
    }

    #[test]
    fn test_fix_writes_file() {
        colored::control::set_override(false);
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cm.yaml");
        fs::write(&path, "kind: ConfigMap\nmetadata:\n  name: cfg\n").unwrap();

        let verdict = handle_fix(&path, true, &ResolveOptions::default()).unwrap();
        assert_eq!(verdict, Verdict::Valid);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("apiVersion: v1"));
        assert!(written.contains("namespace: default"));
        assert!(written.contains("data: {}"));
    }

    #[test]
    fn test_fix_repairs_broken_syntax() {
        colored::control::set_override(false);
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pod.yaml");
        fs::write(
            &path,
            "apiVersion: v1\nkind: Pod\nmetadata:\n  name: web\nspec:\n  containers:\n  - name: web\n    image: nginx\n    imagePullPolicy:\n    IfNotPresent\n",
        )
        .unwrap();

        let verdict = handle_fix(&path, true, &ResolveOptions::default()).unwrap();
        assert_eq!(verdict, Verdict::Valid);

        let written = fs::read_to_string(&path).unwrap();
        let doc = crate::validator::parser::parse_document(&written).unwrap();
        assert_eq!(
            doc.get("spec").unwrap()["containers"][0]["imagePullPolicy"],
            "IfNotPresent"
        );
    }

    #[test]
    fn test_unrepairable_syntax_still_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "kind: [oops\n").unwrap();

        let err = handle_fix(&path, true, &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, AegisError::Parse(ParseError::Syntax { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "kind: [oops\n");
    }

    #[test]
    fn test_write_to_stdin_rejected() {
        let err = handle_fix(Path::new("-"), true, &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, AegisError::InvalidInput(_)));
    }

    #[test]
    fn test_fix_missing_file() {
        let err = handle_fix(Path::new("no/such/file.yaml"), false, &ResolveOptions::default())
            .unwrap_err();
        assert!(err.is_io());
    }
}
