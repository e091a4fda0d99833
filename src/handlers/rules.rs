use crate::error::Result;
use crate::validator::catalog::RuleCatalog;
use crate::validator::types::Severity;
use colored::Colorize;
use serde::Serialize;

#[derive(Serialize)]
struct RuleEntry<'a> {
    kind: &'static str,
    code: &'a str,
    path: String,
    severity: Severity,
    message: &'a str,
}

fn entries(catalog: &RuleCatalog) -> Vec<RuleEntry<'_>> {
    catalog
        .kinds()
        .flat_map(|kind| {
            catalog.rules_for(kind).iter().map(move |rule| RuleEntry {
                kind: kind.as_str(),
                code: rule.code.as_str(),
                path: rule.path_label(),
                severity: rule.severity,
                message: &rule.message,
            })
        })
        .collect()
}

/// List the built-in rules, grouped by kind.
pub fn handle_rules(json: bool) -> Result<()> {
    print!("{}", render_rules(&RuleCatalog::builtin(), json)?);
    Ok(())
}

pub fn render_rules(catalog: &RuleCatalog, json: bool) -> Result<String> {
    let entries = entries(catalog);
    if json {
        let mut out = serde_json::to_string_pretty(&entries)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    let mut current = None;
    for entry in &entries {
        if current != Some(entry.kind) {
            if current.is_some() {
                out.push('\n');
            }
            out.push_str(&format!("{}\n", entry.kind.bold()));
            current = Some(entry.kind);
        }
        out.push_str(&format!(
            "  {:<20} {:<8} {}\n",
            entry.code,
            entry.severity.as_str(),
            entry.path
        ));
    }
    Ok(out)
}
