//! Line-level repair of common YAML breakage, applied to text that fails to parse.
//!
//! Two patterns are joined back together:
//!
//! - a scalar left on the line after an empty `key:` at the key's own
//!   indentation (`imagePullPolicy:` then `IfNotPresent`);
//! - a key broken across two lines (`restartP` then `olicy: Always`).
//!
//! Block scalar bodies (`|`, `>`) are copied through untouched.

/// Repaired text and a description of each repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxRepair {
    pub text: String,
    pub fixes: Vec<String>,
}

impl SyntaxRepair {
    pub fn is_modified(&self) -> bool {
        !self.fixes.is_empty()
    }
}

/// Rejoin orphaned values and split keys in raw manifest text.
pub fn repair_syntax(content: &str) -> SyntaxRepair {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut output: Vec<String> = Vec::with_capacity(lines.len());
    let mut fixes = Vec::new();
    let mut block_parent: Option<usize> = None;
    let mut i = 0;

    while i < lines.len() {
        let raw = lines[i];
        let line = raw.trim_end();
        let indent = indent_of(line);

        if let Some(parent) = block_parent {
            if line.is_empty() || indent > parent {
                output.push(raw.to_string());
                i += 1;
                continue;
            }
            block_parent = None;
        }

        let body = &line[indent..];
        if body.is_empty() || body.starts_with('#') {
            output.push(raw.to_string());
            i += 1;
            continue;
        }

        let mut current = line.to_string();
        let mut next = i + 1;

        if is_key_fragment(body) && !continues_previous(&output, indent) {
            if let Some(rest) = lines.get(next).map(|l| l.trim()).filter(|r| starts_with_key(r)) {
                current = format!("{}{}", line, rest);
                fixes.push(format!(
                    "lines {}-{}: joined split key '{}{}'",
                    i + 1,
                    i + 2,
                    body,
                    key_of(rest)
                ));
                next += 1;
            }
        }

        if let Some(key) = empty_key(&current).map(str::to_string) {
            if let Some(j) = next_content(&lines, next) {
                let value_line = lines[j].trim_end();
                let value_indent = indent_of(value_line);
                let value = &value_line[value_indent..];
                if value_indent <= indent && indent - value_indent <= 1 && is_orphan_scalar(value) {
                    current = format!("{}{}: {}", &line[..indent], key, value);
                    fixes.push(format!(
                        "line {}: moved orphaned value '{}' onto key '{}'",
                        j + 1,
                        value,
                        key
                    ));
                    next = j + 1;
                }
            }
        }

        if opens_block_scalar(&current) {
            block_parent = Some(indent);
        }
        if next == i + 1 && current == line {
            output.push(raw.to_string());
        } else {
            output.push(current);
        }
        i = next;
    }

    SyntaxRepair {
        text: output.join("\n"),
        fixes,
    }
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn is_plain_key(key: &str) -> bool {
    key.chars().next().is_some_and(char::is_alphanumeric)
        && key
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
}

/// `key:` with nothing after the colon.
fn empty_key(line: &str) -> Option<&str> {
    let body = line[indent_of(line)..].trim_end();
    body.strip_suffix(':').filter(|key| is_plain_key(key))
}

/// A bare word that cannot stand on its own line in a mapping.
fn is_key_fragment(body: &str) -> bool {
    body.chars().next().is_some_and(char::is_alphabetic)
        && body.chars().all(|c| c.is_alphanumeric() || matches!(c, '-' | '_'))
}

/// `key:` or `key: value`.
fn starts_with_key(text: &str) -> bool {
    match text.split_once(':') {
        Some((key, rest)) => {
            is_plain_key(key) && rest.chars().next().is_none_or(char::is_whitespace)
        }
        None => false,
    }
}

fn key_of(text: &str) -> &str {
    text.split_once(':').map_or(text, |(key, _)| key)
}

/// Whether a line indented by `indent` may continue the last content line.
fn continues_previous(output: &[String], indent: usize) -> bool {
    output
        .iter()
        .rev()
        .map(|l| l.trim_end())
        .find(|l| {
            let body = l.trim_start();
            !body.is_empty() && !body.starts_with('#')
        })
        .is_some_and(|prev| indent > indent_of(prev))
}

fn next_content(lines: &[&str], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&j| !lines[j].trim().is_empty())
}

fn is_orphan_scalar(value: &str) -> bool {
    !value.is_empty()
        && !value.contains(':')
        && value != "..."
        && !value.starts_with(['-', '#', '{', '[', '|', '>', '&', '*', '!', '%', '@', '`'])
}

fn opens_block_scalar(line: &str) -> bool {
    let body = line[indent_of(line)..].trim_end();
    let value = match body.split_once(": ") {
        Some((_, value)) => value,
        None => body.strip_prefix("- ").unwrap_or(body),
    };
    let value = value.trim();
    value.starts_with(['|', '>'])
        && value[1..]
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-'))
}
