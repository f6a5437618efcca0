//! YAML frontmatter extraction
//!
//! Frontmatter is the YAML block fenced by `---` lines at the very start of a
//! note. The closing fence may also be `...`. Both LF and CRLF line endings
//! are accepted.

use serde_yaml::Value;

use crate::error::{ParserError, ParserResult};
use crate::types::{Frontmatter, FrontmatterField};

/// Split a note into its frontmatter and body.
///
/// Returns `(None, content)` when the note does not open with a fence or the
/// fence is never closed.
pub fn extract_frontmatter(content: &str) -> ParserResult<(Option<Frontmatter>, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(first_end) = content.find('\n') else {
        return Ok((None, content));
    };
    if content[..first_end].trim_end_matches('\r') != "---" {
        return Ok((None, content));
    }

    let yaml_start = first_end + 1;
    let mut pos = yaml_start;
    for line in content[yaml_start..].split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed == "---" || trimmed == "..." {
            let raw = &content[yaml_start..pos];
            let body = &content[pos + line.len()..];
            let fields = parse_fields(raw)?;
            return Ok((Some(Frontmatter { fields }), body));
        }
        pos += line.len();
    }

    Ok((None, content))
}

fn parse_fields(raw: &str) -> ParserResult<Vec<FrontmatterField>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value =
        serde_yaml::from_str(raw).map_err(|e| ParserError::frontmatter(e.to_string()))?;

    match value {
        Value::Null => Ok(Vec::new()),
        Value::Mapping(map) => Ok(map
            .iter()
            .map(|(key, value)| FrontmatterField {
                key: scalar_values(key).join(" "),
                values: scalar_values(value),
            })
            .collect()),
        _ => Err(ParserError::frontmatter("frontmatter is not a key/value mapping")),
    }
}

/// Flatten a YAML value into display strings.
fn scalar_values(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Bool(b) => vec![b.to_string()],
        Value::Number(n) => vec![n.to_string()],
        Value::String(s) => vec![s.clone()],
        Value::Sequence(seq) => seq.iter().flat_map(scalar_values).collect(),
        Value::Tagged(tagged) => scalar_values(&tagged.value),
        Value::Mapping(_) => serde_yaml::to_string(value)
            .map(|s| vec![s.trim().to_string()])
            .unwrap_or_default(),
    }
}
