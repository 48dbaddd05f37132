//! Template rendering for generated scheduler scripts.
//!
//! Templates are plain UTF-8 text with `{{name}}` placeholders. Rendering
//! substitutes each placeholder with the value registered under `name` in the
//! role's rule set. There is no escaping mechanism: literal text outside the
//! placeholder grammar (including stray single braces) passes through
//! unchanged.
//!
//! # Error Handling
//!
//! Rendering is fail-safe: a placeholder whose name has no rule entry is an
//! error identifying the offending name, never a silent empty substitution.
//! Names are looked up exactly as captured, whitespace included, so rule keys
//! must match the template text verbatim.

use crate::recipe::RuleSet;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Placeholder grammar: `{{` then the shortest run of characters up to the
/// nearest `}}`, captured as the lookup key.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.*?)\}\}").expect("Invalid placeholder regex"));

/// Error type for template rendering failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A placeholder referenced a name with no rule entry.
    MissingRule {
        /// The name captured between the braces.
        name: String,
        /// 1-based line number of the offending placeholder.
        line: usize,
    },
    /// A placeholder match did not yield its single capture group.
    MalformedPlaceholder {
        /// 1-based line number of the offending match.
        line: usize,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::MissingRule { name, line } => {
                write!(f, "no rule for placeholder '{}' on line {}", name, line)
            }
            RenderError::MalformedPlaceholder { line } => {
                write!(f, "malformed placeholder match on line {}", line)
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// Render a template by substituting every `{{name}}` placeholder.
///
/// The template is processed line by line. Each line is partitioned into the
/// literal segments between placeholder matches, and those segments are
/// interleaved with the substituted rule values, so all surrounding text
/// (leading/trailing whitespace included) is preserved exactly. Lines with no
/// placeholders pass through unchanged. Rendered lines are rejoined with `\n`.
///
/// Pure function: no filesystem or other side effects.
pub fn render(template: &str, rules: &RuleSet) -> Result<String, RenderError> {
    let mut generated = Vec::new();
    for (idx, row) in template.lines().enumerate() {
        generated.push(render_line(row, rules, idx + 1)?);
    }
    Ok(generated.join("\n"))
}

/// Substitute the placeholders of a single line.
fn render_line(row: &str, rules: &RuleSet, line: usize) -> Result<String, RenderError> {
    // Collect (span, value) edits first so a missing rule fails the whole
    // line before any output is assembled.
    let mut edits: Vec<(std::ops::Range<usize>, &str)> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(row) {
        let span = caps.get(0).ok_or(RenderError::MalformedPlaceholder { line })?;
        let name = caps
            .get(1)
            .ok_or(RenderError::MalformedPlaceholder { line })?
            .as_str();
        let value = rules.get(name).ok_or_else(|| RenderError::MissingRule {
            name: name.to_string(),
            line,
        })?;
        edits.push((span.range(), value));
    }

    if edits.is_empty() {
        return Ok(row.to_string());
    }

    // Interleave the literal segments between match spans with the values.
    let mut out = String::with_capacity(row.len());
    let mut cursor = 0;
    for (span, value) in edits {
        out.push_str(&row[cursor..span.start]);
        out.push_str(value);
        cursor = span.end;
    }
    out.push_str(&row[cursor..]);
    Ok(out)
}
