//! Applies a [`RewritePlan`] to script text.
//!
//! Only statements whose name lists change are re-rendered; every other
//! byte of the script is copied through untouched.

use crate::error::Result;
use crate::parser::{ImportStatement, ImportedName, ScriptParser};
use crate::plan::RewritePlan;
use crate::types::FixRecord;

/// Result of rewriting a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub changed: bool,
    /// Moves that actually touched the script
    pub applied: Vec<FixRecord>,
}

impl Rewrite {
    fn unchanged(source: &str) -> Self {
        Self {
            text: source.to_string(),
            changed: false,
            applied: Vec::new(),
        }
    }
}

/// Parse `source` and move every planned name to its target category
pub fn rewrite(source: &str, plan: &RewritePlan) -> Result<Rewrite> {
    if plan.is_empty() {
        return Ok(Rewrite::unchanged(source));
    }
    let statements = ScriptParser::new()?.parse_imports(source)?;
    Ok(apply(source, &statements, plan))
}

/// A statement that does not exist yet, placed after `anchor`
struct NewImport {
    anchor: usize,
    module: String,
    names: Vec<ImportedName>,
}

struct Edit {
    start: usize,
    end: usize,
    text: String,
}

/// Rewrite with statements already parsed from `source`
pub(crate) fn apply(source: &str, statements: &[ImportStatement], plan: &RewritePlan) -> Rewrite {
    if plan.is_empty() {
        return Rewrite::unchanged(source);
    }

    let mut finals: Vec<Vec<ImportedName>> =
        statements.iter().map(|statement| statement.names.clone()).collect();
    let mut touched = vec![false; statements.len()];
    let mut created: Vec<NewImport> = Vec::new();
    let mut applied: Vec<FixRecord> = Vec::new();

    for (index, statement) in statements.iter().enumerate() {
        if statement.wildcard {
            continue;
        }
        for imported in &statement.names {
            let Some(to) = plan.target(&statement.module, &imported.name) else {
                continue;
            };

            finals[index].retain(|name| !name.same_binding(imported));
            touched[index] = true;

            // a target import only binds the name inside its own block
            let existing = statements.iter().position(|other| {
                !other.wildcard && other.module == to && other.scope == statement.scope
            });
            match existing {
                Some(target) => {
                    add_once(&mut finals[target], imported);
                    touched[target] = true;
                }
                None => match created.iter_mut().find(|new_import| {
                    new_import.module == to
                        && statements[new_import.anchor].scope == statement.scope
                }) {
                    Some(new_import) => add_once(&mut new_import.names, imported),
                    None => created.push(NewImport {
                        anchor: index,
                        module: to.to_string(),
                        names: vec![imported.clone()],
                    }),
                },
            }

            let fix = FixRecord::new(&imported.name, &statement.module, to);
            if !applied.contains(&fix) {
                applied.push(fix);
            }
        }
    }

    let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };
    let mut edits = Vec::new();

    for (index, statement) in statements.iter().enumerate() {
        let anchored: Vec<&NewImport> = created
            .iter()
            .filter(|new_import| new_import.anchor == index)
            .collect();
        if !touched[index] && anchored.is_empty() {
            continue;
        }

        let indent = line_indent(source, statement.start_byte);
        let mut rendered = Vec::new();
        if !finals[index].is_empty() {
            rendered.push(render_like(statement, &finals[index], indent, newline));
        }
        rendered.extend(
            anchored
                .iter()
                .map(|new_import| render_plain(&new_import.module, &new_import.names)),
        );

        let edit = if rendered.is_empty() {
            removal(source, statement)
        } else {
            Edit {
                start: statement.start_byte,
                end: statement.end_byte,
                text: rendered.join(&format!("{newline}{indent}")),
            }
        };
        if source[edit.start..edit.end] != edit.text {
            edits.push(edit);
        }
    }

    if edits.is_empty() {
        return Rewrite::unchanged(source);
    }

    edits.sort_by(|a, b| b.start.cmp(&a.start));
    let mut text = source.to_string();
    for edit in &edits {
        text.replace_range(edit.start..edit.end, &edit.text);
    }

    Rewrite {
        changed: text != source,
        text,
        applied,
    }
}

fn add_once(names: &mut Vec<ImportedName>, imported: &ImportedName) {
    if !names.iter().any(|name| name.same_binding(imported)) {
        names.push(imported.clone());
    }
}

/// Re-render a statement in its own style
fn render_like(
    statement: &ImportStatement,
    names: &[ImportedName],
    indent: &str,
    newline: &str,
) -> String {
    let rendered: Vec<String> = names.iter().map(ImportedName::render).collect();
    if statement.parenthesized && statement.spans_lines() {
        let body: Vec<String> = rendered
            .iter()
            .zip(names)
            .map(|(rendered, name)| match &name.comment {
                Some(comment) => format!("{indent}    {rendered},  {comment}"),
                None => format!("{indent}    {rendered},"),
            })
            .collect();
        format!(
            "from {} import ({newline}{}{newline}{indent})",
            statement.module,
            body.join(newline)
        )
    } else if statement.parenthesized {
        format!("from {} import ({})", statement.module, rendered.join(", "))
    } else {
        render_plain(&statement.module, names)
    }
}

fn render_plain(module: &str, names: &[ImportedName]) -> String {
    let rendered: Vec<String> = names.iter().map(ImportedName::render).collect();
    format!("from {module} import {}", rendered.join(", "))
}

fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map_or(0, |i| i + 1)
}

/// Leading whitespace of the physical line holding `offset`
fn line_indent(source: &str, offset: usize) -> &str {
    let prefix = &source[line_start(source, offset)..offset];
    let code = prefix.trim_start_matches([' ', '\t']);
    &prefix[..prefix.len() - code.len()]
}

/// Edit that deletes a statement whose names all moved away
fn removal(source: &str, statement: &ImportStatement) -> Edit {
    let (start, end) = (statement.start_byte, statement.end_byte);
    if statement.sole_in_block {
        return Edit {
            start,
            end,
            text: "pass".to_string(),
        };
    }

    let first = line_start(source, start);
    let last = source[end..].find('\n').map_or(source.len(), |i| end + i + 1);
    let prefix = &source[first..start];
    let suffix = source[end..last].trim();
    if prefix.trim().is_empty() && (suffix.is_empty() || suffix.starts_with('#')) {
        return Edit {
            start: first,
            end: last,
            text: String::new(),
        };
    }

    // shares its line with other statements
    let after = &source[end..];
    let trimmed = after.trim_start_matches([' ', '\t']);
    if trimmed.starts_with(';') {
        let separator_end = end + (after.len() - trimmed.len()) + 1;
        let rest = &source[separator_end..];
        let gap = rest.len() - rest.trim_start_matches([' ', '\t']).len();
        return Edit {
            start,
            end: separator_end + gap,
            text: String::new(),
        };
    }
    if let Some(semicolon) = prefix.rfind(';') {
        return Edit {
            start: first + semicolon,
            end,
            text: String::new(),
        };
    }
    Edit {
        start,
        end,
        text: "pass".to_string(),
    }
}
