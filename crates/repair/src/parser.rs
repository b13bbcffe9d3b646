use crate::error::{RepairError, Result};
use tree_sitter::{Node, Parser};

/// One name bound by a `from ... import` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedName {
    pub name: String,
    pub alias: Option<String>,
    /// Line the name appears on (1-indexed)
    pub line: usize,
    /// `# ...` comment trailing the name on its line
    pub comment: Option<String>,
}

impl ImportedName {
    #[must_use]
    pub fn new(name: impl Into<String>, alias: Option<String>) -> Self {
        Self {
            name: name.into(),
            alias,
            line: 0,
            comment: None,
        }
    }

    /// Same imported name bound to the same local name
    pub fn same_binding(&self, other: &Self) -> bool {
        self.name == other.name && self.alias == other.alias
    }

    /// Source form: `EC2` or `EC2 as Server`
    pub fn render(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} as {alias}", self.name),
            None => self.name.clone(),
        }
    }
}

/// An absolute `from <module> import ...` statement and where it sits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    /// Dotted module path with whitespace removed
    pub module: String,
    pub names: Vec<ImportedName>,
    /// `from module import *`
    pub wildcard: bool,
    /// Name list is wrapped in parentheses
    pub parenthesized: bool,
    pub start_byte: usize,
    pub end_byte: usize,
    /// First line of the statement (1-indexed)
    pub start_line: usize,
    /// Last line of the statement (1-indexed)
    pub end_line: usize,
    /// Only statement of an indented block, so removing it needs a `pass`
    pub sole_in_block: bool,
    /// Byte span of the enclosing module or block
    pub scope: (usize, usize),
}

impl ImportStatement {
    pub const fn spans_lines(&self) -> bool {
        self.end_line > self.start_line
    }
}

/// Python parser that locates `from ... import` statements
pub struct ScriptParser {
    parser: Parser,
}

impl ScriptParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| RepairError::tree_sitter(format!("Failed to set language: {e}")))?;
        Ok(Self { parser })
    }

    /// Every absolute `from ... import` statement in the script, at any
    /// nesting depth, in source order. Fails if the script has syntax errors.
    pub fn parse_imports(&mut self, source: &str) -> Result<Vec<ImportStatement>> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| RepairError::parse("Failed to parse source code"))?;

        let root = tree.root_node();
        if root.has_error() {
            let location = first_error(root)
                .map(|node| {
                    let pos = node.start_position();
                    format!(" near line {}, column {}", pos.row + 1, pos.column + 1)
                })
                .unwrap_or_default();
            return Err(RepairError::parse(format!(
                "script is not valid Python{location}"
            )));
        }

        let mut statements = Vec::new();
        collect_imports(source, root, &mut statements);
        Ok(statements)
    }
}

fn collect_imports(source: &str, node: Node, statements: &mut Vec<ImportStatement>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "import_from_statement" {
            if let Some(statement) = import_from(source, child) {
                statements.push(statement);
            }
        } else {
            collect_imports(source, child, statements);
        }
    }
}

fn import_from(source: &str, node: Node) -> Option<ImportStatement> {
    let module_node = node.child_by_field_name("module_name")?;
    // relative imports never name a catalog category
    if module_node.kind() != "dotted_name" {
        return None;
    }

    let mut names = Vec::new();
    let mut cursor = node.walk();
    for name_node in node.children_by_field_name("name", &mut cursor) {
        let line = name_node.start_position().row + 1;
        let imported = if name_node.kind() == "aliased_import" {
            let name = name_node.child_by_field_name("name")?;
            let alias = name_node
                .child_by_field_name("alias")
                .map(|alias| squash(node_text(source, alias)));
            ImportedName {
                name: squash(node_text(source, name)),
                alias,
                line,
                comment: None,
            }
        } else {
            ImportedName {
                name: squash(node_text(source, name_node)),
                alias: None,
                line,
                comment: None,
            }
        };
        names.push(imported);
    }

    let mut wildcard = false;
    let mut parenthesized = false;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "wildcard_import" => wildcard = true,
            "(" => parenthesized = true,
            "comment" => {
                let line = child.start_position().row + 1;
                if let Some(imported) = names.iter_mut().rev().find(|n| n.line == line) {
                    imported.comment = Some(node_text(source, child).trim_end().to_string());
                }
            }
            _ => {}
        }
    }

    Some(ImportStatement {
        module: squash(node_text(source, module_node)),
        names,
        wildcard,
        parenthesized,
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
        start_line: node.start_position().row + 1,
        end_line: node.end_position().row + 1,
        sole_in_block: sole_in_block(node),
        scope: node
            .parent()
            .map_or((0, source.len()), |parent| (parent.start_byte(), parent.end_byte())),
    })
}

fn sole_in_block(node: Node) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    if parent.kind() != "block" {
        return false;
    }
    let mut cursor = parent.walk();
    let statements = parent
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .count();
    statements == 1
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}

fn node_text<'a>(source: &'a str, node: Node) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// `diagrams . aws` and `diagrams.aws` name the same module
fn squash(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
