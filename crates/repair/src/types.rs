use serde::Serialize;

/// A component imported from a catalog category by the script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Category module the script imports from, e.g. `diagrams.aws.compute`
    pub category: String,

    /// Component type name, e.g. `EC2`
    pub name: String,

    /// Local alias (`import EC2 as Server`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Line of the imported name (1-indexed)
    pub line: usize,
}

impl Reference {
    #[must_use]
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            alias: None,
            line: 0,
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub const fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

/// Verdict for one reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "category", rename_all = "snake_case")]
pub enum ValidationResult {
    /// The stated category exports the component
    Valid,

    /// The component exists, but in this other category
    WrongCategory(String),

    /// No category exports the component
    Unknown,
}

/// A component moved from one category import to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixRecord {
    pub name: String,
    pub from: String,
    pub to: String,
}

impl FixRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A referenced component that no category exports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownComponent {
    pub name: String,
    pub category: String,
    pub line: usize,
}

impl From<&Reference> for UnknownComponent {
    fn from(reference: &Reference) -> Self {
        Self {
            name: reference.name.clone(),
            category: reference.category.clone(),
            line: reference.line,
        }
    }
}

/// Last segment of a category path: `diagrams.aws.storage` -> `storage`
pub fn category_leaf(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}
