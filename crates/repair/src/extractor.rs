use crate::error::Result;
use crate::parser::{ImportStatement, ScriptParser};
use crate::types::Reference;
use archgen_catalog::{is_component_name, Catalog};

/// Picks component references out of parsed import statements.
///
/// Only modules under the provider namespace count, and only names that
/// start with an uppercase letter: lowercase names are helper functions
/// or submodules, not drawable components.
#[derive(Debug, Clone)]
pub struct ReferenceExtractor {
    namespace: String,
}

impl ReferenceExtractor {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self::new(catalog.namespace())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Whether `module` lives strictly under the namespace
    pub fn covers(&self, module: &str) -> bool {
        module
            .strip_prefix(self.namespace.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|rest| !rest.is_empty())
    }

    pub fn references(&self, statements: &[ImportStatement]) -> Vec<Reference> {
        statements
            .iter()
            .filter(|statement| !statement.wildcard && self.covers(&statement.module))
            .flat_map(|statement| {
                statement
                    .names
                    .iter()
                    .filter(|imported| is_component_name(&imported.name))
                    .map(|imported| Reference {
                        category: statement.module.clone(),
                        name: imported.name.clone(),
                        alias: imported.alias.clone(),
                        line: imported.line,
                    })
            })
            .collect()
    }

    pub fn extract(&self, parser: &mut ScriptParser, source: &str) -> Result<Vec<Reference>> {
        let statements = parser.parse_imports(source)?;
        Ok(self.references(&statements))
    }
}

/// Component references of a script, in source order
pub fn extract_references(source: &str, namespace: &str) -> Result<Vec<Reference>> {
    let mut parser = ScriptParser::new()?;
    ReferenceExtractor::new(namespace).extract(&mut parser, source)
}
