use crate::error::{CatalogError, CatalogLoadError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../data/diagrams.toml");

/// Catalog schema understood by this build
pub const SCHEMA_VERSION: u32 = 1;

/// Provider indexed when none is requested explicitly
pub const DEFAULT_PROVIDER: &str = "aws";

#[derive(Debug, Deserialize)]
struct RawCatalog {
    schema_version: u32,
    package: String,
    #[serde(default)]
    package_version: Option<String>,
    #[serde(default)]
    canonical: BTreeMap<String, String>,
    #[serde(default)]
    categories: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    exports: Vec<String>,
}

/// Immutable lookup of drawable component types for one provider.
///
/// Holds every loaded category with its component names, plus the derived
/// index from component name to canonical category. A name exported by more
/// than one category resolves to the first category in lexicographic path
/// order, unless the catalog document pins it in its `[canonical]` table.
#[derive(Debug, Clone)]
pub struct Catalog {
    package: String,
    package_version: Option<String>,
    namespace: String,
    categories: BTreeMap<String, BTreeSet<String>>,
    index: HashMap<String, String>,
    skipped: Vec<CatalogLoadError>,
}

impl Catalog {
    /// Catalog bundled with this build
    pub fn builtin(provider: &str) -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG, provider)
    }

    /// Load an alternative catalog document from disk
    pub fn from_file(path: impl AsRef<Path>, provider: &str) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("Loading catalog from {}", path.display());
        Self::from_toml_str(&text, provider)
    }

    /// Parse a catalog document and index the categories of `provider`
    pub fn from_toml_str(text: &str, provider: &str) -> Result<Self> {
        let raw: RawCatalog =
            toml::from_str(text).map_err(|e| CatalogError::InvalidDocument(e.to_string()))?;

        if raw.schema_version != SCHEMA_VERSION {
            return Err(CatalogError::UnsupportedSchema {
                found: raw.schema_version,
                expected: SCHEMA_VERSION,
            });
        }
        if !is_identifier(&raw.package) {
            return Err(CatalogError::InvalidDocument(format!(
                "package name '{}' is not an identifier",
                raw.package
            )));
        }

        Self::from_raw(raw, provider)
    }

    fn from_raw(raw: RawCatalog, provider: &str) -> Result<Self> {
        let namespace = format!("{}.{provider}", raw.package);
        let mut known_providers = BTreeSet::new();
        let mut categories = BTreeMap::new();
        let mut skipped = Vec::new();

        // BTreeMap iteration is lexicographic, which fixes the tie-break order.
        for (path, value) in raw.categories {
            match load_category(&raw.package, &path, value) {
                Ok((category_provider, names)) => {
                    let in_scope = category_provider == provider;
                    known_providers.insert(category_provider);
                    if in_scope {
                        categories.insert(path, names);
                    } else {
                        log::trace!("Skipping {path}: outside provider {provider}");
                    }
                }
                Err(err) => {
                    log::warn!("{err}");
                    skipped.push(err);
                }
            }
        }

        if !known_providers.contains(provider) {
            return Err(CatalogError::UnknownProvider {
                provider: provider.to_string(),
                known: known_providers.into_iter().collect::<Vec<_>>().join(", "),
            });
        }

        let mut index: HashMap<String, String> = HashMap::new();
        for (path, names) in &categories {
            for name in names {
                index.entry(name.clone()).or_insert_with(|| path.clone());
            }
        }

        for (name, path) in raw.canonical {
            if !path.starts_with(&namespace) || !path[namespace.len()..].starts_with('.') {
                continue;
            }
            match categories.get(&path) {
                Some(names) if names.contains(&name) => {
                    index.insert(name, path);
                }
                _ => log::warn!("Ignoring canonical pin {name} -> {path}: not exported there"),
            }
        }

        log::debug!(
            "Indexed {} components across {} categories of {namespace} ({} skipped)",
            index.len(),
            categories.len(),
            skipped.len()
        );

        Ok(Self {
            package: raw.package,
            package_version: raw.package_version,
            namespace,
            categories,
            index,
            skipped,
        })
    }

    /// Provider namespace this catalog covers, e.g. `diagrams.aws`
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Root package name, e.g. `diagrams`
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Human-readable origin, e.g. `diagrams 0.23.4`
    pub fn source_label(&self) -> String {
        match &self.package_version {
            Some(version) => format!("{} {version}", self.package),
            None => self.package.clone(),
        }
    }

    /// Whether `path` is inside this catalog's provider namespace
    pub fn in_namespace(&self, path: &str) -> bool {
        path.strip_prefix(self.namespace.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|rest| !rest.is_empty())
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Direct existence check: does `category` export component `name`?
    pub fn exports(&self, category: &str, name: &str) -> bool {
        self.categories
            .get(category)
            .is_some_and(|names| names.contains(name))
    }

    /// Canonical category of a component, if any category exports it
    pub fn category_of(&self, name: &str) -> Option<&str> {
        self.index.get(name).map(String::as_str)
    }

    /// All categories that export `name`, in lexicographic order
    pub fn categories_exporting<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.categories
            .iter()
            .filter(move |(_, names)| names.contains(name))
            .map(|(path, _)| path.as_str())
    }

    /// Category paths in lexicographic order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Component names of one category, sorted
    pub fn components(&self, category: &str) -> Option<impl Iterator<Item = &str>> {
        self.categories
            .get(category)
            .map(|names| names.iter().map(String::as_str))
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Number of distinct component names
    pub fn component_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Categories that failed to load
    pub fn skipped(&self) -> &[CatalogLoadError] {
        &self.skipped
    }
}

/// Build the bundled catalog for the default provider.
pub fn build_catalog() -> Catalog {
    Catalog::builtin(DEFAULT_PROVIDER).expect("bundled catalog must index the default provider")
}

/// Drawable component types follow the package's class naming convention.
pub fn is_component_name(symbol: &str) -> bool {
    symbol.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

fn load_category(
    package: &str,
    path: &str,
    value: toml::Value,
) -> std::result::Result<(String, BTreeSet<String>), CatalogLoadError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| !is_identifier(segment)) {
        return Err(CatalogLoadError::new(path, "malformed module path"));
    }
    if segments[0] != package {
        return Err(CatalogLoadError::new(path, format!("outside package {package}")));
    }
    if segments.len() != 3 {
        return Err(CatalogLoadError::new(
            path,
            "expected <package>.<provider>.<category>",
        ));
    }

    let raw: RawCategory = value
        .try_into()
        .map_err(|e: toml::de::Error| CatalogLoadError::new(path, e.message().to_string()))?;

    if let Some(bad) = raw.exports.iter().find(|symbol| !is_identifier(symbol)) {
        return Err(CatalogLoadError::new(path, format!("invalid symbol '{bad}'")));
    }

    let names = raw
        .exports
        .into_iter()
        .filter(|symbol| is_component_name(symbol))
        .collect();

    Ok((segments[1].to_string(), names))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
