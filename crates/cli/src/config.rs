use crate::GenerateArgs;
use anyhow::{Context as AnyhowContext, Result};
use archgen_catalog::Catalog;
use archgen_generator::{BedrockConfig, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use std::path::Path;

/// Catalog from `--catalog` / `ARCHGEN_CATALOG`, else the bundled one
pub(crate) fn load_catalog(path: Option<&Path>, provider: &str) -> Result<Catalog> {
    let catalog = match path {
        Some(path) => Catalog::from_file(path, provider)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => Catalog::builtin(provider)
            .with_context(|| format!("Bundled catalog has no '{provider}' provider"))?,
    };
    log::debug!(
        "Catalog {}: {} categories, {} components under {}",
        catalog.source_label(),
        catalog.category_count(),
        catalog.component_count(),
        catalog.namespace()
    );
    Ok(catalog)
}

pub(crate) fn bedrock_config(args: &GenerateArgs) -> BedrockConfig {
    BedrockConfig {
        region: args.region.clone(),
        model_id: args.model.clone(),
        max_tokens: DEFAULT_MAX_TOKENS,
        temperature: DEFAULT_TEMPERATURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn bundled_catalog_by_default() {
        let catalog = load_catalog(None, "aws").unwrap();
        assert_eq!(catalog.namespace(), "diagrams.aws");
    }

    #[test]
    fn unknown_provider_is_reported() {
        let err = load_catalog(None, "nowhere").unwrap_err();
        assert!(format!("{err:#}").contains("nowhere"));
    }

    #[test]
    fn catalog_file_error_names_the_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("broken.toml");
        fs::write(&path, "schema_version = 99\npackage = \"diagrams\"\n").unwrap();

        let err = load_catalog(Some(&path), "aws").unwrap_err();
        assert!(format!("{err:#}").contains("broken.toml"));
    }
}
