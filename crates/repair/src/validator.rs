use crate::types::{category_leaf, Reference, ValidationResult};
use archgen_catalog::Catalog;

/// Checks a reference against the catalog.
///
/// A direct export wins even when the index points elsewhere, so names
/// exported by several categories are accepted from any of them.
pub fn validate(reference: &Reference, catalog: &Catalog) -> ValidationResult {
    if catalog.exports(&reference.category, &reference.name) {
        log::debug!(
            "✓ {} found in {}",
            reference.name,
            category_leaf(&reference.category)
        );
        return ValidationResult::Valid;
    }

    match catalog.category_of(&reference.name) {
        Some(correct) => {
            log::info!(
                "✗ {} not in {}, belongs to {}",
                reference.name,
                category_leaf(&reference.category),
                category_leaf(correct)
            );
            ValidationResult::WrongCategory(correct.to_string())
        }
        None => {
            log::warn!(
                "? {} (line {}) is not exported by any {} category",
                reference.name,
                reference.line,
                catalog.namespace()
            );
            ValidationResult::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgen_catalog::build_catalog;

    #[test]
    fn verdicts() {
        let catalog = build_catalog();
        assert_eq!(
            validate(&Reference::new("diagrams.aws.compute", "EC2"), &catalog),
            ValidationResult::Valid
        );
        assert_eq!(
            validate(&Reference::new("diagrams.aws.compute", "S3"), &catalog),
            ValidationResult::WrongCategory("diagrams.aws.storage".into())
        );
        assert_eq!(
            validate(&Reference::new("diagrams.aws.network", "Route53Domain"), &catalog),
            ValidationResult::Unknown
        );
    }

    #[test]
    fn any_exporting_category_is_valid() {
        let catalog = build_catalog();
        assert_eq!(
            validate(&Reference::new("diagrams.aws.management", "AutoScaling"), &catalog),
            ValidationResult::Valid
        );
        assert_eq!(
            validate(&Reference::new("diagrams.aws.compute", "AutoScaling"), &catalog),
            ValidationResult::Valid
        );
    }

    #[test]
    fn unknown_category_falls_back_to_lookup() {
        let catalog = build_catalog();
        assert_eq!(
            validate(&Reference::new("diagrams.aws.servers", "EC2"), &catalog),
            ValidationResult::WrongCategory("diagrams.aws.compute".into())
        );
    }
}
