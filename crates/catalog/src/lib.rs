//! # Archgen Catalog
//!
//! Versioned catalog of the drawable component types exported by the
//! `diagrams` package, grouped by category module.
//!
//! The catalog is a static TOML document generated offline and bundled at
//! compile time, so lookups never depend on a live Python installation:
//!
//! ```text
//! data/diagrams.toml
//!     │
//!     ├──> per-category load (bad categories are skipped and recorded)
//!     │
//!     ├──> provider filter (e.g. diagrams.aws.*)
//!     │
//!     └──> index: component name -> canonical category
//!          (lexicographic tie-break, [canonical] pins win)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use archgen_catalog::build_catalog;
//!
//! let catalog = build_catalog();
//! assert_eq!(catalog.category_of("S3"), Some("diagrams.aws.storage"));
//! assert!(catalog.exports("diagrams.aws.compute", "EC2"));
//! ```

mod catalog;
mod error;

pub use catalog::{build_catalog, is_component_name, Catalog, DEFAULT_PROVIDER, SCHEMA_VERSION};
pub use error::{CatalogError, CatalogLoadError, Result};
