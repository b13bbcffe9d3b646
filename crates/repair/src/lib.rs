//! # Archgen Repair
//!
//! Validates the component imports of a generated `diagrams` script and
//! moves misplaced ones to the category that actually exports them.
//!
//! ```text
//! script text
//!     │
//!     ├──> ScriptParser (tree-sitter, every nesting level)
//!     │
//!     ├──> ReferenceExtractor (provider namespace, uppercase names)
//!     │
//!     ├──> validate() per reference: Valid | WrongCategory | Unknown
//!     │
//!     └──> rewriter: only affected statements change
//! ```
//!
//! Scripts that fail to parse come back untouched with `parse_failed` set.
//! Repairing an already repaired script changes nothing.
//!
//! ## Example
//!
//! ```rust
//! use archgen_catalog::build_catalog;
//! use archgen_repair::repair;
//!
//! let catalog = build_catalog();
//! let report = repair("from diagrams.aws.compute import EC2, S3\n", &catalog).unwrap();
//! assert_eq!(
//!     report.corrected_text,
//!     "from diagrams.aws.compute import EC2\nfrom diagrams.aws.storage import S3\n"
//! );
//! assert_eq!(report.fixed.len(), 1);
//! ```

mod error;
mod extractor;
mod parser;
mod pipeline;
mod plan;
mod rewriter;
mod types;
mod validator;

pub use error::{RepairError, Result};
pub use extractor::{extract_references, ReferenceExtractor};
pub use parser::{ImportStatement, ImportedName, ScriptParser};
pub use pipeline::{repair, RepairReport, Repairer};
pub use plan::RewritePlan;
pub use rewriter::{rewrite, Rewrite};
pub use types::{category_leaf, FixRecord, Reference, UnknownComponent, ValidationResult};
pub use validator::validate;
