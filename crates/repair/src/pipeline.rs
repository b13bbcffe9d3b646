use crate::error::Result;
use crate::extractor::ReferenceExtractor;
use crate::parser::ScriptParser;
use crate::plan::RewritePlan;
use crate::rewriter;
use crate::types::{category_leaf, FixRecord, UnknownComponent, ValidationResult};
use crate::validator::validate;
use archgen_catalog::Catalog;
use serde::Serialize;

/// Outcome of one repair pass over a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    #[serde(skip_serializing)]
    pub corrected_text: String,

    /// Number of component references checked
    pub checked: usize,

    pub fixed: Vec<FixRecord>,

    pub unknown: Vec<UnknownComponent>,

    pub changed: bool,

    /// Script did not parse and was passed through untouched
    pub parse_failed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

impl RepairReport {
    fn passthrough(source: &str, reason: String) -> Self {
        Self {
            corrected_text: source.to_string(),
            checked: 0,
            fixed: Vec::new(),
            unknown: Vec::new(),
            changed: false,
            parse_failed: true,
            parse_error: Some(reason),
        }
    }

    /// One-line status for terminals and audit logs
    pub fn status(&self) -> &'static str {
        if self.parse_failed {
            "imports not checked: script does not parse"
        } else if self.changed {
            "imports corrected"
        } else {
            "all imports valid"
        }
    }

    /// Human-readable lines describing each fix and unknown name
    pub fn details(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .fixed
            .iter()
            .map(|fix| {
                format!(
                    "{}: {} -> {}",
                    fix.name,
                    category_leaf(&fix.from),
                    category_leaf(&fix.to)
                )
            })
            .collect();
        lines.extend(self.unknown.iter().map(|unknown| {
            format!(
                "{}: not found in any category (line {}, imported from {})",
                unknown.name,
                unknown.line,
                category_leaf(&unknown.category)
            )
        }));
        if let Some(reason) = &self.parse_error {
            lines.push(reason.clone());
        }
        lines
    }
}

/// Validates and corrects component imports against one catalog
pub struct Repairer<'c> {
    catalog: &'c Catalog,
    parser: ScriptParser,
    extractor: ReferenceExtractor,
}

impl<'c> Repairer<'c> {
    pub fn new(catalog: &'c Catalog) -> Result<Self> {
        Ok(Self {
            catalog,
            parser: ScriptParser::new()?,
            extractor: ReferenceExtractor::for_catalog(catalog),
        })
    }

    pub fn repair(&mut self, source: &str) -> RepairReport {
        let statements = match self.parser.parse_imports(source) {
            Ok(statements) => statements,
            Err(e) => {
                log::warn!("Skipping import repair: {e}");
                return RepairReport::passthrough(source, e.to_string());
            }
        };

        let references = self.extractor.references(&statements);
        log::info!(
            "Checking {} component imports against {}",
            references.len(),
            self.catalog.source_label()
        );

        let mut plan = RewritePlan::new();
        let mut unknown = Vec::new();
        for reference in &references {
            match validate(reference, self.catalog) {
                ValidationResult::Valid => {}
                ValidationResult::WrongCategory(correct) => {
                    plan.insert(&reference.name, &reference.category, &correct);
                }
                ValidationResult::Unknown => unknown.push(UnknownComponent::from(reference)),
            }
        }

        let rewrite = rewriter::apply(source, &statements, &plan);
        for fix in &rewrite.applied {
            log::info!(
                "Fixed import: {} moved from {} to {}",
                fix.name,
                fix.from,
                fix.to
            );
        }

        RepairReport {
            corrected_text: rewrite.text,
            checked: references.len(),
            fixed: rewrite.applied,
            unknown,
            changed: rewrite.changed,
            parse_failed: false,
            parse_error: None,
        }
    }
}

/// One-shot repair of `source` against `catalog`
pub fn repair(source: &str, catalog: &Catalog) -> Result<RepairReport> {
    Ok(Repairer::new(catalog)?.repair(source))
}
