use crate::types::{FixRecord, Reference, ValidationResult};
use std::collections::BTreeMap;

/// Moves to apply: `(source category, name) -> target category`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewritePlan {
    moves: BTreeMap<(String, String), String>,
}

impl RewritePlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan built from every `WrongCategory` verdict
    pub fn from_verdicts<'a, I>(verdicts: I) -> Self
    where
        I: IntoIterator<Item = (&'a Reference, &'a ValidationResult)>,
    {
        let mut plan = Self::new();
        for (reference, verdict) in verdicts {
            if let ValidationResult::WrongCategory(correct) = verdict {
                plan.insert(&reference.name, &reference.category, correct);
            }
        }
        plan
    }

    /// Returns false when the move was already planned
    pub fn insert(&mut self, name: &str, from: &str, to: &str) -> bool {
        self.moves
            .insert((from.to_string(), name.to_string()), to.to_string())
            .is_none()
    }

    pub fn target(&self, from: &str, name: &str) -> Option<&str> {
        self.moves
            .get(&(from.to_string(), name.to_string()))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn moves(&self) -> impl Iterator<Item = FixRecord> + '_ {
        self.moves
            .iter()
            .map(|((from, name), to)| FixRecord::new(name, from, to))
    }
}
