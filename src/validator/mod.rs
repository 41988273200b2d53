//! Schema validation for extracted descriptors.
//!
//! This module provides an extensible rule-based validation system that runs
//! as the final sweep before assembly, confirming end-to-end what upstream
//! stages already reported at their point of origin.
//!
//! # Usage
//!
//! ```ignore
//! let findings = validate_schema(&records, &actions);
//! let diagnostics = finalize(upstream.into_iter().chain(findings).collect());
//! if !diagnostics.is_empty() {
//!     // Fail the submission with the full list
//! }
//! ```
//!
//! # Architecture
//!
//! The validation system follows a simple pattern:
//!
//! 1. **SchemaRule trait** - Each rule implements this trait
//! 2. **Validator** - Collects and runs all rules
//! 3. **finalize** - Merges, deduplicates, and orders the diagnostic list
//!
//! # Adding a New Rule
//!
//! 1. Create a new file in `validator/rules/`
//! 2. Implement `SchemaRule` for your struct
//! 3. Add it to the `Validator::new()` constructor
//!
//! That's it! No other changes needed.

pub mod rules;

use std::collections::HashSet;

use crate::catalog::{ActionDescriptor, RecordDescriptor};
use crate::diagnostics::Diagnostic;

#[cfg(test)]
mod tests;

// ============================================================================
// SchemaRule Trait
// ============================================================================

/// Trait that all schema validation rules must implement.
///
/// Each rule checks one clause of the schema contract. Rules should be:
/// - **Independent** - Don't depend on other rules' results
/// - **Deterministic** - Same descriptors, same findings, same order
/// - **Clear** - Produce helpful, actionable messages
pub trait SchemaRule: Send + Sync {
    /// Unique identifier for this rule (e.g., "duplicate-name")
    fn id(&self) -> &'static str;

    /// Human-readable description of what this rule checks
    fn description(&self) -> &'static str;

    /// Run the check and return any violations found.
    ///
    /// # Arguments
    /// * `records` - All resolved record descriptors, in declaration order
    /// * `actions` - All extracted action descriptors, in declaration order
    ///
    /// # Returns
    /// A vector of diagnostics. Empty vector means no issues found.
    fn check(
        &self,
        records: &[RecordDescriptor],
        actions: &[ActionDescriptor],
    ) -> Vec<Diagnostic>;
}

// ============================================================================
// Validator - Runs All Rules
// ============================================================================

/// The main validator that orchestrates all schema rules.
pub struct Validator {
    rules: Vec<Box<dyn SchemaRule>>,
}

impl Validator {
    /// Create a new validator with all built-in rules.
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(rules::UnresolvedReferenceRule),
                Box::new(rules::RecursiveRecordRule),
                Box::new(rules::DuplicateNameRule),
            ],
        }
    }

    /// Run all rules and collect their findings.
    pub fn validate(
        &self,
        records: &[RecordDescriptor],
        actions: &[ActionDescriptor],
    ) -> Vec<Diagnostic> {
        self.rules
            .iter()
            .flat_map(|rule| rule.check(records, actions))
            .collect()
    }

    /// Get a list of all registered rules (useful for documentation)
    pub fn rules(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.rules.iter().map(|r| (r.id(), r.description()))
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Validate a descriptor set and return all findings.
pub fn validate_schema(
    records: &[RecordDescriptor],
    actions: &[ActionDescriptor],
) -> Vec<Diagnostic> {
    let validator = Validator::new();
    validator.validate(records, actions)
}

/// Merge upstream and validator diagnostics into the final report.
///
/// Upstream stages report most violations where they originate, and the
/// rules re-derive the same ones from the descriptor set, so the merged
/// list is deduplicated by `(kind, symbol, location)` - the first entry
/// (stage order) wins. The survivors are ordered by source position, with
/// stage order breaking ties.
pub fn finalize(mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    let mut seen = HashSet::new();
    diagnostics.retain(|d| seen.insert((d.kind, d.symbol.clone(), d.location.start)));
    diagnostics.sort_by_key(|d| (d.location.start_line, d.location.start_col));
    diagnostics
}
