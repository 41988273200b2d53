//! The extraction pipeline: one submitted module in, one schema out.
//!
//! Stages run in a fixed order - Parsing, Resolving, GraphChecking,
//! Extracting, Validating, Assembled - and any stage can instead end the run
//! with the collected diagnostics. No partial catalog is ever produced. The
//! pipeline is pure and synchronous; a configured [`SchemaExtractor`] shares
//! no mutable state between runs, so one instance may serve many threads.

use thiserror::Error;
use tracing::debug;

use crate::catalog::PluginSchema;
use crate::diagnostics::{Diagnostic, MODULE_SYMBOL};
use crate::extractor::extract_actions;
use crate::graph;
use crate::options::ExtractOptions;
use crate::parser::parse_module;
use crate::resolver::{RecordTable, Resolver};
use crate::validator;

/// Pipeline stages, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parsing,
    Resolving,
    GraphChecking,
    Extracting,
    Validating,
    Assembled,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Parsing => "parsing",
            Stage::Resolving => "resolving",
            Stage::GraphChecking => "graph-checking",
            Stage::Extracting => "extracting",
            Stage::Validating => "validating",
            Stage::Assembled => "assembled",
        };
        write!(f, "{}", name)
    }
}

/// Extraction failed. Carries the submission's full diagnostic list so one
/// edit-and-resubmit cycle can fix every reported issue.
#[derive(Debug, Clone, Error)]
#[error("Schema extraction failed with {} diagnostic(s)", .diagnostics.len())]
pub struct ExtractError {
    /// Every violation found, ordered by source location
    pub diagnostics: Vec<Diagnostic>,
}

/// The schema extraction engine.
///
/// Configured once with [`ExtractOptions`] and reused across submissions;
/// each call to [`extract`](SchemaExtractor::extract) runs an independent
/// pipeline over its own intermediate state.
#[derive(Debug, Clone)]
pub struct SchemaExtractor {
    options: ExtractOptions,
}

impl SchemaExtractor {
    /// Create an extractor with default options
    pub fn new() -> Self {
        Self::with_options(ExtractOptions::default())
    }

    /// Create an extractor with the given options
    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The configured options
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Run the whole pipeline over one plugin module.
    ///
    /// Returns the assembled schema, or every diagnostic the submission
    /// produced. Only a parse failure aborts early; all later stages keep
    /// collecting so the author sees the complete report.
    pub fn extract(&self, source: &str) -> Result<PluginSchema, ExtractError> {
        debug!(stage = %Stage::Parsing, bytes = source.len(), "Parsing plugin module");
        let module = match parse_module(source) {
            Ok(module) => module,
            Err(err) => {
                let diagnostic = Diagnostic::malformed_declaration(
                    err.span().unwrap_or_default(),
                    MODULE_SYMBOL,
                    err.message(),
                );
                return fail(Stage::Parsing, vec![diagnostic]);
            }
        };

        debug!(
            stage = %Stage::Resolving,
            records = module.records.len(),
            actions = module.actions.len(),
            "Resolving type annotations"
        );
        let mut diagnostics = Vec::new();
        let table = RecordTable::build(&module.records, &mut diagnostics);
        let resolver = Resolver::new(&self.options.keywords, &table);
        let records = resolver.resolve_records(&module.records, &mut diagnostics);

        debug!(stage = %Stage::GraphChecking, records = records.len(), "Checking record graph");
        diagnostics.extend(graph::check_cycles(&records));

        debug!(stage = %Stage::Extracting, candidates = module.actions.len(), "Extracting actions");
        let actions = extract_actions(
            &module.actions,
            &resolver,
            &self.options.exclusion_prefix,
            &mut diagnostics,
        );

        debug!(stage = %Stage::Validating, collected = diagnostics.len(), "Validating schema");
        diagnostics.extend(validator::validate_schema(&records, &actions));
        let diagnostics = validator::finalize(diagnostics);

        if !diagnostics.is_empty() {
            return fail(Stage::Validating, diagnostics);
        }

        debug!(
            stage = %Stage::Assembled,
            records = records.len(),
            actions = actions.len(),
            "Assembled plugin schema"
        );
        Ok(PluginSchema::new(records, actions))
    }
}

impl Default for SchemaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn fail(stage: Stage, diagnostics: Vec<Diagnostic>) -> Result<PluginSchema, ExtractError> {
    debug!(stage = %stage, count = diagnostics.len(), "Extraction failed");
    Err(ExtractError { diagnostics })
}

/// Extract a schema from plugin source with default options.
///
/// This is the main entry point for hosts that do not customize the
/// exclusion marker or keyword table.
pub fn extract_schema(source: &str) -> Result<PluginSchema, ExtractError> {
    SchemaExtractor::new().extract(source)
}
