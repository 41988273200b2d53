//! Tests for the schema validation system

use super::*;
use crate::ast::Span;
use crate::catalog::{FieldDescriptor, ParameterDescriptor};
use crate::diagnostics::DiagnosticKind;
use crate::extractor::extract_actions;
use crate::options::TypeKeywords;
use crate::parser::parse_module;
use crate::resolver::{RecordTable, Resolver};
use crate::types::TypeExpr;

// ============================================================================
// Helper Functions
// ============================================================================

/// Resolve a source module into descriptors, discarding upstream diagnostics
/// so the rules are exercised on their own.
fn descriptors(source: &str) -> (Vec<RecordDescriptor>, Vec<ActionDescriptor>) {
    let module = parse_module(source).expect("Parse should succeed");

    let mut upstream = Vec::new();
    let table = RecordTable::build(&module.records, &mut upstream);
    let keywords = TypeKeywords::default();
    let resolver = Resolver::new(&keywords, &table);
    let records = resolver.resolve_records(&module.records, &mut upstream);
    let actions = extract_actions(&module.actions, &resolver, "_", &mut upstream);

    (records, actions)
}

/// Run all rules over a source module
fn validate(source: &str) -> Vec<Diagnostic> {
    let (records, actions) = descriptors(source);
    validate_schema(&records, &actions)
}

/// Check if diagnostics contain a specific kind
fn has_kind(diagnostics: &[Diagnostic], kind: DiagnosticKind) -> bool {
    diagnostics.iter().any(|d| d.kind == kind)
}

/// Get diagnostics of a specific kind
fn for_kind(diagnostics: &[Diagnostic], kind: DiagnosticKind) -> Vec<&Diagnostic> {
    diagnostics.iter().filter(|d| d.kind == kind).collect()
}

/// A record whose single field has the given type
fn record_with_field(name: &str, field_ty: TypeExpr) -> RecordDescriptor {
    RecordDescriptor {
        name: name.to_string(),
        fields: vec![FieldDescriptor {
            name: "value".to_string(),
            ty: field_ty,
            span: Span::default(),
        }],
        declaration_order: 0,
        name_span: Span::default(),
    }
}

// ============================================================================
// Duplicate Name Tests
// ============================================================================

#[test]
fn test_duplicate_records_found() {
    let source = "record Foo { x: int }\nrecord Foo { y: str }";

    let diagnostics = validate(source);
    let dups = for_kind(&diagnostics, DiagnosticKind::DuplicateName);
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].symbol, "Foo");
    assert!(dups[0].message.contains("line 1"));
}

#[test]
fn test_duplicate_actions_found() {
    let source = "action search(a: int)\naction search(b: str)";

    let diagnostics = validate(source);
    let dups = for_kind(&diagnostics, DiagnosticKind::DuplicateName);
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].symbol, "search");
}

#[test]
fn test_record_and_action_namespaces_are_separate() {
    let source = "record Report { body: str }\naction Report() -> Report";

    let diagnostics = validate(source);
    assert!(
        !has_kind(&diagnostics, DiagnosticKind::DuplicateName),
        "A record and an action may share a name"
    );
}

#[test]
fn test_triple_duplicate_reports_each_later_occurrence() {
    let source = "record Foo { a: int }\nrecord Foo { b: int }\nrecord Foo { c: int }";

    let diagnostics = validate(source);
    let dups = for_kind(&diagnostics, DiagnosticKind::DuplicateName);
    assert_eq!(dups.len(), 2);
    assert_eq!(dups[0].location.start_line, 1);
    assert_eq!(dups[1].location.start_line, 2);
}

// ============================================================================
// Recursive Record Tests
// ============================================================================

#[test]
fn test_recursive_record_found() {
    let diagnostics = validate("record Cons { car: int, cdr: Cons }");

    let cycles = for_kind(&diagnostics, DiagnosticKind::RecursiveRecord);
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].symbol, "Cons");
}

#[test]
fn test_recursion_through_container_found() {
    let diagnostics = validate("record Tree { children: list[Tree] }");

    assert!(has_kind(&diagnostics, DiagnosticKind::RecursiveRecord));
}

#[test]
fn test_acyclic_references_pass() {
    let source = "record Author { name: str }\nrecord Article { author: Author }";

    let diagnostics = validate(source);
    assert!(!has_kind(&diagnostics, DiagnosticKind::RecursiveRecord));
}

// ============================================================================
// Unresolved Reference Tests
// ============================================================================

#[test]
fn test_unresolved_field_reference() {
    // The resolver never emits a dangling RecordRef, so build one directly
    let records = vec![record_with_field(
        "Article",
        TypeExpr::record_ref("Publisher"),
    )];

    let diagnostics = validate_schema(&records, &[]);
    let unresolved = for_kind(&diagnostics, DiagnosticKind::AmbiguousReference);
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].symbol, "Article");
    assert!(unresolved[0].message.contains("Publisher"));
}

#[test]
fn test_unresolved_reference_inside_wrapper() {
    let records = vec![record_with_field(
        "Index",
        TypeExpr::dict_of(TypeExpr::Str, TypeExpr::record_ref("Missing")),
    )];

    let diagnostics = validate_schema(&records, &[]);
    assert!(has_kind(&diagnostics, DiagnosticKind::AmbiguousReference));
}

#[test]
fn test_unresolved_parameter_and_return_references() {
    let action = ActionDescriptor {
        name: "lookup".to_string(),
        parameters: vec![ParameterDescriptor {
            name: "query".to_string(),
            ty: TypeExpr::record_ref("Query"),
            default: None,
            span: Span::default(),
        }],
        return_type: TypeExpr::list_of(TypeExpr::record_ref("Result")),
        is_suspending: false,
        docstring: None,
        purpose: None,
        name_span: Span::default(),
    };

    let diagnostics = validate_schema(&[], &[action]);
    let unresolved = for_kind(&diagnostics, DiagnosticKind::AmbiguousReference);
    assert_eq!(unresolved.len(), 2);
    assert!(unresolved.iter().all(|d| d.symbol == "lookup"));
}

#[test]
fn test_resolvable_references_pass() {
    let source = "record Newspaper { id: str }\naction search(terms: str) -> list[Newspaper]";

    let diagnostics = validate(source);
    assert!(!has_kind(&diagnostics, DiagnosticKind::AmbiguousReference));
}

// ============================================================================
// Validator Integration Tests
// ============================================================================

#[test]
fn test_validator_runs_all_rules() {
    let validator = Validator::new();
    let rules: Vec<_> = validator.rules().collect();

    assert_eq!(rules.len(), 3);
    assert!(rules.iter().any(|(id, _)| *id == "unresolved-reference"));
    assert!(rules.iter().any(|(id, _)| *id == "recursive-record"));
    assert!(rules.iter().any(|(id, _)| *id == "duplicate-name"));
}

#[test]
fn test_clean_module_has_no_findings() {
    let source = r#"
record Newspaper { id: str, publisher: str, title: str }
action search(terms: str) -> list[Newspaper]
async action fetch(url: str) -> str
"#;

    let diagnostics = validate(source);
    assert!(diagnostics.is_empty(), "Clean module should validate: {:?}", diagnostics);
}

#[test]
fn test_validator_multiple_findings() {
    let source = "record Cons { cdr: Cons }\nrecord Cons { x: int }";

    let diagnostics = validate(source);
    assert!(has_kind(&diagnostics, DiagnosticKind::RecursiveRecord));
    assert!(has_kind(&diagnostics, DiagnosticKind::DuplicateName));
}

// ============================================================================
// Finalize Tests
// ============================================================================

#[test]
fn test_finalize_dedups_upstream_and_rule_copies() {
    let source = "record Foo { x: int }\nrecord Foo { y: str }";
    let module = parse_module(source).expect("Parse should succeed");

    // Upstream pre-pass reports the duplicate once
    let mut diagnostics = Vec::new();
    let table = RecordTable::build(&module.records, &mut diagnostics);
    let keywords = TypeKeywords::default();
    let resolver = Resolver::new(&keywords, &table);
    let records = resolver.resolve_records(&module.records, &mut diagnostics);
    assert_eq!(diagnostics.len(), 1);

    // The rule re-derives the same violation from the descriptor set
    diagnostics.extend(validate_schema(&records, &[]));
    assert_eq!(diagnostics.len(), 2);

    let finalized = finalize(diagnostics);
    assert_eq!(finalized.len(), 1);
    assert_eq!(finalized[0].kind, DiagnosticKind::DuplicateName);
}

#[test]
fn test_finalize_orders_by_source_location() {
    let early = Diagnostic::duplicate_name(Span::new(5, 8, 0, 5, 0, 8), "a", "first");
    let late = Diagnostic::recursive_record(Span::new(40, 44, 3, 0, 3, 4), "b", "third");
    let middle = Diagnostic::unsupported_type(Span::new(20, 24, 1, 2, 1, 6), "c", "second");

    let finalized = finalize(vec![late, early, middle]);

    let lines: Vec<usize> = finalized.iter().map(|d| d.location.start_line).collect();
    assert_eq!(lines, vec![0, 1, 3]);
}

#[test]
fn test_finalize_keeps_distinct_diagnostics_at_same_location() {
    let span = Span::new(10, 14, 1, 0, 1, 4);
    let dup = Diagnostic::duplicate_name(span, "Foo", "duplicate");
    let cycle = Diagnostic::recursive_record(span, "Foo", "recursive");

    let finalized = finalize(vec![dup, cycle]);
    assert_eq!(finalized.len(), 2, "Different kinds are not duplicates");
}
