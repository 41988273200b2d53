//! Dependency graph among record types.
//!
//! An edge runs from record X to record Y whenever some field of X contains
//! `RecordRef(Y)` anywhere in its type, including through `Optional`, `SetOf`,
//! `ListOf`, and `DictOf` wrappers. A cycle anywhere in that graph means the
//! schema has no finite materialization depth, so extraction must fail.

use std::collections::{HashMap, HashSet};

use crate::catalog::RecordDescriptor;
use crate::diagnostics::Diagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Detect containment cycles over the record set.
///
/// Returns one `RecursiveRecord` diagnostic per distinct cycle, deduplicated
/// by canonical rotation (the cycle is rotated to start at its
/// lexicographically smallest record name, which also supplies the
/// diagnostic's symbol and location).
pub fn check_cycles(records: &[RecordDescriptor]) -> Vec<Diagnostic> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (i, record) in records.iter().enumerate() {
        // First occurrence wins; duplicate names are reported elsewhere
        index.entry(record.name.as_str()).or_insert(i);
    }

    let adjacency: Vec<Vec<usize>> = records
        .iter()
        .map(|record| {
            let mut refs = Vec::new();
            for field in &record.fields {
                field.ty.collect_record_refs(&mut refs);
            }

            let mut edges = Vec::new();
            for name in refs {
                if let Some(&target) = index.get(name) {
                    if !edges.contains(&target) {
                        edges.push(target);
                    }
                }
            }
            edges
        })
        .collect();

    let mut colors = vec![Color::White; records.len()];
    let mut path = Vec::new();
    let mut cycles = Vec::new();

    for start in 0..records.len() {
        if colors[start] == Color::White {
            visit(start, &adjacency, &mut colors, &mut path, &mut cycles);
        }
    }

    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let mut diagnostics = Vec::new();

    for cycle in cycles {
        let canonical = canonical_rotation(&cycle, records);
        if !seen.insert(canonical.clone()) {
            continue;
        }

        let first = &records[canonical[0]];
        let mut names: Vec<&str> = canonical.iter().map(|&i| records[i].name.as_str()).collect();
        names.push(first.name.as_str());

        diagnostics.push(Diagnostic::recursive_record(
            first.name_span,
            first.name.clone(),
            format!("Recursive record definition: `{}`", names.join(" -> ")),
        ));
    }

    diagnostics
}

/// Depth-first traversal with recursion-stack coloring. A gray neighbor is a
/// back-edge; the cycle is the current path suffix starting at that neighbor.
fn visit(
    node: usize,
    adjacency: &[Vec<usize>],
    colors: &mut [Color],
    path: &mut Vec<usize>,
    cycles: &mut Vec<Vec<usize>>,
) {
    colors[node] = Color::Gray;
    path.push(node);

    for &next in &adjacency[node] {
        match colors[next] {
            Color::Gray => {
                if let Some(from) = path.iter().position(|&n| n == next) {
                    cycles.push(path[from..].to_vec());
                }
            }
            Color::White => visit(next, adjacency, colors, path, cycles),
            Color::Black => {}
        }
    }

    path.pop();
    colors[node] = Color::Black;
}

fn canonical_rotation(cycle: &[usize], records: &[RecordDescriptor]) -> Vec<usize> {
    let mut pivot = 0;
    for (pos, &idx) in cycle.iter().enumerate() {
        if records[idx].name < records[cycle[pivot]].name {
            pivot = pos;
        }
    }

    let mut rotated = cycle[pivot..].to_vec();
    rotated.extend_from_slice(&cycle[..pivot]);
    rotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::options::TypeKeywords;
    use crate::parser;
    use crate::resolver::{RecordTable, Resolver};

    fn resolve_records(source: &str) -> Vec<RecordDescriptor> {
        let module = parser::parse_module(source).expect("Should parse");

        let mut diagnostics = Vec::new();
        let table = RecordTable::build(&module.records, &mut diagnostics);
        let keywords = TypeKeywords::default();
        let resolver = Resolver::new(&keywords, &table);
        let records = resolver.resolve_records(&module.records, &mut diagnostics);

        assert!(diagnostics.is_empty(), "Unexpected diagnostics: {:?}", diagnostics);
        records
    }

    #[test]
    fn test_acyclic_graph_passes() {
        let records = resolve_records(
            "record A { b: B }\nrecord B { c: C }\nrecord C { x: int }",
        );

        assert!(check_cycles(&records).is_empty());
    }

    #[test]
    fn test_diamond_sharing_is_not_a_cycle() {
        let records = resolve_records(
            "record A { b: B, c: C }\nrecord B { d: D }\nrecord C { d: D }\nrecord D { x: int }",
        );

        assert!(check_cycles(&records).is_empty());
    }

    #[test]
    fn test_direct_self_reference() {
        let records = resolve_records("record Cons { car: int, cdr: Cons }");

        let diagnostics = check_cycles(&records);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::RecursiveRecord);
        assert_eq!(diagnostics[0].symbol, "Cons");
        assert!(diagnostics[0].message.contains("Cons -> Cons"));
    }

    #[test]
    fn test_self_reference_via_list() {
        let records = resolve_records("record Tree { children: list[Tree] }");

        let diagnostics = check_cycles(&records);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::RecursiveRecord);
        assert_eq!(diagnostics[0].symbol, "Tree");
    }

    #[test]
    fn test_self_reference_via_optional() {
        let records = resolve_records("record Node { next: optional[Node] }");

        assert_eq!(check_cycles(&records).len(), 1);
    }

    #[test]
    fn test_cycle_through_dict_value() {
        let records = resolve_records("record Index { entries: dict[str, Index] }");

        assert_eq!(check_cycles(&records).len(), 1);
    }

    #[test]
    fn test_two_node_cycle_reported_once() {
        let records = resolve_records("record A { b: B }\nrecord B { a: A }");

        let diagnostics = check_cycles(&records);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].symbol, "A");
        assert!(diagnostics[0].message.contains("A -> B -> A"));
    }

    #[test]
    fn test_cycle_canonical_rotation_ignores_declaration_order() {
        // Same cycle entered from B first still reports at A
        let records = resolve_records("record B { a: A }\nrecord A { b: B }");

        let diagnostics = check_cycles(&records);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].symbol, "A");
        assert!(diagnostics[0].message.contains("A -> B -> A"));
    }

    #[test]
    fn test_multiple_distinct_cycles() {
        let records = resolve_records(
            "record Selfie { me: Selfie }\nrecord A { b: B }\nrecord B { a: A }",
        );

        let diagnostics = check_cycles(&records);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_reference_into_cycle_from_outside() {
        // Outer depends on the cycle but is not part of it
        let records = resolve_records("record Outer { c: Cons }\nrecord Cons { cdr: Cons }");

        let diagnostics = check_cycles(&records);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].symbol, "Cons");
    }

    #[test]
    fn test_longer_cycle_path_is_spelled_out() {
        let records = resolve_records(
            "record A { b: B }\nrecord B { c: C }\nrecord C { a: list[A] }",
        );

        let diagnostics = check_cycles(&records);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("A -> B -> C -> A"));
    }
}
