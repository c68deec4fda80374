//! Integration tests for the fully-qualified-name fast path.

use chasqui_filter::fastpath::{fully_qualified_names, is_fully_qualified_name_filter};
use chasqui_filter::translate;

#[test]
fn test_pure_disjunction_recognized() {
    let filter = "(FullyQualifiedName=A.B.C|FullyQualifiedName=A.B.D|FullyQualifiedName=A.B.E)";
    assert!(is_fully_qualified_name_filter(filter));
    assert_eq!(fully_qualified_names(filter), ["A.B.C", "A.B.D", "A.B.E"]);
}

#[test]
fn test_non_matching_clause_skipped_by_extractor() {
    assert_eq!(
        fully_qualified_names("(Name=Something|FullyQualifiedName=Issue1332.MyTest.TestMethod)"),
        ["Issue1332.MyTest.TestMethod"]
    );
}

#[test]
fn test_mixed_properties_rejected_by_checker_but_parseable() {
    for filter in [
        "TestCategory=Urgent|FullyQualifiedName=A.B",
        "Priority=1|FullyQualifiedName=A.B",
        "Name=x|FullyQualifiedName=A.B",
    ] {
        assert!(
            !is_fully_qualified_name_filter(filter),
            "checker must reject {filter:?}"
        );
        // The general parser still accepts the same string.
        assert!(translate(filter).is_ok(), "parser must accept {filter:?}");
    }
}

#[test]
fn test_trailing_operator_rejected() {
    assert!(!is_fully_qualified_name_filter("FullyQualifiedName=A|"));
    assert!(!is_fully_qualified_name_filter("(FullyQualifiedName=A|)"));
    assert!(fully_qualified_names("FullyQualifiedName=A|").is_empty());
    assert!(fully_qualified_names("(FullyQualifiedName=A|)").is_empty());
}

#[test]
fn test_outer_paren_stripping_idempotence() {
    let once = fully_qualified_names("(FullyQualifiedName=X.Y)");
    let thrice = fully_qualified_names("(((FullyQualifiedName=X.Y)))");
    let bare = fully_qualified_names("FullyQualifiedName=X.Y");
    assert_eq!(once, bare);
    assert_eq!(thrice, bare);
}

#[test]
fn test_heavy_escaping_in_names() {
    let filter = r"(FullyQualifiedName=Suite.Check\(42\)|FullyQualifiedName=Generic\\Holder`1.Run)";
    assert!(is_fully_qualified_name_filter(filter));
    assert_eq!(
        fully_qualified_names(filter),
        ["Suite.Check(42)", r"Generic\Holder`1.Run"]
    );
}

#[test]
fn test_fast_path_equivalence_with_general_parser() {
    // Names extracted by the fast path, fed back through the general parser
    // one by one and OR-combined, select the same tests as translating the
    // equality clauses directly.
    let filter = "(FullyQualifiedName=A.B|FullyQualifiedName=C.D)";
    assert!(is_fully_qualified_name_filter(filter));
    let names = fully_qualified_names(filter);

    let rebuilt = names
        .iter()
        .map(|n| format!("FullyQualifiedName={n}"))
        .collect::<Vec<_>>()
        .join("|");
    assert_eq!(
        translate(&rebuilt).unwrap(),
        "<filter><or><test>A.B</test><test>C.D</test></or></filter>"
    );
}

#[test]
fn test_whitespace_tolerated_around_clauses() {
    let filter = "( FullyQualifiedName = A.B | FullyQualifiedName = C.D )";
    assert!(is_fully_qualified_name_filter(filter));
    assert_eq!(fully_qualified_names(filter), ["A.B", "C.D"]);
}

#[test]
fn test_ampersand_is_a_hard_rejection() {
    let filter = "FullyQualifiedName=A.B&TestCategory=Fast";
    assert!(!is_fully_qualified_name_filter(filter));
    assert!(fully_qualified_names(filter).is_empty());
}
