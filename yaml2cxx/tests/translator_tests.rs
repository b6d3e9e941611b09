//! Translator End-to-End Tests
//!
//! These tests run python source text through the parser and the translator
//! and check the exact C++ text that comes out, covering parenthesization,
//! literal wrapping, the special-cased constructs and the rejection paths.

use pretty_assertions::assert_eq;
use yaml2cxx::{ops, translate, Ctx, Flavor, TranslateError};
use yaml2cxx_parser::parse_expr;

/// Helper: translate source text in the given flavor
fn run(source: &str, flavor: Flavor) -> Result<String, TranslateError> {
    let expr = parse_expr(source).expect("parse failed");
    translate(&expr, ops::LOOSEST, &Ctx::new(flavor))
}

fn query(source: &str) -> String {
    run(source, Flavor::Query).expect("translate failed")
}

fn value(source: &str) -> String {
    run(source, Flavor::Value).expect("translate failed")
}

// ============================================================================
// Parenthesization
// ============================================================================

#[test]
fn test_tighter_child_stays_bare() {
    assert_eq!(value("1 + 2 * 3"), "1 + 2 * 3");
}

#[test]
fn test_looser_child_is_wrapped() {
    assert_eq!(value("(1 + 2) * 3"), "(1 + 2) * 3");
}

#[test]
fn test_equal_precedence_wraps_non_strictly() {
    // left-nested subtraction keeps redundant but harmless parens
    assert_eq!(value("1 - 2 - 3"), "(1 - 2) - 3");
    assert_eq!(value("1 - (2 - 3)"), "1 - (2 - 3)");
}

#[test]
fn test_unary_wraps_looser_operand() {
    assert_eq!(value("-1"), "-1");
    assert_eq!(value("-(1 + 2)"), "-(1 + 2)");
    assert_eq!(query("~x"), "!x");
}

// ============================================================================
// Literal wrapping in query flavor
// ============================================================================

#[test]
fn test_query_left_literal_is_lifted() {
    // a bare literal on the left of an operator must enter the query DSL
    assert_eq!(query("1 + r.expr(2)"), "R::expr(1) + R::expr(2)");
    // in plain value flavor nothing is lifted
    assert_eq!(value("1 < 2"), "1<2");
}

#[test]
fn test_query_call_result_is_not_double_wrapped() {
    assert_eq!(query("r.expr(1) + 2"), "R::expr(1) + 2");
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn test_comparison_has_no_spaces() {
    assert_eq!(query("r.expr(1) == 2"), "R::expr(1)==2");
    assert_eq!(value("a >= b"), "a>=b");
}

#[test]
fn test_chained_comparison_is_rejected() {
    assert!(matches!(
        run("1 < 2 < 3", Flavor::Value),
        Err(TranslateError::Unhandled(_))
    ));
}

// ============================================================================
// Operators without a C++ infix form
// ============================================================================

#[test]
fn test_power_renders_as_pow() {
    assert_eq!(query("r.expr(2) ** 3"), "pow(R::expr(2), 3)");
}

#[test]
fn test_bitwise_spellings_of_logic() {
    assert_eq!(value("a & b"), "a && b");
    assert_eq!(value("a | b"), "a || b");
    assert!(matches!(
        run("a ^ b", Flavor::Value),
        Err(TranslateError::Unhandled(_))
    ));
}

#[test]
fn test_string_repetition() {
    assert_eq!(query("'ab' * 3"), "repeat(\"ab\", 3)");
}

#[test]
fn test_list_concatenation() {
    assert_eq!(query("[1] + [2]"), "append(R::array(1), R::array(2))");
}

// ============================================================================
// Subscripts and slices
// ============================================================================

#[test]
fn test_item_subscript() {
    assert_eq!(query("xs[0]"), "xs[0]");
}

#[test]
fn test_slice_forms() {
    assert_eq!(query("xs[1:2]"), "xs.slice(1, 2)");
    assert_eq!(query("xs[1:]"), "xs.slice(1)");
    assert_eq!(query("xs[:2]"), "xs.limit(2)");
}

#[test]
fn test_stepped_slice_is_rejected() {
    assert!(matches!(
        run("xs[1:2:3]", Flavor::Query),
        Err(TranslateError::Unhandled(_))
    ));
}

// ============================================================================
// Comprehensions
// ============================================================================

#[test]
fn test_comprehension_becomes_map() {
    assert_eq!(
        query("[x.add(1) for x in xs]"),
        "xs.map([=](R::Var x){ return (*x).add(1); })"
    );
}

#[test]
fn test_comprehension_in_value_flavor_keeps_sequence() {
    assert_eq!(value("[x for x in xs]"), "xs");
}

#[test]
fn test_comprehension_condition_is_rejected() {
    assert!(matches!(
        run("[x for x in xs if x]", Flavor::Query),
        Err(TranslateError::Unhandled(_))
    ));
}

// ============================================================================
// Library attributes
// ============================================================================

#[test]
fn test_time_constructors() {
    assert_eq!(query("datetime.now()"), "R::Time::now()");
    assert_eq!(
        query("datetime.fromtimestamp(896571240, tz)"),
        "R::Time(896571240, tz)"
    );
    assert_eq!(
        query("tz.RqlTzinfo('04:00')"),
        "R::Time::parse_utc_offset(\"04:00\")"
    );
}

#[test]
fn test_binary_constructor_by_flavor() {
    assert_eq!(query("r.binary(b'ab')"), "R::binary(\"ab\")");
    assert_eq!(value("r.binary"), "R::Binary");
}

#[test]
fn test_discarded_methods() {
    assert!(matches!(
        run("s.encode('utf8')", Flavor::Query),
        Err(TranslateError::Discard(_))
    ));
    assert!(matches!(
        run("conn.close()", Flavor::Query),
        Err(TranslateError::Discard(_))
    ));
}

// ============================================================================
// Rejected constructs
// ============================================================================

#[test]
fn test_argument_unpacking_is_rejected() {
    assert!(matches!(
        run("f(*xs)", Flavor::Query),
        Err(TranslateError::Unhandled(_))
    ));
    assert!(matches!(
        run("f(**kw)", Flavor::Query),
        Err(TranslateError::Unhandled(_))
    ));
}

#[test]
fn test_python_boolean_operators_are_rejected() {
    assert!(matches!(
        run("a and b", Flavor::Value),
        Err(TranslateError::Unhandled(_))
    ));
}
