//! End-to-end differential cases against a scripted knowledge source
//!
//! Exercises the full pipeline — query rendering, pod extraction with
//! fallback, normalization, canonical comparison — without the network.

use pythia_client::ClientError;
use pythia_harness::{
    check_convert, check_cubic, check_deg2rad, check_derivative, check_dob, check_factor,
    check_food, check_hash, check_math, check_pi, check_quadratic, check_sum,
    check_truth_table, HarnessError,
};
use pythia_oracle::{hash_digest, truth_table, OracleError};
use pythia_tests::ScriptedSource;

#[test]
fn test_dob_agreement() {
    let source = ScriptedSource::new().answer(
        "date of birth of Tom Hanks",
        &[("Result", &["Monday, July 9, 1956"])],
    );
    let report = check_dob("Tom Hanks", &source).unwrap();
    assert!(report.passed, "{:?}", report.detail);
}

#[test]
fn test_dob_uses_fallback_pod() {
    // Primary "Result" pod absent; the fallback label answers
    let source = ScriptedSource::new().answer(
        "date of birth of Charlemagne",
        &[("Basic information", &["747 AD"])],
    );
    let report = check_dob("Charlemagne", &source).unwrap();
    assert!(report.passed);
}

#[test]
fn test_dob_disagreement_is_reported() {
    let source = ScriptedSource::new().answer(
        "date of birth of Tom Hanks",
        &[("Result", &["Tuesday, July 10, 1956"])],
    );
    let report = check_dob("Tom Hanks", &source).unwrap();
    assert!(!report.passed);
    assert!(report.detail.unwrap().contains("Monday, July 9, 1956"));
}

#[test]
fn test_dob_unknown_subject_is_hard_error() {
    let source = ScriptedSource::new();
    assert!(matches!(
        check_dob("Ada Lovelace", &source),
        Err(HarnessError::Oracle(OracleError::UnknownSubject(_)))
    ));
}

#[test]
fn test_quadratic_real_roots_any_order() {
    let source = ScriptedSource::new().answer(
        "solve 1x^2 + 0x + -4 = 0",
        &[("Solutions", &["x = -2", "x = 2"])],
    );
    let report = check_quadratic(1, 0, -4, &source).unwrap();
    assert!(report.passed, "{:?}", report.detail);
}

#[test]
fn test_quadratic_complex_roots() {
    let source = ScriptedSource::new().answer(
        "solve 2x^2 + 4x + 6 = 0",
        &[(
            "Complex solutions",
            &["x = -1 - sqrt(2) i", "x = -1 + sqrt(2) i"],
        )],
    );
    let report = check_quadratic(2, 4, 6, &source).unwrap();
    assert!(report.passed, "{:?}", report.detail);
}

#[test]
fn test_quadratic_wrong_roots_fail() {
    let source = ScriptedSource::new().answer(
        "solve 1x^2 + 0x + -4 = 0",
        &[("Solutions", &["x = -3", "x = 3"])],
    );
    let report = check_quadratic(1, 0, -4, &source).unwrap();
    assert!(!report.passed);
}

#[test]
fn test_math_known_case() {
    let source = ScriptedSource::new().answer("(2 + 8 - 6) / 4", &[("Result", &["1"])]);
    let report = check_math(2, 8, 6, 4, &source).unwrap();
    assert!(report.passed, "{:?}", report.detail);
}

#[test]
fn test_math_division_by_zero_propagates() {
    // The oracle fails before any query is issued
    let source = ScriptedSource::new();
    assert!(matches!(
        check_math(2, 8, 6, 0, &source),
        Err(HarnessError::Oracle(OracleError::Engine(_)))
    ));
}

#[test]
fn test_factor_equivalent_shapes_agree() {
    // x⁵ - x² posed as a=1, d=1, rest zero
    let source = ScriptedSource::new().answer(
        "factor 1x^5 - 0x^4 + 0x^4 - 1x^2 + 0x^3 - 0",
        &[("Factored form", &["x^2 (x - 1) (x^2 + x + 1)"])],
    );
    let report = check_factor(1, 0, 0, 1, 0, 0, &source).unwrap();
    assert!(report.passed, "{:?}", report.detail);
}

#[test]
fn test_hash_verbatim_agreement() {
    let expected = hash_digest("SHA1 abc").unwrap();
    let lines: Vec<&str> = expected.lines().collect();
    let source = ScriptedSource::new().answer("SHA1 abc", &[("Result", lines.as_slice())]);
    let report = check_hash("SHA1", "abc", &source).unwrap();
    assert!(report.passed, "{:?}", report.detail);
}

#[test]
fn test_hash_single_bit_difference_fails() {
    let mangled = hash_digest("SHA1 abc").unwrap().replace('a', "b");
    let lines: Vec<&str> = mangled.lines().collect();
    let source = ScriptedSource::new().answer("SHA1 abc", &[("Result", lines.as_slice())]);
    let report = check_hash("SHA1", "abc", &source).unwrap();
    assert!(!report.passed);
}

#[test]
fn test_derivative_agreement() {
    let source = ScriptedSource::new().answer(
        "derivative of 2x^4 + 3x^3 + 5x",
        &[("Derivative", &["d/dx(2 x^4 + 3 x^3 + 5 x) = 8 x^3 + 9 x^2 + 5"])],
    );
    let report = check_derivative(2, 3, 5, &source).unwrap();
    assert!(report.passed, "{:?}", report.detail);
}

#[test]
fn test_deg2rad_agreement() {
    let source = ScriptedSource::new().answer(
        "convert 180 degrees to radians",
        &[("Result", &["3.141592653589793"])],
    );
    let report = check_deg2rad(180, &source).unwrap();
    assert!(report.passed, "{:?}", report.detail);
}

#[test]
fn test_pi_agreement() {
    let source = ScriptedSource::new()
        .answer("pi to 5 digits", &[("Decimal approximation", &["3.1416"])]);
    let report = check_pi(5, &source).unwrap();
    assert!(report.passed, "{:?}", report.detail);
}

#[test]
fn test_sum_agreement() {
    let source = ScriptedSource::new().answer("40 + 2", &[("Result", &["42"])]);
    let report = check_sum(40, 2, &source).unwrap();
    assert!(report.passed, "{:?}", report.detail);
}

#[test]
fn test_food_interpretation_string() {
    let source = ScriptedSource::new().answer(
        "calories in 2L",
        &[("Input interpretation", &["calories in 2L"])],
    );
    let report = check_food(2, "L", &source).unwrap();
    assert!(report.passed, "{:?}", report.detail);
}

#[test]
fn test_cubic_scrambled_order_agrees() {
    // x³ - 6x² + 11x - 6 posed as d=1, a=-6, b=11, c=6
    let source = ScriptedSource::new().answer(
        "solve 1x^3 + -6x^2 + 11x - 6 = 0",
        &[("Solutions", &["x = 3", "x = 1", "x = 2"])],
    );
    let report = check_cubic(-6, 11, 6, 1, &source).unwrap();
    assert!(report.passed, "{:?}", report.detail);
}

#[test]
fn test_truth_table_agreement() {
    let expected = truth_table("A AND B", 2).unwrap();
    let source = ScriptedSource::new()
        .answer("truth table for A AND B", &[("Truth table", &[expected.as_str()])]);
    let report = check_truth_table("A AND B", 2, &source).unwrap();
    assert!(report.passed, "{:?}", report.detail);
}

#[test]
fn test_convert_ignores_unit_suffix() {
    let source = ScriptedSource::new().answer(
        "convert 2 km to m",
        &[("Result", &["2000 meters"])],
    );
    let report = check_convert(2.0, "km", "m", &source).unwrap();
    assert!(report.passed, "{:?}", report.detail);
}

#[test]
fn test_missing_pod_with_fallback_is_client_error() {
    // Neither the primary nor the fallback label is present
    let source = ScriptedSource::new().answer("40 + 2", &[("Input", &["40 + 2"])]);
    assert!(matches!(
        check_sum(40, 2, &source),
        Err(HarnessError::Client(ClientError::PodMissing { .. }))
    ));
}

#[test]
fn test_unscripted_query_is_client_error() {
    let source = ScriptedSource::new();
    assert!(matches!(
        check_sum(1, 2, &source),
        Err(HarnessError::Client(ClientError::QueryFailed(_)))
    ));
}
