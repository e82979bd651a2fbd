//! # pythia-oracle
//!
//! Ground-truth answers for the differential harness.
//!
//! Each problem category gets one function that computes the trusted
//! answer from the generated parameters alone, with no external calls:
//! - Static lookups (dates of birth)
//! - Algebra on the engine (roots, factoring, derivatives)
//! - Digests, truth tables, and unit conversion
//!
//! Error policy is deliberately per-operation and NOT uniform: unknown
//! lookup subjects and unknown units are hard errors, while an
//! unsupported hash method answers with a sentinel string. Both
//! behaviors are documented contract, so they are modeled explicitly
//! rather than unified.

use num_complex::Complex64;
use pythia_engine::poly::{self, Polynomial};
use pythia_engine::{precision, EngineError, Expr, MathEngine, SymbolicEngine};
use thiserror::Error;

pub mod hash;
pub mod logic;
pub mod units;

pub use hash::{hash_digest, UNDEFINED_METHOD};
pub use logic::truth_table;
pub use units::{convert, convert_units};

/// Errors from oracle computations
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Unknown test subject: {0}")]
    UnknownSubject(String),
    #[error("Unrecognized unit: {0}")]
    UnknownUnit(String),
    #[error("Cannot convert between {0} and {1}")]
    CategoryMismatch(&'static str, &'static str),
    #[error("Malformed command: {0}")]
    MalformedCommand(String),
    #[error("Invalid boolean expression: {0}")]
    InvalidExpression(String),
    #[error("Truth table supports at most {max} variables, requested {requested}")]
    TooManyVariables { requested: usize, max: usize },
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type for oracle computations
pub type OracleResult<T> = Result<T, OracleError>;

// ============================================================================
// Static Lookups
// ============================================================================

/// Immutable name → date-of-birth table for the fixed test subjects.
pub const NOTABLE_SUBJECTS: &[(&str, &str)] = &[
    ("Harriet Tubman", "March 1822"),
    ("Marvin Gaye", "Sunday, April 2, 1939"),
    ("Charlemagne", "747 AD"),
    ("Galileo Galilei", "Tuesday, February 15, 1564"),
    ("Warren Buffett", "Saturday, August 30, 1930"),
    ("Tom Hanks", "Monday, July 9, 1956"),
    ("Ferdinand Magellan", "1480"),
    ("Wiley Post", "Tuesday, November 22, 1898"),
];

/// Date of birth for a known subject. Unknown names are a hard error.
pub fn date_of_birth(name: &str) -> OracleResult<&'static str> {
    NOTABLE_SUBJECTS
        .iter()
        .find(|(subject, _)| *subject == name)
        .map(|(_, date)| *date)
        .ok_or_else(|| OracleError::UnknownSubject(name.to_string()))
}

// ============================================================================
// Algebra
// ============================================================================

/// Roots of a·x² + b·x + c = 0, possibly complex.
///
/// Order is the solver's canonical order, not sorted; callers align
/// multi-valued answers with the canonical sort before comparing.
pub fn quadratic_roots(a: i64, b: i64, c: i64) -> Vec<Complex64> {
    poly::quadratic_roots(a as f64, b as f64, c as f64)
}

/// (a + b − c) / d. Division by zero propagates as an engine error.
pub fn linear_combination(a: i64, b: i64, c: i64, d: i64) -> OracleResult<f64> {
    let engine = MathEngine::new();
    let expr = Expr::div(
        Expr::sub(Expr::add(Expr::int(a), Expr::int(b)), Expr::int(c)),
        Expr::int(d),
    );
    Ok(engine.evaluate(&expr)?)
}

/// Factorization of a·x⁵ − b·x⁴ + c·x⁴ − d·x² + e·x³ − f
/// (coefficient placement as posed, including the two x⁴ terms).
pub fn factor_quintic(a: i64, b: i64, c: i64, d: i64, e: i64, f: i64) -> Expr {
    Polynomial::new(vec![-f, 0, -d, e, c - b, a]).factor()
}

/// Symbolic derivative of a·x⁴ + b·x³ + c·x with respect to x.
pub fn derivative(a: i64, b: i64, c: i64) -> Expr {
    let symbolic = SymbolicEngine::new();
    let expr = Expr::add(
        Expr::add(
            Expr::mul(Expr::int(a), Expr::pow(Expr::symbol("x"), Expr::int(4))),
            Expr::mul(Expr::int(b), Expr::pow(Expr::symbol("x"), Expr::int(3))),
        ),
        Expr::mul(Expr::int(c), Expr::symbol("x")),
    );
    symbolic.simplify(&symbolic.differentiate(&expr, "x"))
}

/// Roots of d·x³ + a·x² + b·x − c = 0 (argument placement as posed).
pub fn cubic_roots(a: i64, b: i64, c: i64, d: i64) -> Vec<Complex64> {
    Polynomial::new(vec![-c, b, a, d]).roots()
}

// ============================================================================
// Scalar Conversions
// ============================================================================

/// Degrees to radians.
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// π computed to `length` decimal digits of precision, as the nearest f64.
pub fn pi_to_digits(length: usize) -> f64 {
    precision::pi_to_f64(length)
}

/// a + b as floating point.
pub fn sum(a: i64, b: i64) -> f64 {
    (a + b) as f64
}

/// Descriptive string for a food-volume query: `calories in {volume}{unit}`.
///
/// Builds the query phrase rather than computing a calorie value. The
/// string-building behavior is the documented contract; an actual
/// calorie lookup is an open question for product owners, so do not
/// "fix" this without a decision.
pub fn food_volume(volume: i64, unit: &str) -> String {
    format!("calories in {}{}", volume, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_date_of_birth_known() {
        assert_eq!(date_of_birth("Tom Hanks").unwrap(), "Monday, July 9, 1956");
        assert_eq!(date_of_birth("Charlemagne").unwrap(), "747 AD");
    }

    #[test]
    fn test_date_of_birth_unknown_is_hard_error() {
        assert!(matches!(
            date_of_birth("Ada Lovelace"),
            Err(OracleError::UnknownSubject(_))
        ));
    }

    #[test]
    fn test_quadratic_known_case() {
        // x² - 4 = 0 → {2, -2}
        let roots = quadratic_roots(1, 0, -4);
        assert_eq!(roots.len(), 2);
        let mut res: Vec<f64> = roots.iter().map(|r| r.re).collect();
        res.sort_by(f64::total_cmp);
        assert!((res[0] + 2.0).abs() < TOL);
        assert!((res[1] - 2.0).abs() < TOL);
    }

    #[test]
    fn test_quadratic_complex_case() {
        // 2x² + 4x + 6 = 0 → -1 ± sqrt(2)·i
        let roots = quadratic_roots(2, 4, 6);
        assert!(roots.iter().all(|r| (r.re + 1.0).abs() < TOL));
        assert!(roots.iter().any(|r| (r.im - 2f64.sqrt()).abs() < TOL));
        assert!(roots.iter().any(|r| (r.im + 2f64.sqrt()).abs() < TOL));
    }

    #[test]
    fn test_linear_combination_known_case() {
        // (2 + 8 - 6) / 4 = 1.0
        assert_eq!(linear_combination(2, 8, 6, 4).unwrap(), 1.0);
    }

    #[test]
    fn test_linear_combination_division_by_zero() {
        assert!(matches!(
            linear_combination(2, 8, 6, 0),
            Err(OracleError::Engine(EngineError::DivisionByZero))
        ));
    }

    #[test]
    fn test_factor_quintic_sample() {
        // a=1, b=0, c=0, d=1, e=0, f=0: x⁵ - x² = x²(x - 1)(x² + x + 1)
        let factored = factor_quintic(1, 0, 0, 1, 0, 0);
        assert_eq!(factored.to_string(), "x^2*(x - 1)*(x^2 + x + 1)");
    }

    #[test]
    fn test_derivative_matches_closed_form() {
        // d/dx(2x⁴ + 3x³ + 5x) = 8x³ + 9x² + 5
        let engine = MathEngine::new();
        let symbolic = SymbolicEngine::new();
        let deriv = derivative(2, 3, 5);
        for x in [-1.5, 0.0, 2.0] {
            let at = symbolic.substitute(&deriv, "x", &Expr::float(x));
            let got = engine.evaluate(&at).unwrap();
            let want = 8.0 * x * x * x + 9.0 * x * x + 5.0;
            assert!((got - want).abs() < TOL);
        }
    }

    #[test]
    fn test_cubic_roots_known_case() {
        // x³ - 6x² + 11x - 6: posed as d=1, a=-6, b=11, c=6
        let roots = cubic_roots(-6, 11, 6, 1);
        assert_eq!(roots.len(), 3);
        for expected in [1.0, 2.0, 3.0] {
            assert!(roots
                .iter()
                .any(|r| (r - Complex64::new(expected, 0.0)).norm() < 1e-6));
        }
    }

    #[test]
    fn test_degrees_to_radians_known_case() {
        assert!((degrees_to_radians(180.0) - std::f64::consts::PI).abs() < TOL);
        assert_eq!(degrees_to_radians(0.0), 0.0);
    }

    #[test]
    fn test_pi_to_digits() {
        assert_eq!(pi_to_digits(30), std::f64::consts::PI);
        assert_eq!(pi_to_digits(1), 3.0);
    }

    #[test]
    fn test_sum() {
        assert_eq!(sum(40, 2), 42.0);
        assert_eq!(sum(-5, 5), 0.0);
    }

    #[test]
    fn test_food_volume_builds_query_string() {
        // No calorie value is computed; the string IS the contract
        assert_eq!(food_volume(2, "L"), "calories in 2L");
    }
}
