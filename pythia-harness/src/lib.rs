//! # pythia-harness
//!
//! The differential cases: each one generates a random problem
//! instance, computes the trusted answer locally, asks the knowledge
//! API the equivalent natural-language question, normalizes the reply,
//! and reports agreement.
//!
//! Every case comes in two layers: a deterministic `check_*` function
//! taking explicit problem parameters, and a `run_*` wrapper that draws
//! random parameters and delegates. Cases run against any
//! [`KnowledgeSource`], so the suite works both against the live
//! service and against scripted answers in tests.

use pythia_client::{pod_plaintext, ClientError, KnowledgeSource};
use pythia_generate as generate;
use pythia_normalize::{
    exprs_equivalent, numeric_value, roots_match, solution_value, symbolic, symbolic_list,
    NormalizeError,
};
use pythia_oracle as oracle;
use pythia_oracle::OracleError;
use thiserror::Error;
use tracing::info;

/// Tolerance for floating-point and root comparisons
pub const TOLERANCE: f64 = 1e-6;

/// Errors that abort a case before a verdict is reached
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Result type for harness runs
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Outcome of one differential case
#[derive(Debug, Clone)]
pub struct CaseReport {
    /// Registry name of the case
    pub name: &'static str,
    /// The query that was submitted
    pub query: String,
    /// Whether oracle and service agreed
    pub passed: bool,
    /// Mismatch description when they did not
    pub detail: Option<String>,
}

fn verdict(name: &'static str, query: String, agreed: bool, detail: String) -> CaseReport {
    info!(case = name, passed = agreed, "case finished");
    CaseReport {
        name,
        query,
        passed: agreed,
        detail: if agreed { None } else { Some(detail) },
    }
}

fn floats_agree(got: f64, want: f64) -> bool {
    (got - want).abs() <= TOLERANCE * (1.0 + want.abs())
}

fn first_text(texts: &[String]) -> &str {
    texts.first().map(String::as_str).unwrap_or("")
}

// ============================================================================
// Cases
// ============================================================================

/// Date-of-birth lookup against the static subject table.
pub fn check_dob(name: &str, source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    let expected = oracle::date_of_birth(name)?;
    let query = generate::dob_query(name);

    let answer = source.search(&query)?;
    let texts = pod_plaintext(&answer, "Result", "Basic information")?;
    let got = first_text(&texts);

    let agreed = got == expected;
    let detail = format!("expected '{}', service said '{}'", expected, got);
    Ok(verdict("dob", query, agreed, detail))
}

pub fn run_dob(source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    check_dob(generate::rand_subject(), source)
}

/// Quadratic roots, order-independent via the canonical sort.
pub fn check_quadratic(
    a: i64,
    b: i64,
    c: i64,
    source: &dyn KnowledgeSource,
) -> HarnessResult<CaseReport> {
    let expected = oracle::quadratic_roots(a, b, c);
    let query = generate::quadratic_query(a, b, c);

    let answer = source.search(&query)?;
    let texts = pod_plaintext(&answer, "Complex solutions", "Solutions")?;
    let values: Vec<&str> = texts.iter().map(|t| solution_value(t)).collect();
    let external = symbolic_list(&values)?;

    let agreed = roots_match(&expected, &external, TOLERANCE)?;
    let detail = format!("oracle roots {:?} disagree with {:?}", expected, values);
    Ok(verdict("quadratic", query, agreed, detail))
}

pub fn run_quadratic(source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    check_quadratic(
        generate::rand_int_range(0, 100),
        generate::rand_int_range(0, 100),
        generate::rand_int_range(0, 100),
        source,
    )
}

/// Linear combination (a + b − c) / d.
pub fn check_math(
    a: i64,
    b: i64,
    c: i64,
    d: i64,
    source: &dyn KnowledgeSource,
) -> HarnessResult<CaseReport> {
    // d = 0 is a hard division error, exactly as documented
    let expected = oracle::linear_combination(a, b, c, d)?;
    let query = generate::math_query(a, b, c, d);

    let answer = source.search(&query)?;
    let texts = pod_plaintext(&answer, "Result", "Exact result")?;
    let got = numeric_value(first_text(&texts))?;

    let agreed = floats_agree(got, expected);
    let detail = format!("expected {}, service said {}", expected, got);
    Ok(verdict("math", query, agreed, detail))
}

pub fn run_math(source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    check_math(
        generate::rand_int_range(0, 100),
        generate::rand_int_range(0, 100),
        generate::rand_int_range(0, 100),
        generate::rand_int_range(0, 100),
        source,
    )
}

/// Quintic factoring, compared by numeric equivalence in x.
pub fn check_factor(
    a: i64,
    b: i64,
    c: i64,
    d: i64,
    e: i64,
    f: i64,
    source: &dyn KnowledgeSource,
) -> HarnessResult<CaseReport> {
    let expected = oracle::factor_quintic(a, b, c, d, e, f);
    let query = generate::factor_query(a, b, c, d, e, f);

    let answer = source.search(&query)?;
    let texts = pod_plaintext(&answer, "Factored form", "Result")?;
    let external = symbolic(solution_value(first_text(&texts)))?;

    let agreed = exprs_equivalent(&expected, &external, "x", TOLERANCE)?;
    let detail = format!("oracle factorization {} disagrees with service", expected);
    Ok(verdict("factor", query, agreed, detail))
}

pub fn run_factor(source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    check_factor(
        generate::rand_int_range(1, 20),
        generate::rand_int_range(0, 20),
        generate::rand_int_range(0, 20),
        generate::rand_int_range(0, 20),
        generate::rand_int_range(0, 20),
        generate::rand_int_range(0, 20),
        source,
    )
}

/// Digest computation; the oracle's two-line answer must match verbatim.
pub fn check_hash(
    method: &str,
    text: &str,
    source: &dyn KnowledgeSource,
) -> HarnessResult<CaseReport> {
    let query = generate::hash_query(method, text);
    let expected = oracle::hash_digest(&query)?;

    let answer = source.search(&query)?;
    let texts = pod_plaintext(&answer, "Result", "Results")?;
    let got = texts.join("\n");

    let agreed = got == expected;
    let detail = format!("expected:\n{}\nservice said:\n{}", expected, got);
    Ok(verdict("hash", query, agreed, detail))
}

pub fn run_hash(source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    check_hash(generate::rand_hash_method(), generate::rand_hash_text(), source)
}

/// Symbolic derivative of a·x⁴ + b·x³ + c·x.
pub fn check_derivative(
    a: i64,
    b: i64,
    c: i64,
    source: &dyn KnowledgeSource,
) -> HarnessResult<CaseReport> {
    let expected = oracle::derivative(a, b, c);
    let query = generate::derivative_query(a, b, c);

    let answer = source.search(&query)?;
    let texts = pod_plaintext(&answer, "Derivative", "Result")?;
    let external = symbolic(solution_value(first_text(&texts)))?;

    let agreed = exprs_equivalent(&expected, &external, "x", TOLERANCE)?;
    let detail = format!("oracle derivative {} disagrees with service", expected);
    Ok(verdict("derivative", query, agreed, detail))
}

pub fn run_derivative(source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    check_derivative(
        generate::rand_int_range(0, 100),
        generate::rand_int_range(0, 100),
        generate::rand_int_range(0, 100),
        source,
    )
}

/// Degrees to radians.
pub fn check_deg2rad(degrees: i64, source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    let expected = oracle::degrees_to_radians(degrees as f64);
    let query = generate::deg2rad_query(degrees);

    let answer = source.search(&query)?;
    let texts = pod_plaintext(&answer, "Result", "Exact result")?;
    let got = numeric_value(first_text(&texts))?;

    let agreed = floats_agree(got, expected);
    let detail = format!("expected {}, service said {}", expected, got);
    Ok(verdict("deg2rad", query, agreed, detail))
}

pub fn run_deg2rad(source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    check_deg2rad(generate::rand_int_range(0, 360), source)
}

/// π to a requested number of decimal digits.
pub fn check_pi(length: usize, source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    let expected = oracle::pi_to_digits(length);
    let query = generate::pi_query(length);

    let answer = source.search(&query)?;
    let texts = pod_plaintext(&answer, "Decimal approximation", "Result")?;
    let got = numeric_value(first_text(&texts))?;

    let agreed = floats_agree(got, expected);
    let detail = format!("expected {}, service said {}", expected, got);
    Ok(verdict("pi", query, agreed, detail))
}

pub fn run_pi(source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    check_pi(generate::rand_int_range(1, 30) as usize, source)
}

/// Plain sum.
pub fn check_sum(a: i64, b: i64, source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    let expected = oracle::sum(a, b);
    let query = generate::sum_query(a, b);

    let answer = source.search(&query)?;
    let texts = pod_plaintext(&answer, "Result", "Exact result")?;
    let got = numeric_value(first_text(&texts))?;

    let agreed = floats_agree(got, expected);
    let detail = format!("expected {}, service said {}", expected, got);
    Ok(verdict("sum", query, agreed, detail))
}

pub fn run_sum(source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    check_sum(
        generate::rand_int_range(0, 100),
        generate::rand_int_range(0, 100),
        source,
    )
}

/// Food-volume phrasing; the oracle answer is the interpretation string
/// itself, not a calorie value (documented incomplete behavior).
pub fn check_food(
    volume: i64,
    unit: &str,
    source: &dyn KnowledgeSource,
) -> HarnessResult<CaseReport> {
    let expected = oracle::food_volume(volume, unit);
    let query = generate::food_query(volume, unit);

    let answer = source.search(&query)?;
    let texts = pod_plaintext(&answer, "Input interpretation", "Input")?;
    let got = first_text(&texts);

    let agreed = got == expected;
    let detail = format!("expected '{}', service said '{}'", expected, got);
    Ok(verdict("food", query, agreed, detail))
}

pub fn run_food(source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    check_food(generate::rand_int_range(1, 12), "L", source)
}

/// Cubic roots of d·x³ + a·x² + b·x − c = 0.
pub fn check_cubic(
    a: i64,
    b: i64,
    c: i64,
    d: i64,
    source: &dyn KnowledgeSource,
) -> HarnessResult<CaseReport> {
    let expected = oracle::cubic_roots(a, b, c, d);
    let query = generate::cubic_query(a, b, c, d);

    let answer = source.search(&query)?;
    let texts = pod_plaintext(&answer, "Complex solutions", "Solutions")?;
    let values: Vec<&str> = texts.iter().map(|t| solution_value(t)).collect();
    let external = symbolic_list(&values)?;

    let agreed = roots_match(&expected, &external, TOLERANCE)?;
    let detail = format!("oracle roots {:?} disagree with {:?}", expected, values);
    Ok(verdict("cubic", query, agreed, detail))
}

pub fn run_cubic(source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    check_cubic(
        generate::rand_int_range(0, 20),
        generate::rand_int_range(0, 20),
        generate::rand_int_range(0, 20),
        generate::rand_int_range(1, 20),
        source,
    )
}

/// Truth table for a word-operator boolean expression.
pub fn check_truth_table(
    expression: &str,
    letters: usize,
    source: &dyn KnowledgeSource,
) -> HarnessResult<CaseReport> {
    let expected = oracle::truth_table(expression, letters)?;
    let query = generate::truth_table_query(expression);

    let answer = source.search(&query)?;
    let texts = pod_plaintext(&answer, "Truth table", "Result")?;
    let got = first_text(&texts);

    let agreed = got == expected;
    let detail = format!("expected:\n{}\nservice said:\n{}", expected, got);
    Ok(verdict("truth-table", query, agreed, detail))
}

pub fn run_truth_table(source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    let (expression, letters) = generate::rand_truth_expression();
    check_truth_table(expression, letters, source)
}

/// Unit conversion magnitude.
pub fn check_convert(
    value: f64,
    from: &str,
    to: &str,
    source: &dyn KnowledgeSource,
) -> HarnessResult<CaseReport> {
    let query = generate::convert_query(value, from, to);
    let expected = oracle::convert_units(&query)?;

    let answer = source.search(&query)?;
    let texts = pod_plaintext(&answer, "Result", "Exact result")?;
    // The service suffixes the unit name; only the magnitude is compared
    let magnitude = first_text(&texts).split_whitespace().next().unwrap_or("");
    let got = numeric_value(magnitude)?;

    let agreed = floats_agree(got, expected);
    let detail = format!("expected {}, service said {}", expected, got);
    Ok(verdict("convert", query, agreed, detail))
}

pub fn run_convert(source: &dyn KnowledgeSource) -> HarnessResult<CaseReport> {
    let (from, to) = generate::rand_unit_pair();
    check_convert(generate::rand_int_range(1, 100) as f64, from, to, source)
}

// ============================================================================
// Registry
// ============================================================================

/// A runnable differential case
pub type CaseFn = fn(&dyn KnowledgeSource) -> HarnessResult<CaseReport>;

/// Every case, keyed by runner name
pub const CASES: &[(&str, CaseFn)] = &[
    ("dob", run_dob),
    ("quadratic", run_quadratic),
    ("math", run_math),
    ("factor", run_factor),
    ("hash", run_hash),
    ("derivative", run_derivative),
    ("deg2rad", run_deg2rad),
    ("pi", run_pi),
    ("sum", run_sum),
    ("food", run_food),
    ("cubic", run_cubic),
    ("truth-table", run_truth_table),
    ("convert", run_convert),
];

/// Look up a case by name
pub fn case(name: &str) -> Option<CaseFn> {
    CASES
        .iter()
        .find(|(case_name, _)| *case_name == name)
        .map(|(_, runner)| *runner)
}

/// All registered case names, in registry order
pub fn case_names() -> Vec<&'static str> {
    CASES.iter().map(|(name, _)| *name).collect()
}
