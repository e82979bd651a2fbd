//! # pythia-generate
//!
//! Randomized problem parameters and their natural-language query
//! renderings. Randomness lives only in the parameter pickers; every
//! `*_query` renderer is deterministic in its inputs, so a problem
//! instance fully determines the query string.

use rand::seq::SliceRandom;
use rand::Rng;

use pythia_oracle::units::Quantity;
use pythia_oracle::NOTABLE_SUBJECTS;

/// Hash methods the digest case draws from
pub const HASH_METHODS: &[&str] = &["SHA1", "MD5", "CRC32"];

/// Sample texts for the digest case
const HASH_TEXTS: &[&str] = &["differential", "harness", "pythia", "knowledge engine"];

/// Boolean expressions for the truth-table case, with their column count
const TRUTH_EXPRESSIONS: &[(&str, usize)] = &[
    ("A AND B", 2),
    ("A OR B", 2),
    ("A XOR B", 2),
    ("NOT A AND B", 2),
    ("a OR b AND c", 3),
];

// ============================================================================
// Parameter Pickers
// ============================================================================

/// A random known test subject
pub fn rand_subject() -> &'static str {
    let (name, _) = NOTABLE_SUBJECTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(NOTABLE_SUBJECTS[0]);
    name
}

/// A random integer in `[lo, hi]`
pub fn rand_int_range(lo: i64, hi: i64) -> i64 {
    rand::thread_rng().gen_range(lo..=hi)
}

/// A random supported hash method
pub fn rand_hash_method() -> &'static str {
    HASH_METHODS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(HASH_METHODS[0])
}

/// A random text to digest
pub fn rand_hash_text() -> &'static str {
    HASH_TEXTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(HASH_TEXTS[0])
}

/// A random boolean expression with its column count
pub fn rand_truth_expression() -> (&'static str, usize) {
    TRUTH_EXPRESSIONS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(TRUTH_EXPRESSIONS[0])
}

/// A random pair of distinct units from the same quantity
pub fn rand_unit_pair() -> (&'static str, &'static str) {
    let units = pythia_oracle::units::recognized_units();
    let mut rng = rand::thread_rng();
    // Retry until the pair shares a quantity; the registry is small
    loop {
        let (from, from_quantity): (&str, Quantity) = units[rng.gen_range(0..units.len())];
        let same: Vec<&str> = units
            .iter()
            .filter(|(unit, quantity)| *quantity == from_quantity && *unit != from)
            .map(|(unit, _)| *unit)
            .collect();
        if let Some(&to) = same.choose(&mut rng) {
            return (from, to);
        }
    }
}

// ============================================================================
// Query Renderers
// ============================================================================

/// `date of birth of {name}`
pub fn dob_query(name: &str) -> String {
    format!("date of birth of {}", name)
}

/// `solve {a}x^2 + {b}x + {c} = 0`
pub fn quadratic_query(a: i64, b: i64, c: i64) -> String {
    format!("solve {}x^2 + {}x + {} = 0", a, b, c)
}

/// `({a} + {b} - {c}) / {d}`
pub fn math_query(a: i64, b: i64, c: i64, d: i64) -> String {
    format!("({} + {} - {}) / {}", a, b, c, d)
}

/// `factor {a}x^5 - {b}x^4 + {c}x^4 - {d}x^2 + {e}x^3 - {f}`
pub fn factor_query(a: i64, b: i64, c: i64, d: i64, e: i64, f: i64) -> String {
    format!(
        "factor {}x^5 - {}x^4 + {}x^4 - {}x^2 + {}x^3 - {}",
        a, b, c, d, e, f
    )
}

/// `{METHOD} {text}` — the digest command doubles as the query
pub fn hash_query(method: &str, text: &str) -> String {
    format!("{} {}", method, text)
}

/// `derivative of {a}x^4 + {b}x^3 + {c}x`
pub fn derivative_query(a: i64, b: i64, c: i64) -> String {
    format!("derivative of {}x^4 + {}x^3 + {}x", a, b, c)
}

/// `convert {degrees} degrees to radians`
pub fn deg2rad_query(degrees: i64) -> String {
    format!("convert {} degrees to radians", degrees)
}

/// `pi to {length} digits`
pub fn pi_query(length: usize) -> String {
    format!("pi to {} digits", length)
}

/// `{a} + {b}`
pub fn sum_query(a: i64, b: i64) -> String {
    format!("{} + {}", a, b)
}

/// `calories in {volume}{unit}`
pub fn food_query(volume: i64, unit: &str) -> String {
    format!("calories in {}{}", volume, unit)
}

/// `solve {d}x^3 + {a}x^2 + {b}x - {c} = 0`
pub fn cubic_query(a: i64, b: i64, c: i64, d: i64) -> String {
    format!("solve {}x^3 + {}x^2 + {}x - {} = 0", d, a, b, c)
}

/// `truth table for {expression}`
pub fn truth_table_query(expression: &str) -> String {
    format!("truth table for {}", expression)
}

/// `convert {value} {from} to {to}`
pub fn convert_query(value: f64, from: &str, to: &str) -> String {
    format!("convert {} {} to {}", value, from, to)
}
