//! Polynomial roots and factoring over the rationals.
//!
//! Coefficients are stored in ascending order of degree. Root finding is
//! closed-form for degree ≤ 2 and Durand–Kerner iteration above that;
//! factoring extracts rational roots by the rational-root theorem and
//! leaves the irreducible remainder as-is.

use num_complex::Complex64;

use crate::Expr;

/// Iteration cap for the Durand–Kerner solver
const MAX_ITERATIONS: usize = 200;

/// Convergence threshold for root updates
const CONVERGENCE: f64 = 1e-12;

/// A dense polynomial with integer coefficients, ascending by degree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial {
    coeffs: Vec<i64>,
}

impl Polynomial {
    /// Create a polynomial from ascending coefficients `[c0, c1, c2, ...]`
    /// meaning c0 + c1·x + c2·x² + …
    pub fn new(mut coeffs: Vec<i64>) -> Self {
        while coeffs.len() > 1 && coeffs.last() == Some(&0) {
            coeffs.pop();
        }
        if coeffs.is_empty() {
            coeffs.push(0);
        }
        Self { coeffs }
    }

    /// Degree of the polynomial (0 for constants, including the zero polynomial)
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Whether this is the zero polynomial
    pub fn is_zero(&self) -> bool {
        self.coeffs == [0]
    }

    /// Ascending coefficients
    pub fn coeffs(&self) -> &[i64] {
        &self.coeffs
    }

    /// Evaluate at a complex point (Horner)
    pub fn eval_complex(&self, z: Complex64) -> Complex64 {
        let mut acc = Complex64::new(0.0, 0.0);
        for &c in self.coeffs.iter().rev() {
            acc = acc * z + Complex64::new(c as f64, 0.0);
        }
        acc
    }

    /// All complex roots, with multiplicity. Order is the solver's, not sorted.
    pub fn roots(&self) -> Vec<Complex64> {
        match self.degree() {
            0 => Vec::new(),
            1 => vec![Complex64::new(
                -(self.coeffs[0] as f64) / self.coeffs[1] as f64,
                0.0,
            )],
            2 => quadratic_roots(
                self.coeffs[2] as f64,
                self.coeffs[1] as f64,
                self.coeffs[0] as f64,
            ),
            _ => {
                let coeffs: Vec<f64> = self.coeffs.iter().map(|&c| c as f64).collect();
                durand_kerner(&coeffs)
            }
        }
    }

    /// Factor into content × x^m × linear rational factors × irreducible
    /// remainder, returned as an expression in `x`.
    pub fn factor(&self) -> Expr {
        if self.is_zero() {
            return Expr::int(0);
        }

        let mut coeffs = self.coeffs.clone();

        // Content: gcd of coefficients, carrying the leading sign
        let mut content = coeffs.iter().fold(0i64, |acc, &c| gcd(acc, c.abs()));
        if content == 0 {
            content = 1;
        }
        if matches!(coeffs.last(), Some(&lead) if lead < 0) {
            content = -content;
        }
        for c in coeffs.iter_mut() {
            *c /= content;
        }

        // Roots at zero come out as a leading x^m factor
        let mut zero_roots = 0usize;
        while coeffs.len() > 1 && coeffs[0] == 0 {
            coeffs.remove(0);
            zero_roots += 1;
        }

        // Peel off rational roots p/q until none remain
        let mut linear_factors: Vec<(i64, i64)> = Vec::new();
        loop {
            if coeffs.len() < 2 {
                break;
            }
            match find_rational_root(&coeffs) {
                Some((p, q)) => {
                    coeffs = divide_by_linear(&coeffs, p, q);
                    linear_factors.push((q, p));
                }
                None => break,
            }
        }

        // Whatever integer scale the divisions left behind joins the content
        let mut residual = coeffs.iter().fold(0i64, |acc, &c| gcd(acc, c.abs()));
        if residual == 0 {
            residual = 1;
        }
        if matches!(coeffs.last(), Some(&lead) if lead < 0) {
            residual = -residual;
        }
        for c in coeffs.iter_mut() {
            *c /= residual;
        }
        content *= residual;

        compose_factors(content, zero_roots, &linear_factors, &coeffs)
    }
}

/// Roots of a·x² + b·x + c = 0, complex-aware.
///
/// Degenerates gracefully: a = 0 falls back to the linear root, and
/// a = b = 0 has no roots at all. Root order follows the quadratic
/// formula (+ discriminant branch first), not any sorted order.
pub fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<Complex64> {
    if a == 0.0 {
        if b == 0.0 {
            return Vec::new();
        }
        return vec![Complex64::new(-c / b, 0.0)];
    }
    let disc = b * b - 4.0 * a * c;
    if disc >= 0.0 {
        let sq = disc.sqrt();
        vec![
            Complex64::new((-b + sq) / (2.0 * a), 0.0),
            Complex64::new((-b - sq) / (2.0 * a), 0.0),
        ]
    } else {
        let sq = (-disc).sqrt();
        vec![
            Complex64::new(-b / (2.0 * a), sq / (2.0 * a)),
            Complex64::new(-b / (2.0 * a), -sq / (2.0 * a)),
        ]
    }
}

/// Durand–Kerner simultaneous iteration over the monic normalization.
fn durand_kerner(coeffs: &[f64]) -> Vec<Complex64> {
    let n = coeffs.len() - 1;
    let lead = coeffs[n];
    let monic: Vec<Complex64> = coeffs
        .iter()
        .map(|&c| Complex64::new(c / lead, 0.0))
        .collect();

    let eval = |z: Complex64| {
        let mut acc = Complex64::new(0.0, 0.0);
        for &c in monic.iter().rev() {
            acc = acc * z + c;
        }
        acc
    };

    // Standard starting points: powers of a point off the real axis
    let seed = Complex64::new(0.4, 0.9);
    let mut roots: Vec<Complex64> = (0..n).map(|k| seed.powu(k as u32 + 1)).collect();

    for _ in 0..MAX_ITERATIONS {
        let mut worst = 0.0f64;
        for i in 0..n {
            let mut denom = Complex64::new(1.0, 0.0);
            for j in 0..n {
                if j != i {
                    denom *= roots[i] - roots[j];
                }
            }
            let delta = eval(roots[i]) / denom;
            roots[i] -= delta;
            worst = worst.max(delta.norm());
        }
        if worst < CONVERGENCE {
            break;
        }
    }

    // Snap iteration noise off the real axis
    for r in roots.iter_mut() {
        if r.im.abs() < 1e-9 * (1.0 + r.norm()) {
            *r = Complex64::new(r.re, 0.0);
        }
    }
    roots
}

/// Find a rational root p/q of the primitive polynomial, gcd(p, q) = 1.
fn find_rational_root(coeffs: &[i64]) -> Option<(i64, i64)> {
    let constant = coeffs[0];
    let leading = coeffs.last().copied().unwrap_or(0);

    if constant == 0 {
        return Some((0, 1));
    }

    for q in divisors(leading.abs()) {
        for p in divisors(constant.abs()) {
            if gcd(p, q) != 1 {
                continue;
            }
            if eval_rational(coeffs, p, q) == 0 {
                return Some((p, q));
            }
            if eval_rational(coeffs, -p, q) == 0 {
                return Some((-p, q));
            }
        }
    }
    None
}

/// Evaluate qⁿ·P(p/q) exactly: Σ cₖ pᵏ qⁿ⁻ᵏ
fn eval_rational(coeffs: &[i64], p: i64, q: i64) -> i128 {
    let n = coeffs.len() - 1;
    let mut total: i128 = 0;
    for (k, &c) in coeffs.iter().enumerate() {
        let mut term = c as i128;
        for _ in 0..k {
            term *= p as i128;
        }
        for _ in 0..(n - k) {
            term *= q as i128;
        }
        total += term;
    }
    total
}

/// Exact division by (q·x − p). The quotient of a primitive polynomial by
/// one of its primitive linear factors has integer coefficients.
fn divide_by_linear(coeffs: &[i64], p: i64, q: i64) -> Vec<i64> {
    let n = coeffs.len() - 1;
    let mut quotient = vec![0i64; n];
    let mut carry: i128 = 0;
    for k in (0..n).rev() {
        let top = coeffs[k + 1] as i128 + carry;
        let b = top / q as i128;
        quotient[k] = b as i64;
        carry = b * p as i128;
    }
    quotient
}

/// Assemble content · x^m · Π(qᵢx − pᵢ) · remainder into one expression
fn compose_factors(
    content: i64,
    zero_roots: usize,
    linear: &[(i64, i64)],
    remainder: &[i64],
) -> Expr {
    let mut pieces: Vec<Expr> = Vec::new();

    if zero_roots == 1 {
        pieces.push(Expr::symbol("x"));
    } else if zero_roots > 1 {
        pieces.push(Expr::pow(Expr::symbol("x"), Expr::int(zero_roots as i64)));
    }

    for &(q, p) in linear {
        pieces.push(linear_factor(q, p));
    }

    if remainder.len() > 1 || remainder[0] != 1 {
        pieces.push(poly_to_expr(remainder));
    }

    let mut expr = match pieces.into_iter().reduce(Expr::mul) {
        Some(product) => product,
        None => return Expr::int(content),
    };
    if content != 1 {
        expr = Expr::mul(Expr::int(content), expr);
    }
    expr
}

/// Render q·x − p with the usual sign cleanup
fn linear_factor(q: i64, p: i64) -> Expr {
    let term = if q == 1 {
        Expr::symbol("x")
    } else {
        Expr::mul(Expr::int(q), Expr::symbol("x"))
    };
    match p.cmp(&0) {
        std::cmp::Ordering::Equal => term,
        std::cmp::Ordering::Greater => Expr::sub(term, Expr::int(p)),
        std::cmp::Ordering::Less => Expr::add(term, Expr::int(-p)),
    }
}

/// Render ascending coefficients as an expression in `x`, highest degree first
fn poly_to_expr(coeffs: &[i64]) -> Expr {
    let mut expr: Option<Expr> = None;
    for k in (0..coeffs.len()).rev() {
        let c = coeffs[k];
        if c == 0 {
            continue;
        }
        let monomial = match k {
            0 => Expr::int(c.abs()),
            _ => {
                let power = if k == 1 {
                    Expr::symbol("x")
                } else {
                    Expr::pow(Expr::symbol("x"), Expr::int(k as i64))
                };
                if c.abs() == 1 {
                    power
                } else {
                    Expr::mul(Expr::int(c.abs()), power)
                }
            }
        };
        expr = Some(match expr {
            None => {
                if c < 0 {
                    Expr::neg(monomial)
                } else {
                    monomial
                }
            }
            Some(acc) => {
                if c < 0 {
                    Expr::sub(acc, monomial)
                } else {
                    Expr::add(acc, monomial)
                }
            }
        });
    }
    expr.unwrap_or_else(|| Expr::int(0))
}

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

fn divisors(n: i64) -> Vec<i64> {
    let n = n.abs();
    if n == 0 {
        return vec![1];
    }
    let mut out = Vec::new();
    let mut d = 1;
    while d * d <= n {
        if n % d == 0 {
            out.push(d);
            if d != n / d {
                out.push(n / d);
            }
        }
        d += 1;
    }
    out.sort_unstable();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-8;

    fn contains_root(roots: &[Complex64], expected: Complex64) -> bool {
        roots.iter().any(|r| (r - expected).norm() < TOL)
    }

    #[test]
    fn test_quadratic_real_roots() {
        // x² - 4 = 0 → ±2
        let roots = quadratic_roots(1.0, 0.0, -4.0);
        assert_eq!(roots.len(), 2);
        assert!(contains_root(&roots, Complex64::new(2.0, 0.0)));
        assert!(contains_root(&roots, Complex64::new(-2.0, 0.0)));
    }

    #[test]
    fn test_quadratic_complex_roots() {
        // 2x² + 4x + 6 = 0 → -1 ± sqrt(2)·i
        let roots = quadratic_roots(2.0, 4.0, 6.0);
        let sq2 = 2.0f64.sqrt();
        assert!(contains_root(&roots, Complex64::new(-1.0, sq2)));
        assert!(contains_root(&roots, Complex64::new(-1.0, -sq2)));
    }

    #[test]
    fn test_quadratic_degenerates_to_linear() {
        // 0x² + 2x + 6 = 0 → -3
        let roots = quadratic_roots(0.0, 2.0, 6.0);
        assert_eq!(roots.len(), 1);
        assert!(contains_root(&roots, Complex64::new(-3.0, 0.0)));
    }

    #[test]
    fn test_cubic_integer_roots() {
        // (x-1)(x-2)(x-3) = x³ - 6x² + 11x - 6
        let poly = Polynomial::new(vec![-6, 11, -6, 1]);
        let roots = poly.roots();
        assert_eq!(roots.len(), 3);
        for expected in [1.0, 2.0, 3.0] {
            assert!(contains_root(&roots, Complex64::new(expected, 0.0)));
        }
    }

    #[test]
    fn test_cubic_complex_pair() {
        // (x-1)(x² + 1) = x³ - x² + x - 1
        let poly = Polynomial::new(vec![-1, 1, -1, 1]);
        let roots = poly.roots();
        assert!(contains_root(&roots, Complex64::new(1.0, 0.0)));
        assert!(contains_root(&roots, Complex64::new(0.0, 1.0)));
        assert!(contains_root(&roots, Complex64::new(0.0, -1.0)));
    }

    #[test]
    fn test_quintic_roots_near_known() {
        // x⁵ - 1: the five fifth roots of unity, all on the unit circle
        let poly = Polynomial::new(vec![-1, 0, 0, 0, 0, 1]);
        let roots = poly.roots();
        assert_eq!(roots.len(), 5);
        for r in &roots {
            assert!((r.norm() - 1.0).abs() < TOL);
        }
        assert!(contains_root(&roots, Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_factor_difference_of_squares() {
        // x² - 1 = (x - 1)(x + 1)
        let poly = Polynomial::new(vec![-1, 0, 1]);
        let factored = poly.factor();
        assert_eq!(factored.to_string(), "(x - 1)*(x + 1)");
    }

    #[test]
    fn test_factor_with_content_and_zero_root() {
        // 2x³ - 2x = 2x(x - 1)(x + 1)
        let poly = Polynomial::new(vec![0, -2, 0, 2]);
        let factored = poly.factor();
        assert_eq!(factored.to_string(), "2*x*(x - 1)*(x + 1)");
    }

    #[test]
    fn test_factor_irreducible_remainder() {
        // x⁴ - 1 = (x - 1)(x + 1)(x² + 1)
        let poly = Polynomial::new(vec![-1, 0, 0, 0, 1]);
        let factored = poly.factor();
        assert_eq!(factored.to_string(), "(x - 1)*(x + 1)*(x^2 + 1)");
    }

    #[test]
    fn test_factor_rational_root() {
        // 2x² - 3x + 1 = (2x - 1)(x - 1)
        let poly = Polynomial::new(vec![1, -3, 2]);
        let factored = poly.factor();
        let s = factored.to_string();
        assert!(s == "(2*x - 1)*(x - 1)" || s == "(x - 1)*(2*x - 1)", "{}", s);
    }

    #[test]
    fn test_factor_matches_roots_numerically() {
        // Factored form agrees with the raw polynomial at sample points
        let poly = Polynomial::new(vec![-6, 11, -6, 1]);
        let factored = poly.factor();
        let engine = crate::MathEngine::new();
        let symbolic = crate::SymbolicEngine::new();
        for x in [-2.0, 0.5, 4.0] {
            let at = symbolic.substitute(&factored, "x", &Expr::float(x));
            let got = engine.evaluate(&at).unwrap();
            let want = poly.eval_complex(Complex64::new(x, 0.0)).re;
            assert!((got - want).abs() < TOL);
        }
    }

    #[test]
    fn test_zero_and_constant_polynomials() {
        assert!(Polynomial::new(vec![0, 0, 0]).is_zero());
        assert_eq!(Polynomial::new(vec![7]).roots().len(), 0);
        assert_eq!(Polynomial::new(vec![0]).factor(), Expr::int(0));
    }
}
