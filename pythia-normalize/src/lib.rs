//! # pythia-normalize
//!
//! Turns the knowledge API's free-text answers into values comparable
//! with oracle output:
//! - Expression parsing with the API's notation: `^` for powers, `×`
//!   for products, implicit multiplication (`2x`), and `i` as the
//!   imaginary unit rather than a variable
//! - Numeric evaluation of arithmetic answer text
//! - Canonical ordering of multi-valued answers so both sides can be
//!   compared pairwise
//!
//! The canonical key (real + imaginary part of the simplified value) is
//! a tie-break heuristic to get both sides into one deterministic
//! order; it is not a multiset-equality proof.

use num_complex::Complex64;
use pythia_engine::{EngineError, Expr, MathEngine, MathFn, SymbolicEngine};
use thiserror::Error;

/// Errors from answer normalization
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Cannot parse '{text}': {reason}")]
    Parse { text: String, reason: String },
    #[error("Empty answer text")]
    Empty,
    #[error("Answer does not reduce to a number: {0}")]
    NotNumeric(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type for normalization
pub type NormalizeResult<T> = Result<T, NormalizeError>;

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(text: &str) -> NormalizeResult<Vec<Token>> {
    let parse_err = |reason: &str| NormalizeError::Parse {
        text: text.to_string(),
        reason: reason.to_string(),
    };

    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '+' => {
                tokens.push(Token::Plus);
                chars.next();
            }
            // The API renders minus both ways
            '-' | '−' => {
                tokens.push(Token::Minus);
                chars.next();
            }
            '*' | '×' => {
                tokens.push(Token::Star);
                chars.next();
            }
            '/' => {
                tokens.push(Token::Slash);
                chars.next();
            }
            '^' => {
                tokens.push(Token::Caret);
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            'π' => {
                tokens.push(Token::Ident("pi".to_string()));
                chars.next();
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut literal = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        literal.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value: f64 = literal
                    .parse()
                    .map_err(|_| parse_err(&format!("bad number literal '{}'", literal)))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphabetic() {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(word));
            }
            other => return Err(parse_err(&format!("unexpected character '{}'", other))),
        }
    }
    Ok(tokens)
}

// ============================================================================
// Parser
// ============================================================================

/// Recursive-descent parser with implicit multiplication: a number,
/// name, or closing parenthesis directly followed by a name, number, or
/// opening parenthesis multiplies (`2x`, `sqrt(2) i`, `3(x + 1)`).
struct Parser<'t> {
    text: &'t str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'t> Parser<'t> {
    fn error(&self, reason: impl Into<String>) -> NormalizeError {
        NormalizeError::Parse {
            text: self.text.to_string(),
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> NormalizeResult<Expr> {
        let mut left = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    left = Expr::add(left, self.term()?);
                }
                Some(Token::Minus) => {
                    self.advance();
                    left = Expr::sub(left, self.term()?);
                }
                _ => return Ok(left),
            }
        }
    }

    // term := factor (('*' | '/') factor | <implicit> factor)*
    fn term(&mut self) -> NormalizeResult<Expr> {
        let mut left = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    left = Expr::mul(left, self.factor()?);
                }
                Some(Token::Slash) => {
                    self.advance();
                    left = Expr::div(left, self.factor()?);
                }
                Some(Token::Number(_)) | Some(Token::Ident(_)) | Some(Token::LParen) => {
                    left = Expr::mul(left, self.factor()?);
                }
                _ => return Ok(left),
            }
        }
    }

    // factor := '-' factor | power
    fn factor(&mut self) -> NormalizeResult<Expr> {
        if self.peek() == Some(&Token::Minus) {
            self.advance();
            return Ok(Expr::neg(self.factor()?));
        }
        self.power()
    }

    // power := atom ('^' factor)?   (right-associative)
    fn power(&mut self) -> NormalizeResult<Expr> {
        let base = self.atom()?;
        if self.peek() == Some(&Token::Caret) {
            self.advance();
            let exp = self.factor()?;
            return Ok(Expr::pow(base, exp));
        }
        Ok(base)
    }

    // atom := number | ident | ident '(' expr ')' | '(' expr ')'
    fn atom(&mut self) -> NormalizeResult<Expr> {
        match self.advance() {
            Some(Token::Number(value)) => {
                if value == value.trunc() && value.abs() < i64::MAX as f64 {
                    Ok(Expr::int(value as i64))
                } else {
                    Ok(Expr::float(value))
                }
            }
            Some(Token::Ident(name)) => self.named(name),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(self.error("missing closing parenthesis")),
                }
            }
            other => Err(self.error(format!("unexpected token {:?}", other))),
        }
    }

    fn named(&mut self, name: String) -> NormalizeResult<Expr> {
        match name.as_str() {
            // the imaginary unit, never a variable
            "i" => Ok(Expr::imag()),
            "pi" => Ok(Expr::float(std::f64::consts::PI)),
            "e" => Ok(Expr::float(std::f64::consts::E)),
            "sqrt" | "abs" | "sin" | "cos" | "exp" | "ln" => {
                let func = match name.as_str() {
                    "sqrt" => MathFn::Sqrt,
                    "abs" => MathFn::Abs,
                    "sin" => MathFn::Sin,
                    "cos" => MathFn::Cos,
                    "exp" => MathFn::Exp,
                    _ => MathFn::Ln,
                };
                match self.advance() {
                    Some(Token::LParen) => {
                        let arg = self.expr()?;
                        match self.advance() {
                            Some(Token::RParen) => Ok(Expr::func(func, vec![arg])),
                            _ => Err(self.error("missing closing parenthesis")),
                        }
                    }
                    _ => Err(self.error(format!("{} requires parentheses", name))),
                }
            }
            _ => Ok(Expr::symbol(name)),
        }
    }
}

/// Parse answer text into an expression with the API's notation.
pub fn symbolic(text: &str) -> NormalizeResult<Expr> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(NormalizeError::Empty);
    }
    let mut parser = Parser {
        text,
        tokens,
        pos: 0,
    };
    let expr = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(parser.error("trailing input"));
    }
    Ok(expr)
}

/// Parse every element of a list of answer strings.
pub fn symbolic_list<S: AsRef<str>>(items: &[S]) -> NormalizeResult<Vec<Expr>> {
    items.iter().map(|item| symbolic(item.as_ref())).collect()
}

/// Parse arithmetic answer text and evaluate it to a float.
pub fn numeric_value(text: &str) -> NormalizeResult<f64> {
    let expr = symbolic(text)?;
    let engine = MathEngine::new();
    engine
        .evaluate(&expr)
        .map_err(|_| NormalizeError::NotNumeric(text.to_string()))
}

/// Strip the `x = ` prefix (anything up to the last `=`) from a solution
/// line, leaving the value text.
pub fn solution_value(text: &str) -> &str {
    match text.rfind('=') {
        Some(idx) => text[idx + 1..].trim(),
        None => text.trim(),
    }
}

// ============================================================================
// Canonical Ordering & Comparison
// ============================================================================

/// Canonical sort key: real + imaginary part of the simplified value.
pub fn canonical_key(expr: &Expr) -> NormalizeResult<f64> {
    let symbolic_engine = SymbolicEngine::new();
    let engine = MathEngine::new();
    let value = engine.evaluate_complex(&symbolic_engine.simplify(expr))?;
    Ok(value.re + value.im)
}

/// Sort expressions by the canonical key into a deterministic order.
pub fn canonical_sort(exprs: Vec<Expr>) -> NormalizeResult<Vec<Expr>> {
    let mut keyed: Vec<(f64, Expr)> = exprs
        .into_iter()
        .map(|e| canonical_key(&e).map(|k| (k, e)))
        .collect::<NormalizeResult<_>>()?;
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, e)| e).collect())
}

/// Sort complex values by the same canonical key as [`canonical_sort`].
pub fn sort_complex(mut values: Vec<Complex64>) -> Vec<Complex64> {
    values.sort_by(|a, b| (a.re + a.im).total_cmp(&(b.re + b.im)));
    values
}

/// Compare oracle roots against normalized answer expressions: sort both
/// sides by the canonical key, then require each pairwise difference to
/// vanish within `tol`.
pub fn roots_match(
    oracle: &[Complex64],
    external: &[Expr],
    tol: f64,
) -> NormalizeResult<bool> {
    if oracle.len() != external.len() {
        return Ok(false);
    }
    let oracle = sort_complex(oracle.to_vec());
    let external = canonical_sort(external.to_vec())?;

    let engine = MathEngine::new();
    let symbolic_engine = SymbolicEngine::new();
    for (ours, theirs) in oracle.iter().zip(external.iter()) {
        let value = engine.evaluate_complex(&symbolic_engine.simplify(theirs))?;
        if (value - ours).norm() > tol {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Numeric equivalence of two single-variable expressions, checked by
/// sampling: substitutes `var` at fixed probe points and compares the
/// complex values within `tol`.
pub fn exprs_equivalent(a: &Expr, b: &Expr, var: &str, tol: f64) -> NormalizeResult<bool> {
    const PROBES: &[f64] = &[-2.7, -1.0, -0.3, 0.4, 1.1, 2.0, 3.6];

    let engine = MathEngine::new();
    let symbolic_engine = SymbolicEngine::new();
    for &x in PROBES {
        let probe = Expr::float(x);
        let va = engine.evaluate_complex(&symbolic_engine.substitute(a, var, &probe))?;
        let vb = engine.evaluate_complex(&symbolic_engine.substitute(b, var, &probe))?;
        if (va - vb).norm() > tol * (1.0 + va.norm()) {
            return Ok(false);
        }
    }
    Ok(true)
}
