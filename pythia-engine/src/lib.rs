//! # pythia-engine
//!
//! Exact-math kernel for the pythia differential harness.
//!
//! This crate provides:
//! - Expression trees with symbolic and numeric values
//! - Real and complex numeric evaluation
//! - Symbolic manipulation (substitution, simplification, differentiation)
//! - Polynomial root finding and factoring over the rationals
//! - Arbitrary-precision decimal digits of π
//!
//! The oracle layer depends on this for every ground-truth computation.

// Allow method names like add, sub, mul, div for expression builders (not implementing std traits)
#![allow(clippy::should_implement_trait)]

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub mod poly;
pub mod precision;

/// Errors that can occur during engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Undefined symbol: {0}")]
    UndefinedSymbol(String),
    #[error("Expression has no real value: {0}")]
    NonRealResult(String),
    #[error("Evaluation error: {0}")]
    EvaluationError(String),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Mathematical operators supported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MathOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Neg,
}

/// Mathematical functions supported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MathFn {
    Sqrt,
    Abs,
    Sin,
    Cos,
    Exp,
    Ln,
}

impl MathFn {
    fn name(&self) -> &'static str {
        match self {
            MathFn::Sqrt => "sqrt",
            MathFn::Abs => "abs",
            MathFn::Sin => "sin",
            MathFn::Cos => "cos",
            MathFn::Exp => "exp",
            MathFn::Ln => "ln",
        }
    }
}

/// A mathematical value that can be symbolic or numeric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// Symbolic value (variable)
    Symbol(String),
    /// Rational number (numerator, denominator)
    Rational(i64, i64),
    /// The imaginary unit i (i² = -1)
    ImaginaryUnit,
}

/// A mathematical expression in tree form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A literal value
    Value(Value),
    /// Binary operation
    BinOp {
        op: MathOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Unary operation
    UnaryOp { op: MathOp, operand: Box<Expr> },
    /// Function application
    Function { func: MathFn, args: Vec<Expr> },
}

/// The math engine for numeric evaluation of expressions
#[derive(Debug, Default, Clone)]
pub struct MathEngine {
    /// Symbol table for variable bindings
    symbols: std::collections::HashMap<String, Value>,
}

impl MathEngine {
    /// Create a new math engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a symbol to a value
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.symbols.insert(name.into(), value);
    }

    /// Evaluate an expression to a real value.
    ///
    /// The imaginary unit is rejected here; use [`MathEngine::evaluate_complex`]
    /// for answers that may leave the real line.
    pub fn evaluate(&self, expr: &Expr) -> EngineResult<f64> {
        match expr {
            Expr::Value(v) => self.value_to_f64(v),
            Expr::BinOp { op, left, right } => {
                let l = self.evaluate(left)?;
                let r = self.evaluate(right)?;
                self.apply_binop(*op, l, r)
            }
            Expr::UnaryOp { op, operand } => {
                let v = self.evaluate(operand)?;
                match op {
                    MathOp::Neg => Ok(-v),
                    _ => Err(EngineError::InvalidOperation(format!(
                        "{:?} is not a unary operator",
                        op
                    ))),
                }
            }
            Expr::Function { func, args } => {
                let evaluated: Result<Vec<f64>, _> =
                    args.iter().map(|a| self.evaluate(a)).collect();
                self.apply_function(*func, &evaluated?)
            }
        }
    }

    /// Evaluate an expression to a complex value.
    ///
    /// Total over the same tree language as [`MathEngine::evaluate`]:
    /// sqrt of a negative real comes back imaginary instead of NaN.
    pub fn evaluate_complex(&self, expr: &Expr) -> EngineResult<Complex64> {
        match expr {
            Expr::Value(v) => self.value_to_complex(v),
            Expr::BinOp { op, left, right } => {
                let l = self.evaluate_complex(left)?;
                let r = self.evaluate_complex(right)?;
                match op {
                    MathOp::Add => Ok(l + r),
                    MathOp::Sub => Ok(l - r),
                    MathOp::Mul => Ok(l * r),
                    MathOp::Div => {
                        if r.norm() == 0.0 {
                            Err(EngineError::DivisionByZero)
                        } else {
                            Ok(l / r)
                        }
                    }
                    MathOp::Pow => Ok(complex_pow(l, r)),
                    MathOp::Neg => Err(EngineError::InvalidOperation(
                        "Neg is a unary operator".into(),
                    )),
                }
            }
            Expr::UnaryOp { op, operand } => {
                let v = self.evaluate_complex(operand)?;
                match op {
                    MathOp::Neg => Ok(-v),
                    _ => Err(EngineError::InvalidOperation(format!(
                        "{:?} is not a unary operator",
                        op
                    ))),
                }
            }
            Expr::Function { func, args } => {
                if args.len() != 1 {
                    return Err(EngineError::EvaluationError(format!(
                        "{} expects one argument",
                        func.name()
                    )));
                }
                let arg = self.evaluate_complex(&args[0])?;
                Ok(match func {
                    MathFn::Sqrt => arg.sqrt(),
                    MathFn::Abs => Complex64::new(arg.norm(), 0.0),
                    MathFn::Sin => arg.sin(),
                    MathFn::Cos => arg.cos(),
                    MathFn::Exp => arg.exp(),
                    MathFn::Ln => arg.ln(),
                })
            }
        }
    }

    fn value_to_f64(&self, value: &Value) -> EngineResult<f64> {
        match value {
            Value::Integer(i) => Ok(*i as f64),
            Value::Float(f) => Ok(*f),
            Value::Symbol(s) => {
                let bound = self
                    .symbols
                    .get(s)
                    .ok_or_else(|| EngineError::UndefinedSymbol(s.clone()))?;
                self.value_to_f64(bound)
            }
            Value::Rational(n, d) => {
                if *d == 0 {
                    Err(EngineError::DivisionByZero)
                } else {
                    Ok(*n as f64 / *d as f64)
                }
            }
            Value::ImaginaryUnit => Err(EngineError::NonRealResult(
                "the imaginary unit has no real value".into(),
            )),
        }
    }

    fn value_to_complex(&self, value: &Value) -> EngineResult<Complex64> {
        match value {
            Value::ImaginaryUnit => Ok(Complex64::new(0.0, 1.0)),
            Value::Symbol(s) => {
                let bound = self
                    .symbols
                    .get(s)
                    .ok_or_else(|| EngineError::UndefinedSymbol(s.clone()))?;
                self.value_to_complex(bound)
            }
            other => Ok(Complex64::new(self.value_to_f64(other)?, 0.0)),
        }
    }

    fn apply_binop(&self, op: MathOp, left: f64, right: f64) -> EngineResult<f64> {
        match op {
            MathOp::Add => Ok(left + right),
            MathOp::Sub => Ok(left - right),
            MathOp::Mul => Ok(left * right),
            MathOp::Div => {
                if right == 0.0 {
                    Err(EngineError::DivisionByZero)
                } else {
                    Ok(left / right)
                }
            }
            MathOp::Pow => Ok(left.powf(right)),
            MathOp::Neg => Err(EngineError::InvalidOperation(
                "Neg is a unary operator".into(),
            )),
        }
    }

    fn apply_function(&self, func: MathFn, args: &[f64]) -> EngineResult<f64> {
        if args.len() != 1 {
            return Err(EngineError::EvaluationError(format!(
                "{} expects one argument",
                func.name()
            )));
        }
        Ok(match func {
            MathFn::Sqrt => args[0].sqrt(),
            MathFn::Abs => args[0].abs(),
            MathFn::Sin => args[0].sin(),
            MathFn::Cos => args[0].cos(),
            MathFn::Exp => args[0].exp(),
            MathFn::Ln => args[0].ln(),
        })
    }
}

/// Complex power with the integer-exponent fast path.
///
/// `powc` goes through log/exp and turns exact integer powers of exact
/// inputs into values with float fuzz; repeated multiplication keeps
/// small integer powers exact.
fn complex_pow(base: Complex64, exp: Complex64) -> Complex64 {
    if exp.im == 0.0 && exp.re.fract() == 0.0 && exp.re.abs() <= 64.0 {
        let n = exp.re as i64;
        let mut acc = Complex64::new(1.0, 0.0);
        for _ in 0..n.unsigned_abs() {
            acc *= base;
        }
        if n < 0 {
            return acc.finv();
        }
        return acc;
    }
    base.powc(exp)
}

// ============================================================================
// Expression Utilities
// ============================================================================

impl Expr {
    /// Create an integer value expression
    pub fn int(n: i64) -> Self {
        Expr::Value(Value::Integer(n))
    }

    /// Create a float value expression
    pub fn float(n: f64) -> Self {
        Expr::Value(Value::Float(n))
    }

    /// Create a symbol expression
    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Value(Value::Symbol(name.into()))
    }

    /// Create the imaginary unit
    pub fn imag() -> Self {
        Expr::Value(Value::ImaginaryUnit)
    }

    /// Create an addition expression
    pub fn add(left: Expr, right: Expr) -> Self {
        Expr::BinOp {
            op: MathOp::Add,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a subtraction expression
    pub fn sub(left: Expr, right: Expr) -> Self {
        Expr::BinOp {
            op: MathOp::Sub,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a multiplication expression
    pub fn mul(left: Expr, right: Expr) -> Self {
        Expr::BinOp {
            op: MathOp::Mul,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a division expression
    pub fn div(left: Expr, right: Expr) -> Self {
        Expr::BinOp {
            op: MathOp::Div,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a power expression
    pub fn pow(base: Expr, exp: Expr) -> Self {
        Expr::BinOp {
            op: MathOp::Pow,
            left: Box::new(base),
            right: Box::new(exp),
        }
    }

    /// Create a negation expression
    pub fn neg(operand: Expr) -> Self {
        Expr::UnaryOp {
            op: MathOp::Neg,
            operand: Box::new(operand),
        }
    }

    /// Create a function application
    pub fn func(f: MathFn, args: Vec<Expr>) -> Self {
        Expr::Function { func: f, args }
    }

    /// Create a square root
    pub fn sqrt(arg: Expr) -> Self {
        Expr::func(MathFn::Sqrt, vec![arg])
    }

    /// Collect all symbols in the expression
    pub fn collect_symbols(&self) -> HashSet<String> {
        let mut symbols = HashSet::new();
        self.collect_symbols_recursive(&mut symbols);
        symbols
    }

    fn collect_symbols_recursive(&self, symbols: &mut HashSet<String>) {
        match self {
            Expr::Value(Value::Symbol(s)) => {
                symbols.insert(s.clone());
            }
            Expr::Value(_) => {}
            Expr::BinOp { left, right, .. } => {
                left.collect_symbols_recursive(symbols);
                right.collect_symbols_recursive(symbols);
            }
            Expr::UnaryOp { operand, .. } => {
                operand.collect_symbols_recursive(symbols);
            }
            Expr::Function { args, .. } => {
                for arg in args {
                    arg.collect_symbols_recursive(symbols);
                }
            }
        }
    }

    /// Check if expression contains any symbols
    pub fn is_symbolic(&self) -> bool {
        !self.collect_symbols().is_empty()
    }

    /// Check if expression is purely numeric (no symbols)
    pub fn is_constant(&self) -> bool {
        self.collect_symbols().is_empty()
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::BinOp { op, .. } => match op {
                MathOp::Add | MathOp::Sub => 1,
                MathOp::Mul | MathOp::Div => 2,
                MathOp::Pow => 3,
                MathOp::Neg => 1,
            },
            Expr::UnaryOp { .. } => 1,
            _ => 4,
        }
    }

    fn fmt_child(&self, child: &Expr, min_prec: u8, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if child.precedence() < min_prec {
            write!(f, "({})", child)
        } else {
            write!(f, "{}", child)
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Value(Value::Integer(n)) => write!(f, "{}", n),
            Expr::Value(Value::Float(x)) => write!(f, "{}", x),
            Expr::Value(Value::Symbol(s)) => write!(f, "{}", s),
            Expr::Value(Value::Rational(n, d)) => write!(f, "{}/{}", n, d),
            Expr::Value(Value::ImaginaryUnit) => write!(f, "i"),
            Expr::BinOp { op, left, right } => {
                let prec = self.precedence();
                let (sym, right_prec) = match op {
                    MathOp::Add => (" + ", prec),
                    MathOp::Sub => (" - ", prec + 1),
                    MathOp::Mul => ("*", prec),
                    MathOp::Div => ("/", prec + 1),
                    MathOp::Pow => ("^", prec + 1),
                    // Neg never appears as a binary op
                    MathOp::Neg => (" - ", prec),
                };
                self.fmt_child(left, prec, f)?;
                write!(f, "{}", sym)?;
                self.fmt_child(right, right_prec, f)
            }
            Expr::UnaryOp { operand, .. } => {
                write!(f, "-")?;
                self.fmt_child(operand, 4, f)
            }
            Expr::Function { func, args } => {
                write!(f, "{}(", func.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

// ============================================================================
// Symbolic Engine (Symbolic Manipulation)
// ============================================================================

/// Engine for symbolic manipulation of expressions
#[derive(Debug, Default)]
pub struct SymbolicEngine;

impl SymbolicEngine {
    /// Create a new symbolic engine
    pub fn new() -> Self {
        Self
    }

    /// Substitute a symbol with an expression
    pub fn substitute(&self, expr: &Expr, var: &str, replacement: &Expr) -> Expr {
        match expr {
            Expr::Value(Value::Symbol(s)) if s == var => replacement.clone(),
            Expr::Value(_) => expr.clone(),
            Expr::BinOp { op, left, right } => Expr::BinOp {
                op: *op,
                left: Box::new(self.substitute(left, var, replacement)),
                right: Box::new(self.substitute(right, var, replacement)),
            },
            Expr::UnaryOp { op, operand } => Expr::UnaryOp {
                op: *op,
                operand: Box::new(self.substitute(operand, var, replacement)),
            },
            Expr::Function { func, args } => Expr::Function {
                func: *func,
                args: args
                    .iter()
                    .map(|a| self.substitute(a, var, replacement))
                    .collect(),
            },
        }
    }

    /// Symbolic differentiation with respect to a variable
    /// Implements the elementary rules:
    /// - d/dx(c) = 0 (constant)
    /// - d/dx(x) = 1
    /// - d/dx(u ± v) = du/dx ± dv/dx
    /// - d/dx(u * v) = u * dv/dx + v * du/dx (product rule)
    /// - d/dx(u / v) = (v * du/dx - u * dv/dx) / v² (quotient rule)
    /// - d/dx(u^n) = n * u^(n-1) * du/dx (power rule for constant n)
    /// - d/dx(sin(u)) = cos(u) * du/dx, d/dx(cos(u)) = -sin(u) * du/dx
    /// - d/dx(exp(u)) = exp(u) * du/dx, d/dx(ln(u)) = (1/u) * du/dx
    pub fn differentiate(&self, expr: &Expr, var: &str) -> Expr {
        match expr {
            Expr::Value(Value::Symbol(s)) => {
                if s == var {
                    Expr::int(1)
                } else {
                    Expr::int(0)
                }
            }
            Expr::Value(_) => Expr::int(0),

            Expr::BinOp { op, left, right } => {
                let dl = self.differentiate(left, var);
                let dr = self.differentiate(right, var);

                match op {
                    MathOp::Add => Expr::add(dl, dr),
                    MathOp::Sub => Expr::sub(dl, dr),
                    MathOp::Mul => Expr::add(
                        Expr::mul((**left).clone(), dr),
                        Expr::mul((**right).clone(), dl),
                    ),
                    MathOp::Div => {
                        let numerator = Expr::sub(
                            Expr::mul((**right).clone(), dl),
                            Expr::mul((**left).clone(), dr),
                        );
                        let denominator = Expr::pow((**right).clone(), Expr::int(2));
                        Expr::div(numerator, denominator)
                    }
                    // Power rule; constant exponents only, which is all the
                    // oracle produces
                    MathOp::Pow => Expr::mul(
                        Expr::mul(
                            (**right).clone(),
                            Expr::pow(
                                (**left).clone(),
                                Expr::sub((**right).clone(), Expr::int(1)),
                            ),
                        ),
                        dl,
                    ),
                    MathOp::Neg => Expr::int(0),
                }
            }

            Expr::UnaryOp { op, operand } => match op {
                MathOp::Neg => Expr::neg(self.differentiate(operand, var)),
                _ => Expr::int(0),
            },

            Expr::Function { func, args } => {
                if args.is_empty() {
                    return Expr::int(0);
                }

                let u = &args[0];
                let du = self.differentiate(u, var);

                match func {
                    MathFn::Sin => Expr::mul(Expr::func(MathFn::Cos, vec![u.clone()]), du),
                    MathFn::Cos => {
                        Expr::neg(Expr::mul(Expr::func(MathFn::Sin, vec![u.clone()]), du))
                    }
                    MathFn::Exp => Expr::mul(Expr::func(MathFn::Exp, vec![u.clone()]), du),
                    MathFn::Ln => Expr::div(du, u.clone()),
                    MathFn::Sqrt => Expr::div(
                        du,
                        Expr::mul(Expr::int(2), Expr::func(MathFn::Sqrt, vec![u.clone()])),
                    ),
                    // d/dx(abs(u)) = sign(u) * du/dx (sign not represented)
                    MathFn::Abs => du,
                }
            }
        }
    }

    /// Simplify an expression (basic algebraic simplification)
    ///
    /// Handles:
    /// - x + 0 = x, x * 1 = x, x * 0 = 0
    /// - x - x = 0, x / 1 = x
    /// - Constant folding: 2 + 3 = 5
    pub fn simplify(&self, expr: &Expr) -> Expr {
        match expr {
            Expr::BinOp { op, left, right } => {
                let left_s = self.simplify(left);
                let right_s = self.simplify(right);

                // Constant folding over the reals
                if let (Some(l), Some(r)) = (
                    self.evaluate_numeric(&left_s),
                    self.evaluate_numeric(&right_s),
                ) {
                    let result = match op {
                        MathOp::Add => Some(l + r),
                        MathOp::Sub => Some(l - r),
                        MathOp::Mul => Some(l * r),
                        MathOp::Div if r != 0.0 => Some(l / r),
                        MathOp::Pow => Some(l.powf(r)),
                        _ => None,
                    };
                    if let Some(v) = result {
                        if v == v.floor() && v.abs() < i64::MAX as f64 {
                            return Expr::int(v as i64);
                        } else {
                            return Expr::float(v);
                        }
                    }
                }

                match op {
                    MathOp::Add => {
                        if self.is_zero(&right_s) {
                            return left_s;
                        }
                        if self.is_zero(&left_s) {
                            return right_s;
                        }
                    }
                    MathOp::Sub => {
                        if self.is_zero(&right_s) {
                            return left_s;
                        }
                        if self.is_zero(&left_s) {
                            return Expr::neg(right_s);
                        }
                        if left_s == right_s {
                            return Expr::int(0);
                        }
                    }
                    MathOp::Mul => {
                        if self.is_zero(&left_s) || self.is_zero(&right_s) {
                            return Expr::int(0);
                        }
                        if self.is_int(&right_s, 1) {
                            return left_s;
                        }
                        if self.is_int(&left_s, 1) {
                            return right_s;
                        }
                    }
                    MathOp::Div => {
                        if self.is_int(&right_s, 1) {
                            return left_s;
                        }
                        if self.is_zero(&left_s) && !self.is_zero(&right_s) {
                            return Expr::int(0);
                        }
                    }
                    MathOp::Pow => {
                        if self.is_zero(&right_s) {
                            return Expr::int(1);
                        }
                        if self.is_int(&right_s, 1) {
                            return left_s;
                        }
                    }
                    _ => {}
                }

                Expr::BinOp {
                    op: *op,
                    left: Box::new(left_s),
                    right: Box::new(right_s),
                }
            }
            Expr::UnaryOp {
                op: MathOp::Neg,
                operand,
            } => {
                let operand_s = self.simplify(operand);
                // -(-x) = x
                if let Expr::UnaryOp {
                    op: MathOp::Neg,
                    operand: inner,
                } = operand_s
                {
                    return *inner;
                }
                if self.is_zero(&operand_s) {
                    return Expr::int(0);
                }
                if let Expr::Value(Value::Integer(n)) = operand_s {
                    return Expr::int(-n);
                }
                Expr::UnaryOp {
                    op: MathOp::Neg,
                    operand: Box::new(operand_s),
                }
            }
            Expr::Function { func, args } => {
                let args_s: Vec<Expr> = args.iter().map(|a| self.simplify(a)).collect();
                Expr::Function {
                    func: *func,
                    args: args_s,
                }
            }
            _ => expr.clone(),
        }
    }

    fn is_zero(&self, expr: &Expr) -> bool {
        matches!(expr, Expr::Value(Value::Integer(0)))
            || matches!(expr, Expr::Value(Value::Float(f)) if *f == 0.0)
    }

    fn is_int(&self, expr: &Expr, n: i64) -> bool {
        matches!(expr, Expr::Value(Value::Integer(i)) if *i == n)
    }

    /// Try to evaluate an expression numerically without any bindings
    fn evaluate_numeric(&self, expr: &Expr) -> Option<f64> {
        match expr {
            Expr::Value(Value::Integer(n)) => Some(*n as f64),
            Expr::Value(Value::Float(f)) => Some(*f),
            Expr::Value(Value::Rational(n, d)) if *d != 0 => Some(*n as f64 / *d as f64),
            Expr::Value(_) => None,
            Expr::BinOp { op, left, right } => {
                let l = self.evaluate_numeric(left)?;
                let r = self.evaluate_numeric(right)?;
                match op {
                    MathOp::Add => Some(l + r),
                    MathOp::Sub => Some(l - r),
                    MathOp::Mul => Some(l * r),
                    MathOp::Div if r != 0.0 => Some(l / r),
                    MathOp::Pow => Some(l.powf(r)),
                    _ => None,
                }
            }
            Expr::UnaryOp {
                op: MathOp::Neg,
                operand,
            } => self.evaluate_numeric(operand).map(|v| -v),
            Expr::UnaryOp { .. } => None,
            Expr::Function { func, args } => {
                if args.len() != 1 {
                    return None;
                }
                let arg = self.evaluate_numeric(&args[0])?;
                match func {
                    MathFn::Sqrt if arg >= 0.0 => Some(arg.sqrt()),
                    MathFn::Sin => Some(arg.sin()),
                    MathFn::Cos => Some(arg.cos()),
                    MathFn::Exp => Some(arg.exp()),
                    MathFn::Ln if arg > 0.0 => Some(arg.ln()),
                    MathFn::Abs => Some(arg.abs()),
                    _ => None,
                }
            }
        }
    }
}
