//! Truth-table oracle for word-operator boolean expressions.
//!
//! Expressions use the words AND/OR/XOR/NOT (case-insensitive) over
//! single-letter variables, with optional parentheses. Operator
//! precedence from loosest to tightest: OR, XOR, AND, NOT.

use std::collections::HashMap;

use crate::{OracleError, OracleResult};

/// The fixed pool the table's variable columns are drawn from.
pub const VARIABLE_POOL: &[char] = &['q', 'r', 's', 't', 'u', 'v'];

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Var(char),
    And,
    Or,
    Xor,
    Not,
    LParen,
    RParen,
}

#[derive(Debug, Clone)]
enum BoolExpr {
    Var(char),
    Not(Box<BoolExpr>),
    And(Box<BoolExpr>, Box<BoolExpr>),
    Or(Box<BoolExpr>, Box<BoolExpr>),
    Xor(Box<BoolExpr>, Box<BoolExpr>),
}

impl BoolExpr {
    fn eval(&self, assignment: &HashMap<char, bool>) -> bool {
        match self {
            // Letters with no column default to false
            BoolExpr::Var(c) => assignment.get(c).copied().unwrap_or(false),
            BoolExpr::Not(inner) => !inner.eval(assignment),
            BoolExpr::And(l, r) => l.eval(assignment) && r.eval(assignment),
            BoolExpr::Or(l, r) => l.eval(assignment) || r.eval(assignment),
            BoolExpr::Xor(l, r) => l.eval(assignment) ^ r.eval(assignment),
        }
    }

    fn collect_vars(&self, out: &mut Vec<char>) {
        match self {
            BoolExpr::Var(c) => {
                if !out.contains(c) {
                    out.push(*c);
                }
            }
            BoolExpr::Not(inner) => inner.collect_vars(out),
            BoolExpr::And(l, r) | BoolExpr::Or(l, r) | BoolExpr::Xor(l, r) => {
                l.collect_vars(out);
                r.collect_vars(out);
            }
        }
    }
}

fn tokenize(text: &str) -> OracleResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphabetic() {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match word.to_lowercase().as_str() {
                    "and" => tokens.push(Token::And),
                    "or" => tokens.push(Token::Or),
                    "xor" => tokens.push(Token::Xor),
                    "not" => tokens.push(Token::Not),
                    w => match w.chars().next() {
                        Some(letter) if w.len() == 1 => tokens.push(Token::Var(letter)),
                        _ => {
                            return Err(OracleError::InvalidExpression(format!(
                                "unexpected word '{}'",
                                word
                            )))
                        }
                    },
                }
            }
            other => {
                return Err(OracleError::InvalidExpression(format!(
                    "unexpected character '{}'",
                    other
                )))
            }
        }
    }
    Ok(tokens)
}

/// Recursive-descent parser over the token stream.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    // or_expr := xor_expr (OR xor_expr)*
    fn or_expr(&mut self) -> OracleResult<BoolExpr> {
        let mut left = self.xor_expr()?;
        while self.peek() == Some(&Token::Or) {
            self.advance();
            let right = self.xor_expr()?;
            left = BoolExpr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // xor_expr := and_expr (XOR and_expr)*
    fn xor_expr(&mut self) -> OracleResult<BoolExpr> {
        let mut left = self.and_expr()?;
        while self.peek() == Some(&Token::Xor) {
            self.advance();
            let right = self.and_expr()?;
            left = BoolExpr::Xor(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // and_expr := unary (AND unary)*
    fn and_expr(&mut self) -> OracleResult<BoolExpr> {
        let mut left = self.unary()?;
        while self.peek() == Some(&Token::And) {
            self.advance();
            let right = self.unary()?;
            left = BoolExpr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // unary := NOT unary | atom
    fn unary(&mut self) -> OracleResult<BoolExpr> {
        if self.peek() == Some(&Token::Not) {
            self.advance();
            return Ok(BoolExpr::Not(Box::new(self.unary()?)));
        }
        self.atom()
    }

    // atom := var | '(' or_expr ')'
    fn atom(&mut self) -> OracleResult<BoolExpr> {
        match self.advance() {
            Some(Token::Var(c)) => Ok(BoolExpr::Var(c)),
            Some(Token::LParen) => {
                let inner = self.or_expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(OracleError::InvalidExpression(
                        "missing closing parenthesis".to_string(),
                    )),
                }
            }
            other => Err(OracleError::InvalidExpression(format!(
                "unexpected token {:?}",
                other
            ))),
        }
    }
}

fn parse(text: &str) -> OracleResult<BoolExpr> {
    let tokens = tokenize(text)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.or_expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(OracleError::InvalidExpression(format!(
            "trailing input in '{}'",
            text
        )));
    }
    Ok(expr)
}

/// Build the truth table for `expr_text` over `num_letters` variables.
///
/// The expression's distinct letters, sorted alphabetically, bind to the
/// table columns in order; letters beyond the column count are false.
/// Rows enumerate the truth tuples in descending binary order (first
/// column varies slowest, T before F). Each row is the per-column T/F
/// values followed by the expression's value, all joined by `" | "`;
/// rows are joined by newlines with no trailing newline.
pub fn truth_table(expr_text: &str, num_letters: usize) -> OracleResult<String> {
    if num_letters > VARIABLE_POOL.len() {
        return Err(OracleError::TooManyVariables {
            requested: num_letters,
            max: VARIABLE_POOL.len(),
        });
    }

    let expr = parse(expr_text)?;
    let mut letters = Vec::new();
    expr.collect_vars(&mut letters);
    letters.sort_unstable();

    let mut rows = Vec::with_capacity(1 << num_letters);
    for index in 0..(1usize << num_letters) {
        let mut values = Vec::with_capacity(num_letters);
        for column in 0..num_letters {
            // T first: bit unset means true in descending enumeration
            let bit = (index >> (num_letters - 1 - column)) & 1;
            values.push(bit == 0);
        }

        let assignment: HashMap<char, bool> = letters
            .iter()
            .zip(values.iter())
            .map(|(&letter, &value)| (letter, value))
            .collect();

        let mut fields: Vec<&str> = values
            .iter()
            .map(|&v| if v { "T" } else { "F" })
            .collect();
        fields.push(if expr.eval(&assignment) { "T" } else { "F" });
        rows.push(fields.join(" | "));
    }

    Ok(rows.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_known_case() {
        let table = truth_table("A AND B", 2).unwrap();
        assert_eq!(table, "T | T | T\nT | F | F\nF | T | F\nF | F | F");
    }

    #[test]
    fn test_row_and_field_counts() {
        let table = truth_table("a OR b XOR c", 3).unwrap();
        let rows: Vec<&str> = table.split('\n').collect();
        assert_eq!(rows.len(), 8);
        for row in rows {
            assert_eq!(row.split(" | ").count(), 4);
        }
        assert!(!table.ends_with('\n'));
    }

    #[test]
    fn test_not_and_parentheses() {
        // NOT (A OR B) is only true on the all-false row
        let table = truth_table("NOT (A OR B)", 2).unwrap();
        assert_eq!(table, "T | T | F\nT | F | F\nF | T | F\nF | F | T");
    }

    #[test]
    fn test_operator_precedence() {
        // a OR b AND c parses as a OR (b AND c): row F T F gives F
        let table = truth_table("a OR b AND c", 3).unwrap();
        let rows: Vec<&str> = table.split('\n').collect();
        // Row index 3 is T F F → T; row index 5 is F T F → F
        assert_eq!(rows[3], "T | F | F | T");
        assert_eq!(rows[5], "F | T | F | F");
    }

    #[test]
    fn test_case_insensitive_operators() {
        assert_eq!(
            truth_table("a and b", 2).unwrap(),
            truth_table("A AND B", 2).unwrap()
        );
    }

    #[test]
    fn test_unbound_letter_defaults_false() {
        // Second letter has no column, so A AND B is B-false everywhere
        let table = truth_table("A AND B", 1).unwrap();
        assert_eq!(table, "T | F\nF | F");
    }

    #[test]
    fn test_xor() {
        let table = truth_table("A XOR B", 2).unwrap();
        assert_eq!(table, "T | T | F\nT | F | T\nF | T | T\nF | F | F");
    }

    #[test]
    fn test_too_many_variables() {
        assert!(matches!(
            truth_table("A AND B", 7),
            Err(OracleError::TooManyVariables { .. })
        ));
    }

    #[test]
    fn test_invalid_expression() {
        assert!(matches!(
            truth_table("A FROB B", 2),
            Err(OracleError::InvalidExpression(_))
        ));
        assert!(matches!(
            truth_table("AND AND", 2),
            Err(OracleError::InvalidExpression(_))
        ));
    }
}
