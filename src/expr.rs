// src/expr.rs

//! Recursive-descent arithmetic expression evaluator.
//!
//! Grammar:
//! ```text
//! expr   := term (('+'|'-') term)*
//! term   := factor (('*'|'/') factor)*
//! factor := '(' expr ')' | number | 'x' | '-' factor | fname '(' expr ')'
//! factor := factor '^' factor      // exponent applied once after the base
//! ```
//!
//! `x` is substituted with the caller-supplied sample value. Supported
//! function names are exactly `sin, cos, tan, exp, log, abs, sqrt`
//! (`log` is the natural log), matched case-sensitively against at
//! most the first 4 letters consumed from an identifier. Longer names
//! are truncated before comparison, so e.g. `sqrtx(2)` reads as `sqrt`
//! followed by a stray `x`; this quirk is documented behavior, not a
//! bug to fix.
//!
//! All parse state (cursor, sample value, error flag) lives in a
//! per-call [`Parser`] that is created and dropped inside
//! [`evaluate`], so independent evaluations never interfere and may
//! run concurrently.

use crate::error::ExprError;

/// Maximum identifier length considered for function-name matching.
const MAX_FUNC_NAME_LEN: usize = 4;

/// Evaluates `expression` at the sample value `x`.
///
/// The error flag is sticky: once set by any production it is never
/// cleared, the remaining productions still run (there is no early
/// abort), and the final result is discarded in favor of `Err`.
/// Conditions that set the flag: an unmatched parenthesis, a numeric
/// literal that consumes zero characters, an unknown function name, a
/// function call missing its `(`, division by exactly `0.0` (the
/// intermediate result becomes NaN), and any unrecognized character in
/// factor position. Trailing input after a complete expression is
/// ignored.
pub fn evaluate(expression: &str, x: f64) -> Result<f64, ExprError> {
    let mut parser = Parser::new(expression, x);
    let value = parser.parse_expr();
    if parser.failed {
        Err(ExprError)
    } else {
        Ok(value)
    }
}

/// Per-call parse context: byte cursor over the expression, the sample
/// value, and the sticky error flag.
struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    x: f64,
    failed: bool,
}

impl<'a> Parser<'a> {
    fn new(expression: &'a str, x: f64) -> Self {
        Parser {
            bytes: expression.as_bytes(),
            pos: 0,
            x,
            failed: false,
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    fn bump(&mut self) {
        self.pos += 1;
    }

    #[inline]
    fn fail(&mut self) {
        self.failed = true;
    }

    fn skip_spaces(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.bump();
        }
    }

    fn parse_expr(&mut self) -> f64 {
        let mut v = self.parse_term();
        self.skip_spaces();
        while let Some(op @ (b'+' | b'-')) = self.peek() {
            self.bump();
            let rhs = self.parse_term();
            if op == b'+' {
                v += rhs;
            } else {
                v -= rhs;
            }
        }
        v
    }

    fn parse_term(&mut self) -> f64 {
        let mut v = self.parse_factor();
        self.skip_spaces();
        while let Some(op @ (b'*' | b'/')) = self.peek() {
            self.bump();
            let rhs = self.parse_factor();
            if op == b'*' {
                v *= rhs;
            } else if rhs != 0.0 {
                v /= rhs;
            } else {
                v = f64::NAN;
                self.fail();
            }
        }
        v
    }

    fn parse_factor(&mut self) -> f64 {
        self.skip_spaces();
        let mut v = match self.peek() {
            Some(b'(') => {
                self.bump();
                let inner = self.parse_expr();
                self.skip_spaces();
                if self.peek() == Some(b')') {
                    self.bump();
                } else {
                    self.fail();
                }
                inner
            }
            Some(b) if b.is_ascii_digit() || b == b'.' => self.parse_number(),
            // The variable check precedes the identifier branch, so a
            // bare `x` is always the sample value, never a function.
            Some(b'x') => {
                self.bump();
                self.x
            }
            Some(b'-') => {
                self.bump();
                -self.parse_factor()
            }
            Some(b) if b.is_ascii_alphabetic() => self.parse_function_call(),
            _ => {
                self.fail();
                0.0
            }
        };

        // Exponent binds tighter than * and / and is handled right
        // here, once, after the base factor resolves. The recursive
        // call makes chained exponents right-associative.
        self.skip_spaces();
        if self.peek() == Some(b'^') {
            self.bump();
            let exponent = self.parse_factor();
            v = v.powf(exponent);
        }
        v
    }

    /// Parses a numeric literal: longest valid prefix of digits, at
    /// most one decimal point, and an optional exponent part. A
    /// literal with no digits at all consumes nothing and sets the
    /// error flag.
    fn parse_number(&mut self) -> f64 {
        let start = self.pos;
        let mut saw_digit = false;
        let mut saw_dot = false;
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() {
                saw_digit = true;
            } else if b == b'.' && !saw_dot {
                saw_dot = true;
            } else {
                break;
            }
            self.bump();
        }
        if !saw_digit {
            // e.g. a lone "."; consume nothing, like strtod.
            self.pos = start;
            self.fail();
            return 0.0;
        }

        // Exponent part, only if it is actually followed by digits:
        // "1e5" and "1e-5" extend the literal, "2exp(1)" does not.
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mut probe = self.pos + 1;
            if matches!(self.bytes.get(probe), Some(b'+' | b'-')) {
                probe += 1;
            }
            if matches!(self.bytes.get(probe), Some(b) if b.is_ascii_digit()) {
                self.pos = probe;
                while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                    self.bump();
                }
            }
        }

        let token = &self.bytes[start..self.pos];
        // The token is ASCII digits/'.'/'e'/sign by construction.
        match std::str::from_utf8(token).ok().and_then(|t| t.parse().ok()) {
            Some(value) => value,
            None => {
                self.fail();
                0.0
            }
        }
    }

    /// Parses `fname '(' expr ')'`. At most [`MAX_FUNC_NAME_LEN`]
    /// letters are consumed for the name; any further letters are left
    /// in the stream (and will then trip the missing-`(` check).
    fn parse_function_call(&mut self) -> f64 {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphabetic()) {
            if self.pos - start == MAX_FUNC_NAME_LEN {
                break;
            }
            self.bump();
        }
        // The name is ASCII alphabetic by construction.
        let name = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("");

        self.skip_spaces();
        if self.peek() != Some(b'(') {
            self.fail();
            return 0.0;
        }
        self.bump();
        let arg = self.parse_expr();
        self.skip_spaces();
        if self.peek() == Some(b')') {
            self.bump();
        } else {
            self.fail();
        }

        match name {
            "sin" => arg.sin(),
            "cos" => arg.cos(),
            "tan" => arg.tan(),
            "exp" => arg.exp(),
            "log" => arg.ln(),
            "abs" => arg.abs(),
            "sqrt" => arg.sqrt(),
            _ => {
                self.fail();
                0.0
            }
        }
    }
}
