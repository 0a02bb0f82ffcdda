//! Reader — converts s-expression text into [`Value`] trees.
//!
//! The grammar is small:
//!
//! - `(` and `)` delimit lists
//! - `"..."` strings, with `\"`, `\\`, `\n` and `\t` escapes (other
//!   backslash pairs are kept as written)
//! - `;` starts a comment running to end of line (`;;` in practice)
//! - anything else up to whitespace, a paren, a quote or a comment is a bare
//!   token: integer, float, or symbol
//!
//! # Key design decisions
//!
//! - **Single pass, explicit stack**: `(` pushes an empty list, `)` pops it
//!   into its parent (or into the top-level sequence).
//! - **Nesting cap**: printing, display and drop all recurse over the tree,
//!   so lists nested deeper than [`MAX_DEPTH`] are rejected here with
//!   [`SexpError::NestingTooDeep`] instead of overflowing the stack later.
//! - **Lenient classification**: a bare token only becomes a number when it
//!   has a number's shape. `1.2.3`, `-`, `#t` and `e5` stay symbols. Tokens
//!   with a number's shape but no representable value (`1e999`, integers past
//!   `i64`) fail with [`SexpError::InvalidNumber`] instead of silently
//!   changing type.
//! - **Positions**: errors carry 1-based line/column of the character that
//!   caused them.

use crate::error::{Result, SexpError};
use crate::value::Value;
use std::iter::Peekable;
use std::str::Chars;

/// Deepest list nesting the reader accepts.
pub const MAX_DEPTH: usize = 512;

/// Parse every top-level expression in `text`, in order.
///
/// # Examples
///
/// ```
/// use sexp_core::{parse, Value};
///
/// let values = parse("(width 3) ;; trailing comment\n(height 2)").unwrap();
/// assert_eq!(values.len(), 2);
/// assert_eq!(values[0], Value::tagged("width", [Value::Integer(3)]));
/// ```
pub fn parse(text: &str) -> Result<Vec<Value>> {
    let mut cursor = Cursor::new(text);
    let mut top = Vec::new();
    // Lists still being filled, with the position of their `(`.
    let mut stack: Vec<(Vec<Value>, Position)> = Vec::new();

    while let Some(c) = cursor.peek() {
        let pos = cursor.position();
        match c {
            c if c.is_whitespace() => {
                cursor.bump();
            }
            ';' => cursor.skip_line(),
            '(' => {
                cursor.bump();
                if stack.len() >= MAX_DEPTH {
                    return Err(SexpError::NestingTooDeep {
                        line: pos.line,
                        column: pos.column,
                    });
                }
                stack.push((Vec::new(), pos));
            }
            ')' => {
                cursor.bump();
                let (items, _) = stack.pop().ok_or(SexpError::UnbalancedParen {
                    line: pos.line,
                    column: pos.column,
                })?;
                append(&mut stack, &mut top, Value::List(items));
            }
            '"' => {
                let text = cursor.read_string()?;
                append(&mut stack, &mut top, Value::String(text));
            }
            _ => {
                let token = cursor.read_bare();
                let atom = classify_token(&token, pos)?;
                append(&mut stack, &mut top, atom);
            }
        }
    }

    if let Some((_, open)) = stack.last() {
        return Err(SexpError::UnbalancedParen {
            line: open.line,
            column: open.column,
        });
    }

    Ok(top)
}

/// Parse text that must hold exactly one top-level expression.
pub fn parse_document(text: &str) -> Result<Value> {
    let mut values = parse(text)?;
    match values.len() {
        0 => Err(SexpError::EmptyDocument),
        1 => Ok(values.remove(0)),
        found => Err(SexpError::MultipleTopLevelExpressions { found }),
    }
}

fn append(stack: &mut [(Vec<Value>, Position)], top: &mut Vec<Value>, value: Value) {
    match stack.last_mut() {
        Some((items, _)) => items.push(value),
        None => top.push(value),
    }
}

#[derive(Debug, Clone, Copy)]
struct Position {
    line: usize,
    column: usize,
}

struct Cursor<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    /// Read a quoted string; the cursor sits on the opening quote.
    fn read_string(&mut self) -> Result<String> {
        let open = self.position();
        let unterminated = SexpError::UnterminatedString {
            line: open.line,
            column: open.column,
        };
        self.bump();

        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(unterminated),
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    None => return Err(unterminated),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c @ ('"' | '\\')) => out.push(c),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn read_bare(&mut self) -> String {
        let mut token = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';') {
                break;
            }
            token.push(c);
            self.bump();
        }
        token
    }
}

/// Integer if `[+-]digits`, float if it has a float's shape, else symbol.
fn classify_token(token: &str, pos: Position) -> Result<Value> {
    let invalid = || SexpError::InvalidNumber {
        token: token.to_string(),
        line: pos.line,
        column: pos.column,
    };
    let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);

    if !unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return token.parse::<i64>().map(Value::Integer).map_err(|_| invalid());
    }

    if has_float_shape(unsigned) {
        let x: f64 = token.parse().map_err(|_| invalid())?;
        if !x.is_finite() {
            return Err(invalid());
        }
        return Ok(Value::Float(x));
    }

    Ok(Value::Symbol(token.to_string()))
}

/// `digits [. digits] [e [+-] digits]` with at least one mantissa digit and
/// at least one of the fraction or exponent parts. Sign already stripped.
fn has_float_shape(s: &str) -> bool {
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (mantissa, None),
    };

    if frac_part.is_none() && exponent.is_none() {
        return false;
    }
    if !all_digits(int_part) || !frac_part.is_none_or(all_digits) {
        return false;
    }
    if int_part.is_empty() && frac_part.is_none_or(str::is_empty) {
        return false;
    }
    match exponent {
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && all_digits(exp)
        }
        None => true,
    }
}
