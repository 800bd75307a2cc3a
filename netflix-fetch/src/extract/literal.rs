//! Restricted interpreter for inline state scripts.
//!
//! Understands exactly one statement form, `<path> = <expression>;`, where
//! the path is rooted at one of the namespaces of the tree and the expression
//! is a literal, a path reference, or `a || b` of those. Nothing is executed.
//! Any other construct is an error that stops the current script; assignments
//! made before it are kept.

use serde_json::{Map, Number, Value};
use thiserror::Error;

use super::is_truthy;

/// Largest array an index assignment may grow.
const MAX_ARRAY_LEN: usize = 10_000;

/// Interpretation stopped at an unsupported or malformed construct.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {position}")]
pub struct LiteralError {
    /// Character offset into the script.
    pub position: usize,
    /// What went wrong.
    pub message: String,
}

/// Runs a script against the namespace roots in `tree`.
///
/// Returns the number of assignments applied.
pub(crate) fn interpret(source: &str, tree: &mut Map<String, Value>) -> Result<usize, LiteralError> {
    Interpreter {
        chars: source.chars().collect(),
        pos: 0,
        tree,
    }
    .run()
}

// ============================================================================
// Syntax
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    fn key(&self) -> String {
        match self {
            Self::Key(key) => key.clone(),
            Self::Index(index) => index.to_string(),
        }
    }
}

/// Operand of an `||` chain. Path reads are deferred so short-circuited
/// references are never evaluated.
enum Operand {
    /// `None` is `undefined`.
    Value(Option<Value>),
    Path(Vec<Segment>, usize),
}

struct Interpreter<'t> {
    chars: Vec<char>,
    pos: usize,
    tree: &'t mut Map<String, Value>,
}

impl Interpreter<'_> {
    fn run(mut self) -> Result<usize, LiteralError> {
        let mut applied = 0;
        loop {
            self.skip_trivia();
            if self.at_end() {
                return Ok(applied);
            }
            if self.eat(';') {
                continue;
            }

            let start = self.pos;
            let path = self.parse_path()?;
            self.skip_trivia();
            if !self.eat('=') || self.peek() == Some('=') {
                return Err(self.error("expected assignment"));
            }
            let value = self.parse_expression()?;
            self.assign(&path, value, start)?;
            applied += 1;

            let newline = self.skip_trivia();
            if !(self.eat(';') || self.at_end() || newline) {
                return Err(self.error("expected end of statement"));
            }
        }
    }

    // ------------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------------

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        self.skip_trivia();
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{expected}'")))
        }
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            position: self.pos,
            message: message.into(),
        }
    }

    /// Skips whitespace and comments. Returns true if a line break was crossed.
    fn skip_trivia(&mut self) -> bool {
        let mut newline = false;
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' || c == '\u{2028}' || c == '\u{2029}' {
                newline = true;
                self.pos += 1;
            } else if c.is_whitespace() {
                self.pos += 1;
            } else if c == '/' && self.peek_at(1) == Some('/') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.pos += 1;
                }
            } else if c == '/' && self.peek_at(1) == Some('*') {
                self.pos += 2;
                while !self.at_end() && !(self.peek() == Some('*') && self.peek_at(1) == Some('/')) {
                    if self.peek() == Some('\n') {
                        newline = true;
                    }
                    self.pos += 1;
                }
                self.pos = (self.pos + 2).min(self.chars.len());
            } else {
                break;
            }
        }
        newline
    }

    // ------------------------------------------------------------------------
    // Paths
    // ------------------------------------------------------------------------

    fn parse_identifier(&mut self) -> Option<String> {
        let first = self.peek()?;
        if !(first.is_alphabetic() || first == '_' || first == '$') {
            return None;
        }
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.pos += 1;
        }
        Some(self.chars[start..self.pos].iter().collect())
    }

    fn parse_path(&mut self) -> Result<Vec<Segment>, LiteralError> {
        let root = self
            .parse_identifier()
            .ok_or_else(|| self.error("expected identifier"))?;
        self.parse_path_tail(vec![Segment::Key(root)])
    }

    fn parse_path_tail(&mut self, mut path: Vec<Segment>) -> Result<Vec<Segment>, LiteralError> {
        loop {
            let save = self.pos;
            self.skip_trivia();
            if self.eat('.') {
                self.skip_trivia();
                let key = self
                    .parse_identifier()
                    .ok_or_else(|| self.error("expected property name"))?;
                path.push(Segment::Key(key));
            } else if self.eat('[') {
                self.skip_trivia();
                let segment = match self.peek() {
                    Some('\'' | '"') => Segment::Key(self.parse_string()?),
                    Some(c) if c.is_ascii_digit() => {
                        let start = self.pos;
                        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                            self.pos += 1;
                        }
                        let digits: String = self.chars[start..self.pos].iter().collect();
                        digits
                            .parse()
                            .map(Segment::Index)
                            .map_err(|_| self.error("index out of range"))?
                    }
                    _ => return Err(self.error("unsupported computed property")),
                };
                self.expect(']')?;
                path.push(segment);
            } else {
                self.pos = save;
                return Ok(path);
            }
        }
    }

    fn lookup(&self, path: &[Segment], position: usize) -> Result<Option<Value>, LiteralError> {
        let fail = |message: String| LiteralError { position, message };
        let Some((Segment::Key(root), rest)) = path.split_first() else {
            return Err(fail("invalid path".to_string()));
        };
        let mut current = match self.tree.get(root) {
            Some(value) => value,
            None => return Err(fail(format!("{root} is not defined"))),
        };
        for (depth, segment) in rest.iter().enumerate() {
            let next = match (current, segment) {
                (Value::Object(map), segment) => map.get(&segment.key()),
                (Value::Array(items), Segment::Index(index)) => items.get(*index),
                (Value::Null, _) => {
                    return Err(fail(format!("cannot read '{}' of null", segment.key())));
                }
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None if depth + 1 == rest.len() => return Ok(None),
                None => {
                    return Err(fail(format!(
                        "cannot read '{}' of undefined",
                        rest[depth + 1].key()
                    )));
                }
            }
        }
        Ok(Some(current.clone()))
    }

    fn assign(&mut self, path: &[Segment], value: Option<Value>, position: usize) -> Result<(), LiteralError> {
        let fail = |message: String| LiteralError { position, message };
        let Some((Segment::Key(root), rest)) = path.split_first() else {
            return Err(fail("invalid assignment target".to_string()));
        };
        let Some(mut current) = self.tree.get_mut(root) else {
            return Err(fail(format!("assignment outside known namespaces: {root}")));
        };
        let Some((last, parents)) = rest.split_last() else {
            return Err(fail(format!("cannot reassign namespace {root}")));
        };

        for segment in parents {
            let next = match (current, segment) {
                (Value::Object(map), segment) => map.get_mut(&segment.key()),
                (Value::Array(items), Segment::Index(index)) => items.get_mut(*index),
                _ => None,
            };
            current = next.ok_or_else(|| {
                fail(format!("cannot set property of undefined '{}'", segment.key()))
            })?;
        }

        match (current, last, value) {
            (Value::Object(map), segment, Some(value)) => {
                map.insert(segment.key(), value);
            }
            (Value::Object(map), segment, None) => {
                map.remove(&segment.key());
            }
            (Value::Array(items), Segment::Index(index), value) => {
                let len = index
                    .checked_add(1)
                    .filter(|len| *len <= MAX_ARRAY_LEN)
                    .ok_or_else(|| fail(format!("sparse array assignment at index {index}")))?;
                if items.len() < len {
                    items.resize(len, Value::Null);
                }
                items[*index] = value.unwrap_or(Value::Null);
            }
            _ => return Err(fail(format!("cannot set '{}' on a primitive", last.key()))),
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    fn parse_expression(&mut self) -> Result<Option<Value>, LiteralError> {
        let mut operands = vec![self.parse_operand()?];
        loop {
            let save = self.pos;
            self.skip_trivia();
            if self.peek() == Some('|') && self.peek_at(1) == Some('|') {
                self.pos += 2;
                operands.push(self.parse_operand()?);
            } else {
                self.pos = save;
                break;
            }
        }

        let mut result = None;
        for operand in operands {
            result = match operand {
                Operand::Value(value) => value,
                Operand::Path(path, position) => self.lookup(&path, position)?,
            };
            if result.as_ref().is_some_and(is_truthy) {
                break;
            }
        }
        Ok(result)
    }

    fn parse_operand(&mut self) -> Result<Operand, LiteralError> {
        self.skip_trivia();
        let start = self.pos;
        let value = match self.peek() {
            Some('{') => Value::Object(self.parse_object()?),
            Some('[') => Value::Array(self.parse_array()?),
            Some('\'' | '"') => Value::String(self.parse_string()?),
            Some(c) if c.is_ascii_digit() || matches!(c, '.' | '-' | '+') => self.parse_number()?,
            Some(_) => {
                let ident = self
                    .parse_identifier()
                    .ok_or_else(|| self.error("unsupported expression"))?;
                match ident.as_str() {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    "null" | "NaN" => Value::Null,
                    "undefined" => return Ok(Operand::Value(None)),
                    _ => {
                        let path = self.parse_path_tail(vec![Segment::Key(ident)])?;
                        return Ok(Operand::Path(path, start));
                    }
                }
            }
            None => return Err(self.error("unexpected end of script")),
        };
        Ok(Operand::Value(Some(value)))
    }

    fn parse_object(&mut self) -> Result<Map<String, Value>, LiteralError> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_trivia();
            if self.eat('}') {
                return Ok(map);
            }
            let key = match self.peek() {
                Some('\'' | '"') => self.parse_string()?,
                Some(c) if c.is_ascii_digit() => match self.parse_number()? {
                    Value::Number(n) => n.to_string(),
                    _ => return Err(self.error("invalid numeric key")),
                },
                _ => self
                    .parse_identifier()
                    .ok_or_else(|| self.error("expected property key"))?,
            };
            self.expect(':')?;
            if let Some(value) = self.parse_expression()? {
                map.insert(key, value);
            }
            self.skip_trivia();
            if !self.eat(',') {
                self.expect('}')?;
                return Ok(map);
            }
        }
    }

    fn parse_array(&mut self) -> Result<Vec<Value>, LiteralError> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat(']') {
                return Ok(items);
            }
            if self.eat(',') {
                items.push(Value::Null);
                continue;
            }
            items.push(self.parse_expression()?.unwrap_or(Value::Null));
            self.skip_trivia();
            if !self.eat(',') {
                self.expect(']')?;
                return Ok(items);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Scalars
    // ------------------------------------------------------------------------

    fn parse_hex(&mut self, digits: usize) -> Result<u32, LiteralError> {
        let mut code = 0;
        for _ in 0..digits {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("invalid hex escape"))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn parse_unicode_escape(&mut self) -> Result<char, LiteralError> {
        if self.eat('{') {
            let mut code: u32 = 0;
            while let Some(digit) = self.peek().and_then(|c| c.to_digit(16)) {
                self.pos += 1;
                code = code
                    .checked_mul(16)
                    .and_then(|c| c.checked_add(digit))
                    .ok_or_else(|| self.error("code point out of range"))?;
            }
            if !self.eat('}') {
                return Err(self.error("unterminated code point escape"));
            }
            return Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
        }

        let high = self.parse_hex(4)?;
        if (0xD800..=0xDBFF).contains(&high)
            && self.peek() == Some('\\')
            && self.peek_at(1) == Some('u')
        {
            let save = self.pos;
            self.pos += 2;
            match self.parse_hex(4) {
                Ok(low) if (0xDC00..=0xDFFF).contains(&low) => {
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    return Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                _ => self.pos = save,
            }
        }
        Ok(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn parse_string(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        let Some(quote) = self.bump() else {
            return Err(self.error("expected string"));
        };
        let mut out = String::new();
        loop {
            let c = self.bump().ok_or(LiteralError {
                position: start,
                message: "unterminated string".to_string(),
            })?;
            match c {
                c if c == quote => return Ok(out),
                '\n' | '\r' => return Err(self.error("line break in string")),
                '\\' => {
                    let escaped = self.bump().ok_or_else(|| self.error("unterminated escape"))?;
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        'b' => out.push('\u{8}'),
                        'f' => out.push('\u{c}'),
                        'v' => out.push('\u{b}'),
                        '0' if !self.peek().is_some_and(|c| c.is_ascii_digit()) => out.push('\0'),
                        'x' => {
                            let code = self.parse_hex(2)?;
                            out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                        }
                        'u' => out.push(self.parse_unicode_escape()?),
                        '\r' => {
                            self.eat('\n');
                        }
                        '\n' | '\u{2028}' | '\u{2029}' => {}
                        other => out.push(other),
                    }
                }
                other => out.push(other),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let negative = match self.peek() {
            Some('-') => {
                self.pos += 1;
                true
            }
            Some('+') => {
                self.pos += 1;
                false
            }
            _ => false,
        };

        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X')) {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            let digits: String = self.chars[digits_start..self.pos].iter().collect();
            let magnitude = i64::from_str_radix(&digits, 16)
                .map_err(|_| LiteralError { position: start, message: "invalid hex number".to_string() })?;
            return Ok(Value::from(if negative { -magnitude } else { magnitude }));
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.eat('.') {
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }

        let text: String = self.chars[start..self.pos].iter().filter(|c| **c != '+').collect();
        let number: f64 = text.parse().map_err(|_| LiteralError {
            position: start,
            message: format!("invalid number '{text}'"),
        })?;
        Ok(number_value(number))
    }
}

/// Converts a parsed number, keeping integers integral.
#[allow(clippy::cast_possible_truncation)]
fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < 9.0e15 {
        Value::from(number as i64)
    } else {
        Number::from_f64(number).map_or(Value::Null, Value::Number)
    }
}

// ============================================================================
// Tests
// ============================================================================
