//! Utility tools exposed to pipelines.

use chrono::Local;

use crate::error::{PipelinrError, Result};

/// Get the current time as a display string.
pub fn current_time() -> String {
    format!("Current Time = {}", Local::now().format("%H:%M:%S"))
}

/// Calculate the result of an arithmetic equation.
///
/// Supports `+ - * /`, parentheses, decimals, and unary minus. Malformed
/// input is an error, not a panic.
pub fn calculator(equation: &str) -> Result<String> {
    let value = eval_expression(equation)?;
    Ok(format!("{} = {}", equation.trim(), value))
}

fn eval_expression(input: &str) -> Result<f64> {
    let mut parser = Parser::new(input);
    let value = parser.expression()?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(PipelinrError::Tool(format!(
            "unexpected character at position {}",
            parser.pos
        )));
    }
    Ok(value)
}

// Recursive-descent parser over ASCII bytes; grammar:
//   expression := term (('+' | '-') term)*
//   term       := factor (('*' | '/') factor)*
//   factor     := '-' factor | '(' expression ')' | number
struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
    }

    fn expression(&mut self) -> Result<f64> {
        let mut value = self.term()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'+') => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(b'-') => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64> {
        let mut value = self.factor()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Some(b'/') => {
                    self.pos += 1;
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return Err(PipelinrError::Tool("division by zero".to_string()));
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> Result<f64> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                Ok(-self.factor()?)
            }
            Some(b'(') => {
                self.pos += 1;
                let value = self.expression()?;
                self.skip_whitespace();
                if self.peek() != Some(b')') {
                    return Err(PipelinrError::Tool("missing closing parenthesis".to_string()));
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == b'.' => self.number(),
            _ => Err(PipelinrError::Tool(format!(
                "unexpected character at position {}",
                self.pos
            ))),
        }
    }

    fn number(&mut self) -> Result<f64> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == b'.') {
            self.pos += 1;
        }

        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| PipelinrError::Tool(format!("invalid number at position {}", start)))
    }
}
