//! Line-oriented token reader
//!
//! Values are whitespace-separated tokens and may span lines. Strings are
//! whole lines: whatever is left of the current line, or the next non-blank
//! line if the current one is used up.

use std::collections::VecDeque;
use std::io::BufRead;

use nom::character::complete::{digit1, one_of};
use nom::combinator::{all_consuming, map_res, opt, recognize};
use nom::number::complete::double;
use nom::{IResult, Parser};

use crate::core::error::{Result, SimError};
use crate::input::FieldSource;

pub struct TokenReader<R> {
    source: R,
    pending: VecDeque<String>,
    line: usize,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            pending: VecDeque::new(),
            line: 0,
        }
    }

    /// Line number of the last line read (1-based)
    pub fn line(&self) -> usize {
        self.line
    }

    /// Load the next non-blank line into `pending`; false at end of input
    fn fill(&mut self) -> Result<bool> {
        let mut buffer = String::new();
        loop {
            buffer.clear();
            if self.source.read_line(&mut buffer)? == 0 {
                return Ok(false);
            }
            self.line += 1;
            if !buffer.trim().is_empty() {
                self.pending
                    .extend(buffer.split_whitespace().map(str::to_string));
                return Ok(true);
            }
        }
    }

    /// Next whitespace-separated token, or `None` at end of input
    pub fn next_token(&mut self) -> Result<Option<String>> {
        if self.pending.is_empty() && !self.fill()? {
            return Ok(None);
        }
        Ok(self.pending.pop_front())
    }

    fn require_token(&mut self, field: &str) -> Result<String> {
        self.next_token()?
            .ok_or_else(|| SimError::UnexpectedEndOfInput(field.to_string()))
    }

    /// Next whole-line string, or `None` at end of input
    pub fn next_line(&mut self) -> Result<Option<String>> {
        if self.pending.is_empty() && !self.fill()? {
            return Ok(None);
        }
        let words: Vec<String> = self.pending.drain(..).collect();
        Ok(Some(words.join(" ")))
    }
}

fn parse_float(token: &str) -> Option<f64> {
    let parsed: IResult<&str, f64> = all_consuming(double).parse(token);
    parsed.ok().map(|(_, value)| value)
}

fn parse_int(token: &str) -> Option<i64> {
    let parsed: IResult<&str, i64> = all_consuming(map_res(
        recognize((opt(one_of("+-")), digit1)),
        |digits: &str| digits.parse::<i64>(),
    ))
    .parse(token);
    match parsed {
        Ok((_, value)) => Some(value),
        // integral floats such as "2.0" are accepted for integer fields
        Err(_) => parse_float(token)
            .filter(|value| value.is_finite() && value.fract() == 0.0)
            .map(|value| value as i64),
    }
}

impl<R: BufRead> FieldSource for TokenReader<R> {
    fn string(&mut self, field: &str) -> Result<String> {
        self.next_line()?
            .ok_or_else(|| SimError::UnexpectedEndOfInput(field.to_string()))
    }

    fn float(&mut self, field: &str) -> Result<f64> {
        let token = self.require_token(field)?;
        parse_float(&token).ok_or_else(|| SimError::MalformedValue {
            field: field.to_string(),
            token,
        })
    }

    fn int(&mut self, field: &str) -> Result<i64> {
        let token = self.require_token(field)?;
        parse_int(&token).ok_or_else(|| SimError::MalformedValue {
            field: field.to_string(),
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{BodyRef, DVec3, Handle};

    fn reader(text: &str) -> TokenReader<&[u8]> {
        TokenReader::new(text.as_bytes())
    }

    #[test]
    fn test_numbers_span_lines() {
        let mut r = reader("1.5\n-2\n\n3e1 4\n");
        assert_eq!(r.vec3("v").unwrap(), DVec3::new(1.5, -2.0, 30.0));
        assert_eq!(r.int("i").unwrap(), 4);
        assert!(matches!(r.float("x"), Err(SimError::UnexpectedEndOfInput(_))));
    }

    #[test]
    fn test_strings_are_whole_lines() {
        let mut r = reader("Entity\nmy space\n7\n");
        assert_eq!(r.string("directive").unwrap(), "Entity");
        assert_eq!(r.string("space").unwrap(), "my space");
        assert_eq!(r.int("n").unwrap(), 7);
    }

    #[test]
    fn test_string_takes_rest_of_line() {
        let mut r = reader("3 group A\n");
        assert_eq!(r.int("n").unwrap(), 3);
        assert_eq!(r.string("group").unwrap(), "group A");
    }

    #[test]
    fn test_malformed_number() {
        let mut r = reader("abc\n");
        match r.float("Density") {
            Err(SimError::MalformedValue { field, token }) => {
                assert_eq!(field, "Density");
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_integral_float_accepted_as_int() {
        let mut r = reader("2.0 2.5\n");
        assert_eq!(r.int("a").unwrap(), 2);
        assert!(r.int("b").is_err());
    }

    #[test]
    fn test_body_refs_and_handles() {
        let mut r = reader("-1 4 -3 -2\n");
        assert_eq!(r.body_ref("b1").unwrap(), BodyRef::World);
        assert_eq!(r.body_ref("b2").unwrap(), BodyRef::Body(Handle(4)));
        assert!(matches!(r.handle("h"), Err(SimError::DanglingHandle(-3))));
        assert!(matches!(r.body_ref("b3"), Err(SimError::DanglingHandle(-2))));
    }
}
