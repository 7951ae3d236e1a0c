//! Identifier splitting and quoting.
//!
//! This module provides [`Ident`], a dotted SQL identifier (`schema.table.column`) split
//! into parts that the active [`Dialect`](crate::Dialect) quotes one by one.
//!
//! - Plain parts may hold any character except `.` and NUL; they are quoted on output.
//! - Parts already wrapped in the dialect's quote symbol are kept as one part, with a
//!   doubled quote symbol standing for a literal one.
//! - A bare `*` part stays unquoted (`"o".*`).
//!
//! # Example
//! ```
//! use sqlsel::ident::Ident;
//!
//! let ident = Ident::parse("sales.orders", '"').unwrap();
//! assert_eq!(ident.to_quoted('"'), r#""sales"."orders""#);
//! ```

use crate::error::{QbError, QbResult};

/// One dot-separated segment of an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// Bare name as the caller wrote it.
    Plain(String),
    /// Name that arrived already quoted (quote symbols stripped, escapes resolved).
    Quoted(String),
    /// The `*` wildcard.
    Wildcard,
}

/// A SQL identifier split on `.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

impl Ident {
    /// Parse an identifier string, treating `quote` as the dialect's quote symbol.
    pub fn parse(s: &str, quote: char) -> QbResult<Self> {
        if s.is_empty() {
            return Err(QbError::InvalidIdentifier("identifier cannot be empty".into()));
        }
        if s.contains('\0') {
            return Err(QbError::InvalidIdentifier(
                "identifier cannot contain NUL character".into(),
            ));
        }

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            if !parts.is_empty() {
                match chars.next() {
                    Some('.') => {
                        if chars.peek().is_none() {
                            return Err(QbError::InvalidIdentifier(format!(
                                "trailing '.' in identifier '{s}'"
                            )));
                        }
                    }
                    Some(c) => {
                        return Err(QbError::InvalidIdentifier(format!(
                            "expected '.' between identifier parts of '{s}', got '{c}'"
                        )));
                    }
                    None => break,
                }
            }

            if chars.peek() == Some(&quote) {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some(c) if c == quote => {
                            if chars.peek() == Some(&quote) {
                                chars.next();
                                name.push(quote);
                            } else {
                                break;
                            }
                        }
                        Some(c) => name.push(c),
                        None => {
                            return Err(QbError::InvalidIdentifier(format!(
                                "unclosed quoted identifier in '{s}'"
                            )));
                        }
                    }
                }
                if name.is_empty() {
                    return Err(QbError::InvalidIdentifier(format!(
                        "empty quoted identifier in '{s}'"
                    )));
                }
                parts.push(IdentPart::Quoted(name));
                continue;
            }

            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                name.push(c);
                chars.next();
            }
            if name.is_empty() {
                return Err(QbError::InvalidIdentifier(format!(
                    "empty identifier segment in '{s}'"
                )));
            }
            if name == "*" {
                parts.push(IdentPart::Wildcard);
            } else {
                parts.push(IdentPart::Plain(name));
            }
        }

        Ok(Self { parts })
    }

    /// Build an identifier from already-separated parts (e.g. correlation + column).
    pub fn from_parts<'a>(parts: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            parts: parts
                .into_iter()
                .map(|p| {
                    if p == "*" {
                        IdentPart::Wildcard
                    } else {
                        IdentPart::Plain(p.to_string())
                    }
                })
                .collect(),
        }
    }

    /// The last part's name, if it is not a wildcard.
    pub fn last_name(&self) -> Option<&str> {
        match self.parts.last()? {
            IdentPart::Plain(s) | IdentPart::Quoted(s) => Some(s),
            IdentPart::Wildcard => None,
        }
    }

    /// Render every part quoted with `quote`.
    pub fn to_quoted(&self, quote: char) -> String {
        let mut out = String::new();
        self.write_sql(&mut out, quote, true);
        out
    }

    /// Write the identifier. With `auto_quote` off, plain parts are written bare;
    /// parts that arrived quoted are always re-quoted.
    pub(crate) fn write_sql(&self, out: &mut String, quote: char, auto_quote: bool) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                IdentPart::Wildcard => out.push('*'),
                IdentPart::Plain(s) if auto_quote => quote_part(out, s, quote),
                IdentPart::Plain(s) => out.push_str(s),
                IdentPart::Quoted(s) => quote_part(out, s, quote),
            }
        }
    }
}

pub(crate) fn quote_part(out: &mut String, name: &str, quote: char) {
    out.push(quote);
    for ch in name.chars() {
        if ch == quote {
            out.push(quote);
            out.push(quote);
        } else {
            out.push(ch);
        }
    }
    out.push(quote);
}
