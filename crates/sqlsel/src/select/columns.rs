//! Heuristic classification of select-list tokens.
//!
//! Tokens are caller-supplied SQL text, so classification sniffs a few shapes instead of
//! parsing: a trailing `AS alias`, a `qualifier.column` pair, or anything containing
//! parentheses (taken as an expression).

use std::sync::OnceLock;

use regex::Regex;

use super::input::{ColumnInput, ColumnSource};
use super::parts::{ColumnExpr, ColumnSpec, Direction};
use crate::error::QbResult;
use crate::expr::Expr;

/// `<expr> AS <alias>`, case-insensitive, greedy on the expression side.
pub(crate) fn alias_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)^(.+)\s+AS\s+(.+)$").expect("invalid built-in alias regex"))
}

fn direction_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)^(.*\W)(ASC|DESC)\b").expect("invalid built-in direction regex")
    })
}

/// Text that contains a parenthesis pair is treated as an expression.
pub(crate) fn is_expression(s: &str) -> bool {
    s.contains('(') && s.contains(')')
}

/// Split a trailing `ASC`/`DESC` off an ORDER BY term.
pub(crate) fn split_direction(term: &str) -> (String, Direction) {
    match direction_re().captures(term) {
        Some(caps) => {
            let direction = if caps[2].eq_ignore_ascii_case("desc") {
                Direction::Desc
            } else {
                Direction::Asc
            };
            (caps[1].trim().to_string(), direction)
        }
        None => (term.trim().to_string(), Direction::Asc),
    }
}

/// Classify every token against `correlation`, dropping empty ones.
pub(crate) fn classify_all<I, C>(columns: I, correlation: Option<&str>) -> QbResult<Vec<ColumnSpec>>
where
    I: IntoIterator<Item = C>,
    C: Into<ColumnInput>,
{
    let mut specs = Vec::new();
    for column in columns {
        if let Some(spec) = classify(column.into(), correlation)? {
            specs.push(spec);
        }
    }
    Ok(specs)
}

/// Classify a single token. `None` means the token was empty.
pub(crate) fn classify(input: ColumnInput, correlation: Option<&str>) -> QbResult<Option<ColumnSpec>> {
    let ColumnInput { source, alias } = input;
    let alias = alias.filter(|a| !a.is_empty());

    let text = match source {
        ColumnSource::Subquery(select) => {
            let sql = select.assemble()?;
            return Ok(Some(ColumnSpec {
                correlation: correlation.map(str::to_string),
                expr: ColumnExpr::Raw(Expr::new(format!("({sql})"))),
                alias,
            }));
        }
        ColumnSource::Raw(expr) => {
            if expr.is_empty() {
                return Ok(None);
            }
            return Ok(Some(ColumnSpec {
                correlation: correlation.map(str::to_string),
                expr: ColumnExpr::Raw(expr),
                alias,
            }));
        }
        ColumnSource::Text(text) => text,
    };

    let text = text.trim().replace('\n', " ");
    if text.is_empty() {
        return Ok(None);
    }

    let (body, alias) = match alias {
        Some(a) => (text, Some(a)),
        None => match alias_re().captures(&text) {
            Some(caps) => (caps[1].trim().to_string(), Some(caps[2].trim().to_string())),
            None => (text.clone(), None),
        },
    };

    if is_expression(&body) {
        return Ok(Some(ColumnSpec {
            correlation: correlation.map(str::to_string),
            expr: ColumnExpr::Raw(Expr::new(body)),
            alias,
        }));
    }

    let (correlation, column) = match body.rsplit_once('.') {
        Some((qualifier, column)) => (Some(qualifier.to_string()), column.to_string()),
        None => (correlation.map(str::to_string), body),
    };

    Ok(Some(ColumnSpec {
        correlation,
        expr: ColumnExpr::Ident(column),
        alias,
    }))
}
