//! Raw SQL expressions.

use std::fmt;

/// A SQL fragment inserted verbatim: no identifier quoting, no value escaping.
///
/// Use it for function calls, computed columns, literal fragments and anything the
/// column classifier would otherwise try to quote.
///
/// ```
/// use sqlsel::Expr;
///
/// let e = Expr::new("COUNT(*)");
/// assert_eq!(e.to_string(), "COUNT(*)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr(String);

impl Expr {
    /// Wrap a SQL fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shorthand for [`Expr::new`].
pub fn expr(sql: impl Into<String>) -> Expr {
    Expr::new(sql)
}
