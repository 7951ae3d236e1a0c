//! Literal values substituted into condition templates.
//!
//! `where`/`having` templates such as `"status = ?"` are filled in by
//! [`Dialect::quote_into`](crate::Dialect::quote_into), which renders a [`SqlValue`]
//! as an escaped SQL literal. An optional [`ValueType`] casts the value first.

use crate::expr::Expr;

/// A value that can be rendered as a SQL literal.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Rendered as a comma-separated list (for `IN (?)`).
    List(Vec<SqlValue>),
    /// Inserted verbatim.
    Expr(Expr),
}

/// Cast applied to a value before quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Int,
    Float,
    Text,
    Bool,
}

impl SqlValue {
    /// Cast into `ty`. Raw expressions and NULL pass through unchanged.
    pub fn cast(self, ty: ValueType) -> SqlValue {
        match (self, ty) {
            (v @ (SqlValue::Null | SqlValue::Expr(_)), _) => v,
            (SqlValue::List(items), ty) => {
                SqlValue::List(items.into_iter().map(|v| v.cast(ty)).collect())
            }

            (SqlValue::Bool(b), ValueType::Int) => SqlValue::Int(i64::from(b)),
            (SqlValue::Int(i), ValueType::Int) => SqlValue::Int(i),
            (SqlValue::Float(f), ValueType::Int) => SqlValue::Int(f.trunc() as i64),
            (SqlValue::Text(s), ValueType::Int) => SqlValue::Int(leading_int(&s)),

            (SqlValue::Bool(b), ValueType::Float) => SqlValue::Float(if b { 1.0 } else { 0.0 }),
            (SqlValue::Int(i), ValueType::Float) => SqlValue::Float(i as f64),
            (SqlValue::Float(f), ValueType::Float) => SqlValue::Float(f),
            (SqlValue::Text(s), ValueType::Float) => SqlValue::Float(leading_float(&s)),

            (SqlValue::Bool(b), ValueType::Text) => SqlValue::Text(if b { "1" } else { "0" }.into()),
            (SqlValue::Int(i), ValueType::Text) => SqlValue::Text(i.to_string()),
            (SqlValue::Float(f), ValueType::Text) => SqlValue::Text(f.to_string()),
            (SqlValue::Text(s), ValueType::Text) => SqlValue::Text(s),

            (SqlValue::Bool(b), ValueType::Bool) => SqlValue::Bool(b),
            (SqlValue::Int(i), ValueType::Bool) => SqlValue::Bool(i != 0),
            (SqlValue::Float(f), ValueType::Bool) => SqlValue::Bool(f != 0.0),
            (SqlValue::Text(s), ValueType::Bool) => {
                SqlValue::Bool(!(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false")))
            }
        }
    }
}

/// Integer prefix of `s` (after leading whitespace), `0` when there is none.
fn leading_int(s: &str) -> i64 {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return 0;
    }
    let negative = bytes.first() == Some(&b'-');
    t[..end]
        .parse()
        .unwrap_or(if negative { i64::MIN } else { i64::MAX })
}

/// Floating point prefix of `s` (after leading whitespace), `0.0` when there is none.
fn leading_float(s: &str) -> f64 {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut saw_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        saw_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac = end + 1;
        while frac < bytes.len() && bytes[frac].is_ascii_digit() {
            frac += 1;
            saw_digit = true;
        }
        end = frac;
    }
    if !saw_digit {
        return 0.0;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_digits = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_digits {
            end = exp;
        }
    }
    t[..end].parse().unwrap_or(0.0)
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for SqlValue {
            fn from(v: $t) -> Self {
                SqlValue::Int(i64::from(v))
            }
        })*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::Float(f64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&String> for SqlValue {
    fn from(v: &String) -> Self {
        SqlValue::Text(v.clone())
    }
}

impl From<Expr> for SqlValue {
    fn from(v: Expr) -> Self {
        SqlValue::Expr(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

impl<T: Into<SqlValue>> From<Vec<T>> for SqlValue {
    fn from(v: Vec<T>) -> Self {
        SqlValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SqlValue> + Clone> From<&[T]> for SqlValue {
    fn from(v: &[T]) -> Self {
        SqlValue::List(v.iter().cloned().map(Into::into).collect())
    }
}

impl From<uuid::Uuid> for SqlValue {
    fn from(v: uuid::Uuid) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<chrono::NaiveDate> for SqlValue {
    fn from(v: chrono::NaiveDate) -> Self {
        SqlValue::Text(v.format("%Y-%m-%d").to_string())
    }
}

impl From<chrono::NaiveDateTime> for SqlValue {
    fn from(v: chrono::NaiveDateTime) -> Self {
        SqlValue::Text(v.format("%Y-%m-%d %H:%M:%S%.f").to_string())
    }
}

impl<Tz: chrono::TimeZone> From<chrono::DateTime<Tz>> for SqlValue
where
    Tz::Offset: std::fmt::Display,
{
    fn from(v: chrono::DateTime<Tz>) -> Self {
        SqlValue::Text(v.to_rfc3339())
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => SqlValue::Int(i),
                None => SqlValue::Float(n.as_f64().unwrap_or(0.0)),
            },
            Value::String(s) => SqlValue::Text(s),
            Value::Array(items) => SqlValue::List(items.into_iter().map(Into::into).collect()),
            obj @ Value::Object(_) => SqlValue::Text(obj.to_string()),
        }
    }
}
