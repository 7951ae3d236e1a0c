//! SQL dialects: identifier and value quoting, LIMIT / FOR UPDATE syntax, and DML derived
//! from a SELECT.
//!
//! A [`Select`] holds an `Arc<dyn Dialect>` and asks it for everything that differs
//! between databases. Two dialects ship with the crate: [`PostgresDialect`] (the default)
//! and [`MySqlDialect`].

mod mysql;
mod postgres;

use std::fmt;

pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;

use crate::error::{QbError, QbResult};
use crate::expr::Expr;
use crate::ident::{self, Ident};
use crate::select::{ColumnExpr, ColumnInput, JoinType, Select, TableSource};
use crate::value::{SqlValue, ValueType};

/// Column argument for [`Dialect::quote_column_as`].
#[derive(Debug, Clone, Copy)]
pub enum ColumnRef<'a> {
    /// Possibly dotted identifier.
    Name(&'a str),
    Qualified {
        correlation: &'a str,
        column: &'a str,
    },
    Raw(&'a Expr),
}

/// Conflict handling for [`Dialect::insert_from_select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertMode {
    #[default]
    Plain,
    /// Skip rows that violate a unique constraint.
    Ignore,
}

/// Database-specific formatting used by [`Select`].
pub trait Dialect: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Character that delimits quoted identifiers.
    fn quote_symbol(&self) -> char;

    /// Whether plain identifiers are quoted on output.
    fn auto_quote(&self) -> bool;

    /// Render `text` as a complete string literal, quotes included.
    fn quote_text(&self, text: &str) -> String;

    fn bool_literal(&self, value: bool) -> &'static str;

    /// Function used by [`Dialect::order_rand`].
    fn random_function(&self) -> &'static str;

    fn supports_straight_join(&self) -> bool {
        false
    }

    fn quote_identifier(&self, name: &str) -> QbResult<String> {
        let ident = Ident::parse(name, self.quote_symbol())?;
        let mut out = String::new();
        ident.write_sql(&mut out, self.quote_symbol(), self.auto_quote());
        Ok(out)
    }

    /// Quote a correlation name or column alias as a single part.
    fn quote_alias(&self, alias: &str) -> String {
        if self.auto_quote() {
            let mut out = String::with_capacity(alias.len() + 2);
            ident::quote_part(&mut out, alias, self.quote_symbol());
            out
        } else {
            alias.to_string()
        }
    }

    fn quote_value(&self, value: &SqlValue) -> String {
        match value {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Bool(b) => self.bool_literal(*b).to_string(),
            SqlValue::Int(i) => i.to_string(),
            SqlValue::Float(f) if f.is_finite() => f.to_string(),
            SqlValue::Float(f) => self.quote_text(&f.to_string()),
            SqlValue::Text(s) => self.quote_text(s),
            SqlValue::List(items) => items
                .iter()
                .map(|v| self.quote_value(v))
                .collect::<Vec<_>>()
                .join(", "),
            SqlValue::Expr(e) => e.to_string(),
        }
    }

    /// Replace every `?` in `template` with the quoted value, cast to `ty` first when given.
    fn quote_into(&self, template: &str, value: SqlValue, ty: Option<ValueType>) -> String {
        let value = match ty {
            Some(ty) => value.cast(ty),
            None => value,
        };
        template.replace('?', &self.quote_value(&value))
    }

    /// `column [AS alias]`; the alias is omitted when it equals the column name.
    fn quote_column_as(&self, column: ColumnRef<'_>, alias: Option<&str>) -> QbResult<String> {
        let (mut sql, name) = match column {
            ColumnRef::Raw(expr) => (expr.to_string(), None),
            ColumnRef::Name(name) => {
                let ident = Ident::parse(name, self.quote_symbol())?;
                let mut out = String::new();
                ident.write_sql(&mut out, self.quote_symbol(), self.auto_quote());
                (out, ident.last_name().map(str::to_string))
            }
            ColumnRef::Qualified { correlation, column } => {
                let mut ident = Ident::parse(correlation, self.quote_symbol())?;
                let col = Ident::parse(column, self.quote_symbol())?;
                let name = col.last_name().map(str::to_string);
                ident.parts.extend(col.parts);
                let mut out = String::new();
                ident.write_sql(&mut out, self.quote_symbol(), self.auto_quote());
                (out, name)
            }
        };
        if let Some(alias) = alias.filter(|a| !a.is_empty()) {
            if name.as_deref() != Some(alias) {
                sql.push_str(" AS ");
                sql.push_str(&self.quote_alias(alias));
            }
        }
        Ok(sql)
    }

    /// `[schema.]table [AS alias]`; the alias is omitted when it equals the table name.
    fn quote_table_as(&self, schema: Option<&str>, table: &str, alias: Option<&str>) -> QbResult<String> {
        let mut sql = String::new();
        if let Some(schema) = schema {
            sql.push_str(&self.quote_identifier(schema)?);
            sql.push('.');
        }
        sql.push_str(&self.quote_identifier(table)?);
        if let Some(alias) = alias.filter(|a| !a.is_empty() && *a != table) {
            sql.push_str(" AS ");
            sql.push_str(&self.quote_alias(alias));
        }
        Ok(sql)
    }

    /// Append LIMIT / OFFSET. A zero offset is never rendered.
    fn limit(&self, sql: &mut String, count: Option<u64>, offset: Option<u64>) {
        if let Some(count) = count {
            sql.push_str(&format!(" LIMIT {count}"));
        }
        if let Some(offset) = offset.filter(|o| *o > 0) {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
    }

    fn for_update(&self, sql: String) -> String {
        sql + " FOR UPDATE"
    }

    /// Order `select` randomly. With a `field`, the random value is also selected under
    /// that name and ordered by it.
    fn order_rand(&self, select: &mut Select, field: Option<&str>) -> QbResult<()> {
        let rand = Expr::new(self.random_function());
        match field.filter(|f| !f.is_empty()) {
            None => {
                select.order([rand]);
            }
            Some(field) => {
                select.columns([ColumnInput::aliased(field, rand)], None)?;
                select.order([Expr::new(self.quote_alias(field))]);
            }
        }
        Ok(())
    }

    /// `INSERT INTO table (fields) <select>`.
    fn insert_from_select(
        &self,
        select: &Select,
        table: &str,
        fields: &[&str],
        mode: InsertMode,
    ) -> QbResult<String> {
        if mode == InsertMode::Ignore {
            return Err(QbError::unsupported(self.name(), "INSERT ... IGNORE"));
        }
        insert_head("INSERT INTO", self, select, table, fields)
    }

    /// UPDATE `table` from the columns, joins and WHERE clause of `select`.
    fn update_from_select(&self, select: &Select, table: &str, alias: Option<&str>) -> QbResult<String>;

    /// DELETE the rows of the table registered as `correlation` that `select` matches.
    fn delete_from_select(&self, select: &Select, correlation: &str) -> QbResult<String>;
}

/// `<head> table (fields) <select>`, shared by the dialects.
pub(crate) fn insert_head<D: Dialect + ?Sized>(
    head: &str,
    dialect: &D,
    select: &Select,
    table: &str,
    fields: &[&str],
) -> QbResult<String> {
    let mut sql = format!("{head} {}", dialect.quote_identifier(table)?);
    if !fields.is_empty() {
        let quoted = fields
            .iter()
            .map(|f| dialect.quote_identifier(f))
            .collect::<QbResult<Vec<_>>>()?;
        sql.push_str(&format!(" ({})", quoted.join(", ")));
    }
    sql.push(' ');
    sql.push_str(&select.assemble()?);
    Ok(sql)
}

/// `(target, value)` pairs for UPDATE ... SET built from the select list.
pub(crate) fn set_assignments(select: &Select) -> QbResult<Vec<(String, String)>> {
    let specs = select.column_specs();
    if specs.is_empty() {
        return Err(QbError::validation(
            "update from select requires at least one column",
        ));
    }
    let dialect = select.dialect();
    specs
        .iter()
        .map(|spec| {
            let target = match (&spec.alias, &spec.expr) {
                (Some(alias), _) => alias.clone(),
                (None, ColumnExpr::Ident(name)) if name != "*" => name.clone(),
                (None, ColumnExpr::Ident(_)) => {
                    return Err(QbError::validation("cannot assign from a wildcard column"));
                }
                (None, ColumnExpr::Raw(e)) => {
                    return Err(QbError::validation(format!(
                        "expression column '{e}' needs an alias to be used as an assignment"
                    )));
                }
            };
            let value = match (&spec.expr, spec.correlation.as_deref()) {
                (ColumnExpr::Raw(e), _) => e.to_string(),
                (ColumnExpr::Ident(name), Some(correlation)) => dialect.quote_column_as(
                    ColumnRef::Qualified {
                        correlation,
                        column: name,
                    },
                    None,
                )?,
                (ColumnExpr::Ident(name), None) => dialect.quote_identifier(name)?,
            };
            Ok((target, value))
        })
        .collect()
}

/// The physical table registered under `correlation`.
pub(crate) fn target_table<'a>(select: &'a Select, correlation: &str) -> QbResult<(Option<&'a str>, &'a str)> {
    let table = select
        .table(correlation)
        .ok_or_else(|| QbError::UnknownCorrelation(correlation.to_string()))?;
    match &table.source {
        TableSource::Name(name) => Ok((table.schema.as_deref(), name)),
        TableSource::Expr(_) | TableSource::Subquery(_) => Err(QbError::validation(format!(
            "'{correlation}' is not a physical table"
        ))),
    }
}

/// JOIN keyword used when a FROM entry is re-expressed as a join of an UPDATE.
pub(crate) fn update_join_keyword(join_type: JoinType) -> &'static str {
    match join_type {
        JoinType::None => JoinType::Inner.keyword(),
        other => other.keyword(),
    }
}
