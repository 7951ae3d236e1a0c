//! Rendering a [`Select`] to SQL text.

use std::fmt;

use super::Select;
use super::columns::is_expression;
use super::parts::{ColumnExpr, ColumnSpec, GroupTerm, OrderTerm, TableRef, TableSource};
use crate::dialect::ColumnRef;
use crate::error::QbResult;

impl Select {
    /// Render the statement.
    ///
    /// Every call renders from scratch; nothing is cached between mutations.
    pub fn assemble(&self) -> QbResult<String> {
        if self.tables.is_empty() && !self.unions.is_empty() {
            return self.assemble_union_only();
        }

        let mut sql = String::from("SELECT");
        if self.straight_join && self.dialect.supports_straight_join() {
            sql.push_str(" STRAIGHT_JOIN");
        }
        if self.distinct {
            sql.push_str(" DISTINCT");
        }
        sql.push(' ');
        sql.push_str(&self.render_columns()?);

        if !self.tables.is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&self.render_from_list()?);

            if !self.wheres.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&self.render_where_list());
            }
            if !self.group.is_empty() {
                sql.push_str(" GROUP BY ");
                sql.push_str(&self.render_group()?);
            }
            if !self.having.is_empty() {
                sql.push_str(" HAVING ");
                sql.push_str(&self.having.join(" "));
            }
        }

        self.render_order(&mut sql)?;

        for member in &self.unions {
            sql.push(' ');
            sql.push_str(member.kind.keyword());
            sql.push(' ');
            sql.push_str(&member.target.render()?);
        }

        Ok(self.finish(sql))
    }

    /// No FROM: the members joined by their keywords, with this statement's ORDER BY and
    /// LIMIT applied to the whole union.
    fn assemble_union_only(&self) -> QbResult<String> {
        let mut sql = String::new();
        for (i, member) in self.unions.iter().enumerate() {
            if i > 0 {
                sql.push(' ');
                sql.push_str(member.kind.keyword());
                sql.push(' ');
            }
            sql.push_str(&member.target.render()?);
        }
        self.render_order(&mut sql)?;
        Ok(self.finish(sql))
    }

    fn finish(&self, mut sql: String) -> String {
        self.dialect
            .limit(&mut sql, self.limit_count, self.limit_offset);
        if self.for_update {
            sql = self.dialect.for_update(sql);
        }
        sql
    }

    fn render_columns(&self) -> QbResult<String> {
        if self.columns.is_empty() {
            return Ok("*".to_string());
        }
        let rendered = self
            .columns
            .iter()
            .map(|spec| self.render_column(spec))
            .collect::<QbResult<Vec<_>>>()?;
        Ok(rendered.join(", "))
    }

    pub(crate) fn render_column(&self, spec: &ColumnSpec) -> QbResult<String> {
        match &spec.expr {
            ColumnExpr::Raw(e) => self
                .dialect
                .quote_column_as(ColumnRef::Raw(e), spec.alias.as_deref()),
            ColumnExpr::Ident(name) => {
                let alias = if name == "*" { None } else { spec.alias.as_deref() };
                let column = match spec.correlation.as_deref() {
                    Some(correlation) => ColumnRef::Qualified {
                        correlation,
                        column: name,
                    },
                    None => ColumnRef::Name(name),
                };
                self.dialect.quote_column_as(column, alias)
            }
        }
    }

    /// FROM entries without the `FROM` keyword.
    pub(crate) fn render_from_list(&self) -> QbResult<String> {
        let mut out = String::new();
        for (i, table) in self.tables.iter().enumerate() {
            if i > 0 {
                out.push(' ');
                out.push_str(table.join_type.keyword());
                out.push(' ');
            }
            out.push_str(&self.render_table(table)?);
            if let Some(cond) = table.condition.as_deref().filter(|_| i > 0) {
                out.push_str(" ON ");
                out.push_str(cond);
            }
        }
        Ok(out)
    }

    pub(crate) fn render_table(&self, table: &TableRef) -> QbResult<String> {
        match &table.source {
            TableSource::Name(name) => self.dialect.quote_table_as(
                table.schema.as_deref(),
                name,
                Some(&table.correlation),
            ),
            TableSource::Expr(e) => Ok(format!(
                "{e} AS {}",
                self.dialect.quote_alias(&table.correlation)
            )),
            TableSource::Subquery(select) => Ok(format!(
                "({}) AS {}",
                select.assemble()?,
                self.dialect.quote_alias(&table.correlation)
            )),
        }
    }

    /// WHERE predicates without the `WHERE` keyword.
    pub(crate) fn render_where_list(&self) -> String {
        let mut out = String::new();
        for (i, predicate) in self.wheres.iter().enumerate() {
            if i > 0 {
                out.push(' ');
                out.push_str(predicate.connector.keyword());
                out.push(' ');
            }
            out.push_str(&predicate.text);
        }
        out
    }

    fn render_group(&self) -> QbResult<String> {
        let terms = self
            .group
            .iter()
            .map(|term| match term {
                GroupTerm::Ident(name) => self.dialect.quote_identifier(name),
                GroupTerm::Raw(e) => Ok(e.to_string()),
            })
            .collect::<QbResult<Vec<_>>>()?;
        Ok(terms.join(", "))
    }

    fn render_order(&self, sql: &mut String) -> QbResult<()> {
        if self.order.is_empty() {
            return Ok(());
        }
        let terms = self
            .order
            .iter()
            .map(|term| match term {
                OrderTerm::Raw(e) => Ok(e.to_string()),
                OrderTerm::Term { value, direction } => {
                    let value = if value.parse::<u64>().is_ok() || is_expression(value) {
                        value.clone()
                    } else {
                        self.dialect.quote_identifier(value)?
                    };
                    Ok(format!("{value} {}", direction.keyword()))
                }
            })
            .collect::<QbResult<Vec<_>>>()?;
        sql.push_str(" ORDER BY ");
        sql.push_str(&terms.join(", "));
        Ok(())
    }
}

/// Same text as [`Select::assemble`]. A rendering error is logged at WARN and the
/// statement renders as an empty string.
impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.assemble() {
            Ok(sql) => f.write_str(&sql),
            Err(err) => {
                tracing::warn!(
                    target: "sqlsel.select",
                    error = %err,
                    dialect = self.dialect.name(),
                    "SELECT could not be rendered; substituting an empty string"
                );
                Ok(())
            }
        }
    }
}
