use super::{Dialect, InsertMode, insert_head, set_assignments, target_table};
use crate::error::QbResult;
use crate::select::{Part, Select};

/// PostgreSQL: `"double quoted"` identifiers, `''`-escaped strings, `TRUE`/`FALSE`.
#[derive(Debug, Clone)]
pub struct PostgresDialect {
    auto_quote: bool,
}

impl Default for PostgresDialect {
    fn default() -> Self {
        Self { auto_quote: true }
    }
}

impl PostgresDialect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_quote(mut self, auto_quote: bool) -> Self {
        self.auto_quote = auto_quote;
        self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_symbol(&self) -> char {
        '"'
    }

    fn auto_quote(&self) -> bool {
        self.auto_quote
    }

    fn quote_text(&self, text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }

    fn random_function(&self) -> &'static str {
        "RANDOM()"
    }

    fn insert_from_select(
        &self,
        select: &Select,
        table: &str,
        fields: &[&str],
        mode: InsertMode,
    ) -> QbResult<String> {
        let mut sql = insert_head("INSERT INTO", self, select, table, fields)?;
        if mode == InsertMode::Ignore {
            sql.push_str(" ON CONFLICT DO NOTHING");
        }
        Ok(sql)
    }

    /// `UPDATE t AS a SET col = value, ... [FROM <joined tables>] [WHERE ...]`
    fn update_from_select(&self, select: &Select, table: &str, alias: Option<&str>) -> QbResult<String> {
        let assignments = set_assignments(select)?;
        let alias = alias.filter(|a| !a.is_empty()).unwrap_or(table);

        let mut sql = format!("UPDATE {} SET ", self.quote_table_as(None, table, Some(alias))?);
        let set = assignments
            .iter()
            .map(|(target, value)| format!("{} = {value}", self.quote_alias(target)))
            .collect::<Vec<_>>();
        sql.push_str(&set.join(", "));

        if !select.tables().is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&select.render_from_list()?);
        }
        if !select.predicates().is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&select.render_where_list());
        }
        Ok(sql)
    }

    /// `DELETE FROM t WHERE ctid IN (SELECT corr.ctid FROM ... WHERE ...)`
    fn delete_from_select(&self, select: &Select, correlation: &str) -> QbResult<String> {
        let (schema, table) = target_table(select, correlation)?;
        let mut inner = select.clone();
        inner.reset(Part::Distinct).reset(Part::Columns);
        inner.columns([format!("{correlation}.ctid")], None)?;
        Ok(format!(
            "DELETE FROM {} WHERE ctid IN ({})",
            self.quote_table_as(schema, table, None)?,
            inner.assemble()?
        ))
    }
}
