use super::{Dialect, InsertMode, insert_head, set_assignments, update_join_keyword};
use crate::error::{QbError, QbResult};
use crate::select::Select;

/// MySQL / MariaDB: `` `backtick` `` identifiers, backslash-escaped strings, `STRAIGHT_JOIN`.
#[derive(Debug, Clone)]
pub struct MySqlDialect {
    auto_quote: bool,
}

impl Default for MySqlDialect {
    fn default() -> Self {
        Self { auto_quote: true }
    }
}

impl MySqlDialect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_quote(mut self, auto_quote: bool) -> Self {
        self.auto_quote = auto_quote;
        self
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_symbol(&self) -> char {
        '`'
    }

    fn auto_quote(&self) -> bool {
        self.auto_quote
    }

    fn quote_text(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 2);
        out.push('\'');
        for ch in text.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                '"' => out.push_str("\\\""),
                '\0' => out.push_str("\\0"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\x1a' => out.push_str("\\Z"),
                c => out.push(c),
            }
        }
        out.push('\'');
        out
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn random_function(&self) -> &'static str {
        "RAND()"
    }

    fn supports_straight_join(&self) -> bool {
        true
    }

    /// MySQL has no offset-only form; the largest row count stands in.
    fn limit(&self, sql: &mut String, count: Option<u64>, offset: Option<u64>) {
        let offset = offset.filter(|o| *o > 0);
        match (count, offset) {
            (Some(count), Some(offset)) => sql.push_str(&format!(" LIMIT {count} OFFSET {offset}")),
            (Some(count), None) => sql.push_str(&format!(" LIMIT {count}")),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT {} OFFSET {offset}", u64::MAX)),
            (None, None) => {}
        }
    }

    fn insert_from_select(
        &self,
        select: &Select,
        table: &str,
        fields: &[&str],
        mode: InsertMode,
    ) -> QbResult<String> {
        let head = match mode {
            InsertMode::Plain => "INSERT INTO",
            InsertMode::Ignore => "INSERT IGNORE INTO",
        };
        insert_head(head, self, select, table, fields)
    }

    /// `UPDATE t AS a INNER JOIN ... SET a.col = value, ... [WHERE ...]`
    fn update_from_select(&self, select: &Select, table: &str, alias: Option<&str>) -> QbResult<String> {
        let assignments = set_assignments(select)?;
        let alias = alias.filter(|a| !a.is_empty()).unwrap_or(table);

        let mut sql = format!("UPDATE {}", self.quote_table_as(None, table, Some(alias))?);
        for t in select.tables() {
            sql.push(' ');
            sql.push_str(update_join_keyword(t.join_type));
            sql.push(' ');
            sql.push_str(&select.render_table(t)?);
            if let Some(cond) = &t.condition {
                sql.push_str(" ON ");
                sql.push_str(cond);
            }
        }

        let qualifier = self.quote_alias(alias);
        let set = assignments
            .iter()
            .map(|(target, value)| format!("{qualifier}.{} = {value}", self.quote_alias(target)))
            .collect::<Vec<_>>();
        sql.push_str(" SET ");
        sql.push_str(&set.join(", "));

        if !select.predicates().is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&select.render_where_list());
        }
        Ok(sql)
    }

    /// `DELETE corr FROM <tables> [WHERE ...]`
    fn delete_from_select(&self, select: &Select, correlation: &str) -> QbResult<String> {
        if !select.has_table(correlation) {
            return Err(QbError::UnknownCorrelation(correlation.to_string()));
        }
        let mut sql = format!(
            "DELETE {} FROM {}",
            self.quote_alias(correlation),
            select.render_from_list()?
        );
        if !select.predicates().is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&select.render_where_list());
        }
        Ok(sql)
    }
}
