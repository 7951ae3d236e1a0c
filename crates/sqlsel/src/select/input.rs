//! Conversion types accepted by the [`Select`] mutators.
//!
//! Strings, [`Expr`] values and nested statements convert into these with `From`, so
//! call sites can mix them freely:
//!
//! ```
//! use sqlsel::{expr, ColumnInput, Select, TableInput};
//!
//! let mut s = Select::new();
//! s.from(TableInput::aliased("o", "orders"), ["id", "total"]).unwrap();
//! s.columns([ColumnInput::aliased("n", expr("COUNT(*)"))], None).unwrap();
//! ```

use super::Select;
use super::columns::alias_re;
use super::parts::TableSource;
use crate::expr::Expr;

/// A table for `from` / `join*`, with optional explicit correlation name and schema.
#[derive(Debug, Clone, Default)]
pub struct TableInput {
    pub(crate) source: Option<TableSource>,
    pub(crate) correlation: Option<String>,
    pub(crate) schema: Option<String>,
}

/// A table input after alias and schema extraction.
pub(crate) struct ResolvedTable {
    pub source: TableSource,
    pub correlation: Option<String>,
    pub schema: Option<String>,
}

impl TableInput {
    /// No table: `from(TableInput::none(), cols)` selects expressions without FROM.
    pub fn none() -> Self {
        Self::default()
    }

    /// Register `table` under an explicit correlation name.
    pub fn aliased(correlation: impl Into<String>, table: impl Into<TableInput>) -> Self {
        let mut input = table.into();
        input.correlation = Some(correlation.into());
        input
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        match &self.source {
            None => true,
            Some(TableSource::Name(name)) => name.trim().is_empty(),
            Some(TableSource::Expr(e)) => e.as_str().trim().is_empty(),
            Some(TableSource::Subquery(_)) => false,
        }
    }

    /// Split `"name AS alias"` and `"schema.name"`. Returns `None` for an empty input.
    pub(crate) fn resolve(self) -> Option<ResolvedTable> {
        if self.is_empty() {
            return None;
        }
        let Self {
            source,
            mut correlation,
            mut schema,
        } = self;

        let source = match source? {
            TableSource::Name(raw) => {
                let mut name = raw.trim().to_string();
                if correlation.is_none() {
                    let split = alias_re()
                        .captures(&name)
                        .map(|caps| (caps[1].trim().to_string(), caps[2].trim().to_string()));
                    if let Some((table, alias)) = split {
                        name = table;
                        correlation = Some(alias);
                    }
                }
                if schema.is_none() {
                    let split = name
                        .split_once('.')
                        .map(|(s, t)| (s.to_string(), t.to_string()));
                    if let Some((s, t)) = split {
                        schema = Some(s);
                        name = t;
                    }
                }
                TableSource::Name(name)
            }
            other => other,
        };

        Some(ResolvedTable {
            source,
            correlation: correlation.filter(|c| !c.is_empty()),
            schema: schema.filter(|s| !s.is_empty()),
        })
    }
}

impl ResolvedTable {
    /// Base for an automatically generated correlation name.
    pub fn base_name(&self) -> &str {
        match &self.source {
            TableSource::Name(name) => name,
            TableSource::Expr(_) | TableSource::Subquery(_) => "t",
        }
    }

    pub fn display_name(&self) -> String {
        match &self.source {
            TableSource::Name(name) => name.clone(),
            TableSource::Expr(e) => e.to_string(),
            TableSource::Subquery(_) => "(subquery)".to_string(),
        }
    }
}

impl From<&str> for TableInput {
    fn from(name: &str) -> Self {
        TableInput {
            source: Some(TableSource::Name(name.to_string())),
            ..Default::default()
        }
    }
}

impl From<String> for TableInput {
    fn from(name: String) -> Self {
        TableInput {
            source: Some(TableSource::Name(name)),
            ..Default::default()
        }
    }
}

impl From<&String> for TableInput {
    fn from(name: &String) -> Self {
        TableInput::from(name.as_str())
    }
}

impl From<Expr> for TableInput {
    fn from(expr: Expr) -> Self {
        TableInput {
            source: Some(TableSource::Expr(expr)),
            ..Default::default()
        }
    }
}

impl From<Select> for TableInput {
    fn from(select: Select) -> Self {
        TableInput {
            source: Some(TableSource::Subquery(Box::new(select))),
            ..Default::default()
        }
    }
}

impl From<&Select> for TableInput {
    fn from(select: &Select) -> Self {
        TableInput::from(select.clone())
    }
}

/// Raw column token before classification.
#[derive(Debug, Clone)]
pub enum ColumnSource {
    Text(String),
    Raw(Expr),
    Subquery(Box<Select>),
}

/// A select-list entry with an optional explicit alias.
#[derive(Debug, Clone)]
pub struct ColumnInput {
    pub(crate) source: ColumnSource,
    pub(crate) alias: Option<String>,
}

impl ColumnInput {
    pub fn aliased(alias: impl Into<String>, column: impl Into<ColumnInput>) -> Self {
        let mut input = column.into();
        input.alias = Some(alias.into());
        input
    }
}

impl From<&str> for ColumnInput {
    fn from(s: &str) -> Self {
        ColumnInput {
            source: ColumnSource::Text(s.to_string()),
            alias: None,
        }
    }
}

impl From<String> for ColumnInput {
    fn from(s: String) -> Self {
        ColumnInput {
            source: ColumnSource::Text(s),
            alias: None,
        }
    }
}

impl From<&String> for ColumnInput {
    fn from(s: &String) -> Self {
        ColumnInput::from(s.as_str())
    }
}

impl From<Expr> for ColumnInput {
    fn from(e: Expr) -> Self {
        ColumnInput {
            source: ColumnSource::Raw(e),
            alias: None,
        }
    }
}

impl From<Select> for ColumnInput {
    fn from(select: Select) -> Self {
        ColumnInput {
            source: ColumnSource::Subquery(Box::new(select)),
            alias: None,
        }
    }
}

impl From<&Select> for ColumnInput {
    fn from(select: &Select) -> Self {
        ColumnInput::from(select.clone())
    }
}

/// `None` entries are dropped, which keeps sparse column lists easy to build.
impl<T: Into<ColumnInput>> From<Option<T>> for ColumnInput {
    fn from(opt: Option<T>) -> Self {
        opt.map_or_else(|| ColumnInput::from(""), Into::into)
    }
}

/// A GROUP BY or ORDER BY term.
#[derive(Debug, Clone)]
pub enum TermInput {
    Text(String),
    Raw(Expr),
}

impl From<&str> for TermInput {
    fn from(s: &str) -> Self {
        TermInput::Text(s.to_string())
    }
}

impl From<String> for TermInput {
    fn from(s: String) -> Self {
        TermInput::Text(s)
    }
}

impl From<&String> for TermInput {
    fn from(s: &String) -> Self {
        TermInput::Text(s.clone())
    }
}

impl From<Expr> for TermInput {
    fn from(e: Expr) -> Self {
        TermInput::Raw(e)
    }
}
