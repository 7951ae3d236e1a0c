//! The `Select` statement builder.
//!
//! A [`Select`] accumulates the parts of a SELECT statement through `&mut self` mutators
//! and renders them on demand with [`Select::assemble`] (or `to_string()`).
//!
//! # Example
//! ```
//! use sqlsel::Select;
//!
//! let mut s = Select::new();
//! s.from("orders AS o", ["id", "total"]).unwrap()
//!     .join_left("customers AS c", "c.id = o.customer_id", ["name"]).unwrap()
//!     .and_where_value("o.status = ?", "paid")
//!     .order(["o.created_at DESC"])
//!     .limit(20, 40);
//!
//! assert_eq!(
//!     s.assemble().unwrap(),
//!     r#"SELECT "o"."id", "o"."total", "c"."name" FROM "orders" AS "o" LEFT JOIN "customers" AS "c" ON c.id = o.customer_id WHERE (o.status = 'paid') ORDER BY "o"."created_at" DESC LIMIT 20 OFFSET 40"#
//! );
//! ```

mod columns;
mod exec;
mod input;
mod parts;
mod prune;
mod render;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::config::SelectConfig;
use crate::dialect::Dialect;
use crate::error::{QbError, QbResult};
use crate::expr::Expr;
use crate::value::{SqlValue, ValueType};

use columns::{classify_all, is_expression, split_direction};
use input::ResolvedTable;

pub use input::{ColumnInput, ColumnSource, TableInput, TermInput};
pub use parts::{
    ColumnExpr, ColumnSpec, Connector, Direction, GroupTerm, JoinType, OrderTerm, Part, PartValue,
    Predicate, TableRef, TableSource, UnionKind, UnionMember, UnionTarget,
};

/// Empty column list for joins that select nothing from the joined table.
pub const NO_COLUMNS: [&str; 0] = [];

/// A SELECT statement under construction.
#[derive(Debug, Clone)]
pub struct Select {
    dialect: Arc<dyn Dialect>,
    straight_join: bool,
    distinct: bool,
    columns: Vec<ColumnSpec>,
    unions: Vec<UnionMember>,
    tables: Vec<TableRef>,
    wheres: Vec<Predicate>,
    group: Vec<GroupTerm>,
    having: Vec<String>,
    order: Vec<OrderTerm>,
    limit_count: Option<u64>,
    limit_offset: Option<u64>,
    for_update: bool,
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}

impl Select {
    /// Empty statement rendered for PostgreSQL with auto-quoting.
    pub fn new() -> Self {
        Self::with_config(&SelectConfig::default())
    }

    pub fn with_config(config: &SelectConfig) -> Self {
        Self::with_dialect(config.build_dialect())
    }

    pub fn with_dialect(dialect: Arc<dyn Dialect>) -> Self {
        Self {
            dialect,
            straight_join: false,
            distinct: false,
            columns: Vec::new(),
            unions: Vec::new(),
            tables: Vec::new(),
            wheres: Vec::new(),
            group: Vec::new(),
            having: Vec::new(),
            order: Vec::new(),
            limit_count: None,
            limit_offset: None,
            for_update: false,
        }
    }

    pub fn dialect(&self) -> &dyn Dialect {
        &*self.dialect
    }

    /// Registered tables, in insertion order.
    pub fn tables(&self) -> &[TableRef] {
        &self.tables
    }

    pub fn table(&self, correlation: &str) -> Option<&TableRef> {
        self.tables.iter().find(|t| t.correlation == correlation)
    }

    pub fn has_table(&self, correlation: &str) -> bool {
        self.table(correlation).is_some()
    }

    pub fn column_specs(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.wheres
    }

    // ==================== FROM / JOIN ====================

    /// Set the base table and select `columns` from it.
    ///
    /// An empty table adds only the columns, with no table context, for statements such
    /// as `SELECT NOW()`. A second call adds another table and behaves like a join.
    pub fn from<T, I, C>(&mut self, table: T, columns: I) -> QbResult<&mut Self>
    where
        T: Into<TableInput>,
        I: IntoIterator<Item = C>,
        C: Into<ColumnInput>,
    {
        let table = table.into();
        if table.is_empty() {
            let specs = classify_all(columns, None)?;
            self.columns.extend(specs);
            return Ok(self);
        }
        self.add_table(JoinType::Inner, table, "", columns)
    }

    /// Alias for [`Select::join_inner`].
    pub fn join<T, I, C>(&mut self, table: T, condition: &str, columns: I) -> QbResult<&mut Self>
    where
        T: Into<TableInput>,
        I: IntoIterator<Item = C>,
        C: Into<ColumnInput>,
    {
        self.add_table(JoinType::Inner, table.into(), condition, columns)
    }

    /// INNER JOIN; an empty condition turns it into a CROSS JOIN.
    pub fn join_inner<T, I, C>(&mut self, table: T, condition: &str, columns: I) -> QbResult<&mut Self>
    where
        T: Into<TableInput>,
        I: IntoIterator<Item = C>,
        C: Into<ColumnInput>,
    {
        self.add_table(JoinType::Inner, table.into(), condition, columns)
    }

    pub fn join_left<T, I, C>(&mut self, table: T, condition: &str, columns: I) -> QbResult<&mut Self>
    where
        T: Into<TableInput>,
        I: IntoIterator<Item = C>,
        C: Into<ColumnInput>,
    {
        self.add_table(JoinType::Left, table.into(), condition, columns)
    }

    pub fn join_right<T, I, C>(&mut self, table: T, condition: &str, columns: I) -> QbResult<&mut Self>
    where
        T: Into<TableInput>,
        I: IntoIterator<Item = C>,
        C: Into<ColumnInput>,
    {
        self.add_table(JoinType::Right, table.into(), condition, columns)
    }

    pub fn join_full<T, I, C>(&mut self, table: T, condition: &str, columns: I) -> QbResult<&mut Self>
    where
        T: Into<TableInput>,
        I: IntoIterator<Item = C>,
        C: Into<ColumnInput>,
    {
        self.add_table(JoinType::Full, table.into(), condition, columns)
    }

    pub fn join_cross<T, I, C>(&mut self, table: T, columns: I) -> QbResult<&mut Self>
    where
        T: Into<TableInput>,
        I: IntoIterator<Item = C>,
        C: Into<ColumnInput>,
    {
        self.add_table(JoinType::Cross, table.into(), "", columns)
    }

    pub fn join_natural<T, I, C>(&mut self, table: T, columns: I) -> QbResult<&mut Self>
    where
        T: Into<TableInput>,
        I: IntoIterator<Item = C>,
        C: Into<ColumnInput>,
    {
        self.add_table(JoinType::Natural, table.into(), "", columns)
    }

    /// Join with the kind given as text (`"left"`, `"INNER JOIN"`, ...).
    ///
    /// Returns [`QbError::InvalidJoinType`] for anything other than the six join kinds.
    pub fn join_as<T, I, C>(
        &mut self,
        kind: &str,
        table: T,
        condition: &str,
        columns: I,
    ) -> QbResult<&mut Self>
    where
        T: Into<TableInput>,
        I: IntoIterator<Item = C>,
        C: Into<ColumnInput>,
    {
        let join_type: JoinType = kind.parse()?;
        self.add_table(join_type, table.into(), condition, columns)
    }

    fn add_table<I, C>(
        &mut self,
        join_type: JoinType,
        table: TableInput,
        condition: &str,
        columns: I,
    ) -> QbResult<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnInput>,
    {
        let Some(resolved) = table.resolve() else {
            return Err(QbError::MissingJoinTarget(format!(
                "{} requires a table",
                join_type.keyword()
            )));
        };

        let condition = condition.trim();
        let join_type = if self.tables.is_empty() {
            JoinType::None
        } else {
            match join_type {
                JoinType::Inner if condition.is_empty() => JoinType::Cross,
                jt if jt.requires_condition() && condition.is_empty() => {
                    return Err(QbError::MissingJoinCondition {
                        join: jt.keyword(),
                        table: resolved.display_name(),
                    });
                }
                jt => jt,
            }
        };

        let correlation = self.correlation_for(&resolved)?;
        let specs = classify_all(columns, Some(&correlation))?;
        let condition = (join_type.accepts_condition() && !condition.is_empty())
            .then(|| condition.to_string());

        let ResolvedTable { source, schema, .. } = resolved;
        self.tables.push(TableRef {
            correlation,
            join_type,
            schema,
            source,
            condition,
        });
        self.columns.extend(specs);
        Ok(self)
    }

    fn correlation_for(&self, table: &ResolvedTable) -> QbResult<String> {
        match &table.correlation {
            Some(explicit) if self.has_table(explicit) => {
                Err(QbError::DuplicateCorrelation(explicit.clone()))
            }
            Some(explicit) => Ok(explicit.clone()),
            None => Ok(self.unique_correlation(table.base_name())),
        }
    }

    /// `base`, or `base_2`, `base_3`, ... when already taken.
    fn unique_correlation(&self, base: &str) -> String {
        if !self.has_table(base) {
            return base.to_string();
        }
        (2u32..)
            .map(|i| format!("{base}_{i}"))
            .find(|c| !self.has_table(c))
            .unwrap_or_else(|| base.to_string())
    }

    // ==================== COLUMNS ====================

    /// Add columns against `correlation`, or against the first table when `None`.
    pub fn columns<I, C>(&mut self, columns: I, correlation: Option<&str>) -> QbResult<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnInput>,
    {
        let target = match correlation {
            Some(c) if !self.has_table(c) => {
                return Err(QbError::UnknownCorrelation(c.to_string()));
            }
            Some(c) => Some(c.to_string()),
            None => self.tables.first().map(|t| t.correlation.clone()),
        };
        let specs = classify_all(columns, target.as_deref())?;
        self.columns.extend(specs);
        Ok(self)
    }

    // ==================== WHERE / HAVING ====================

    /// Add a condition joined with AND, used verbatim.
    pub fn and_where(&mut self, condition: &str) -> &mut Self {
        self.push_where(Connector::And, condition.to_string())
    }

    /// Add a condition joined with AND, with every `?` replaced by the quoted `value`.
    pub fn and_where_value(&mut self, condition: &str, value: impl Into<SqlValue>) -> &mut Self {
        let text = self.dialect.quote_into(condition, value.into(), None);
        self.push_where(Connector::And, text)
    }

    pub fn and_where_typed(
        &mut self,
        condition: &str,
        value: impl Into<SqlValue>,
        ty: ValueType,
    ) -> &mut Self {
        let text = self.dialect.quote_into(condition, value.into(), Some(ty));
        self.push_where(Connector::And, text)
    }

    pub fn or_where(&mut self, condition: &str) -> &mut Self {
        self.push_where(Connector::Or, condition.to_string())
    }

    pub fn or_where_value(&mut self, condition: &str, value: impl Into<SqlValue>) -> &mut Self {
        let text = self.dialect.quote_into(condition, value.into(), None);
        self.push_where(Connector::Or, text)
    }

    pub fn or_where_typed(
        &mut self,
        condition: &str,
        value: impl Into<SqlValue>,
        ty: ValueType,
    ) -> &mut Self {
        let text = self.dialect.quote_into(condition, value.into(), Some(ty));
        self.push_where(Connector::Or, text)
    }

    fn push_where(&mut self, connector: Connector, text: String) -> &mut Self {
        if text.trim().is_empty() {
            return self;
        }
        self.wheres.push(Predicate {
            connector,
            text: format!("({text})"),
        });
        self
    }

    pub fn having(&mut self, condition: &str) -> &mut Self {
        self.push_having(Connector::And, condition.to_string())
    }

    pub fn having_value(&mut self, condition: &str, value: impl Into<SqlValue>) -> &mut Self {
        let text = self.dialect.quote_into(condition, value.into(), None);
        self.push_having(Connector::And, text)
    }

    pub fn having_typed(
        &mut self,
        condition: &str,
        value: impl Into<SqlValue>,
        ty: ValueType,
    ) -> &mut Self {
        let text = self.dialect.quote_into(condition, value.into(), Some(ty));
        self.push_having(Connector::And, text)
    }

    pub fn or_having(&mut self, condition: &str) -> &mut Self {
        self.push_having(Connector::Or, condition.to_string())
    }

    pub fn or_having_value(&mut self, condition: &str, value: impl Into<SqlValue>) -> &mut Self {
        let text = self.dialect.quote_into(condition, value.into(), None);
        self.push_having(Connector::Or, text)
    }

    pub fn or_having_typed(
        &mut self,
        condition: &str,
        value: impl Into<SqlValue>,
        ty: ValueType,
    ) -> &mut Self {
        let text = self.dialect.quote_into(condition, value.into(), Some(ty));
        self.push_having(Connector::Or, text)
    }

    /// HAVING entries carry their own connector after the first one.
    fn push_having(&mut self, connector: Connector, text: String) -> &mut Self {
        if text.trim().is_empty() {
            return self;
        }
        let entry = if self.having.is_empty() {
            format!("({text})")
        } else {
            format!("{} ({text})", connector.keyword())
        };
        self.having.push(entry);
        self
    }

    // ==================== GROUP / ORDER / LIMIT ====================

    /// Append GROUP BY terms. Text containing parentheses is kept as an expression.
    pub fn group<I, T>(&mut self, terms: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TermInput>,
    {
        for term in terms {
            match term.into() {
                TermInput::Raw(e) => {
                    if !e.is_empty() {
                        self.group.push(GroupTerm::Raw(e));
                    }
                }
                TermInput::Text(s) => {
                    let s = s.trim();
                    if s.is_empty() {
                        continue;
                    }
                    if is_expression(s) {
                        self.group.push(GroupTerm::Raw(Expr::new(s)));
                    } else {
                        self.group.push(GroupTerm::Ident(s.to_string()));
                    }
                }
            }
        }
        self
    }

    /// Append ORDER BY terms; a trailing `ASC` / `DESC` sets the direction.
    pub fn order<I, T>(&mut self, terms: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TermInput>,
    {
        for term in terms {
            match term.into() {
                TermInput::Raw(e) => {
                    if !e.is_empty() {
                        self.order.push(OrderTerm::Raw(e));
                    }
                }
                TermInput::Text(s) => {
                    if s.trim().is_empty() {
                        continue;
                    }
                    let (value, direction) = split_direction(&s);
                    if !value.is_empty() {
                        self.order.push(OrderTerm::Term { value, direction });
                    }
                }
            }
        }
        self
    }

    /// Set row count and offset. Zero leaves the respective value unset.
    pub fn limit(&mut self, count: u64, offset: u64) -> &mut Self {
        self.limit_count = (count > 0).then_some(count);
        self.limit_offset = (offset > 0).then_some(offset);
        self
    }

    /// Page-based limit; `page` and `row_count` are clamped to at least 1.
    pub fn limit_page(&mut self, page: u64, row_count: u64) -> &mut Self {
        let page = page.max(1);
        let row_count = row_count.max(1);
        self.limit(row_count, row_count.saturating_mul(page - 1))
    }

    // ==================== FLAGS ====================

    pub fn distinct(&mut self, flag: bool) -> &mut Self {
        self.distinct = flag;
        self
    }

    pub fn for_update(&mut self, flag: bool) -> &mut Self {
        self.for_update = flag;
        self
    }

    /// Emit `STRAIGHT_JOIN` when the dialect supports it.
    pub fn use_straight_join(&mut self, flag: bool) -> &mut Self {
        self.straight_join = flag;
        self
    }

    /// Random ordering in the dialect's syntax.
    pub fn order_rand(&mut self, field: Option<&str>) -> QbResult<&mut Self> {
        let dialect = Arc::clone(&self.dialect);
        dialect.order_rand(self, field)?;
        Ok(self)
    }

    // ==================== UNION ====================

    /// Combine with other statements or raw SQL.
    ///
    /// When this statement has no tables and no columns yet and the first member is a
    /// [`Select`], that member becomes the base statement instead of a union member.
    pub fn union<I, U>(&mut self, members: I, kind: UnionKind) -> QbResult<&mut Self>
    where
        I: IntoIterator<Item = U>,
        U: Into<UnionTarget>,
    {
        let mut members = members.into_iter().map(Into::into).peekable();
        if members.peek().is_none() {
            return Err(QbError::UnionWithNoMembers);
        }

        if self.tables.is_empty()
            && self.columns.is_empty()
            && matches!(members.peek(), Some(UnionTarget::Select(_)))
        {
            if let Some(UnionTarget::Select(base)) = members.next() {
                self.absorb(*base);
            }
        }

        self.unions
            .extend(members.map(|target| UnionMember { target, kind }));
        Ok(self)
    }

    /// Take over every part of `base` except its unions and dialect.
    fn absorb(&mut self, base: Select) {
        let Select {
            straight_join,
            distinct,
            columns,
            tables,
            wheres,
            group,
            having,
            order,
            limit_count,
            limit_offset,
            for_update,
            ..
        } = base;
        self.straight_join = straight_join;
        self.distinct = distinct;
        self.columns = columns;
        self.tables = tables;
        self.wheres = wheres;
        self.group = group;
        self.having = having;
        self.order = order;
        self.limit_count = limit_count;
        self.limit_offset = limit_offset;
        self.for_update = for_update;
    }

    // ==================== PARTS ====================

    /// Clear one part back to its empty default.
    pub fn reset(&mut self, part: Part) -> &mut Self {
        match part {
            Part::Distinct => self.distinct = false,
            Part::Columns => self.columns.clear(),
            Part::Union => self.unions.clear(),
            Part::From => self.tables.clear(),
            Part::Where => self.wheres.clear(),
            Part::Group => self.group.clear(),
            Part::Having => self.having.clear(),
            Part::Order => self.order.clear(),
            Part::LimitCount => self.limit_count = None,
            Part::LimitOffset => self.limit_offset = None,
            Part::ForUpdate => self.for_update = false,
            Part::StraightJoin => self.straight_join = false,
        }
        self
    }

    pub fn reset_all(&mut self) -> &mut Self {
        for part in Part::ALL {
            self.reset(part);
        }
        self
    }

    /// [`Select::reset`] by part name; unknown names fail with [`QbError::InvalidPartName`].
    pub fn reset_named(&mut self, name: &str) -> QbResult<&mut Self> {
        let part: Part = name.parse()?;
        Ok(self.reset(part))
    }

    pub fn get_part(&self, part: Part) -> PartValue {
        match part {
            Part::Distinct => PartValue::Distinct(self.distinct),
            Part::Columns => PartValue::Columns(self.columns.clone()),
            Part::Union => PartValue::Union(self.unions.clone()),
            Part::From => PartValue::From(self.tables.clone()),
            Part::Where => PartValue::Where(self.wheres.clone()),
            Part::Group => PartValue::Group(self.group.clone()),
            Part::Having => PartValue::Having(self.having.clone()),
            Part::Order => PartValue::Order(self.order.clone()),
            Part::LimitCount => PartValue::LimitCount(self.limit_count),
            Part::LimitOffset => PartValue::LimitOffset(self.limit_offset),
            Part::ForUpdate => PartValue::ForUpdate(self.for_update),
            Part::StraightJoin => PartValue::StraightJoin(self.straight_join),
        }
    }

    pub fn get_part_named(&self, name: &str) -> QbResult<PartValue> {
        let part: Part = name.parse()?;
        Ok(self.get_part(part))
    }

    /// Replace one part wholesale.
    ///
    /// A replacement FROM list is normalized: the first table loses its join keyword and
    /// condition, later tables without a keyword become CROSS joins, and correlation
    /// names must be unique.
    pub fn set_part(&mut self, value: PartValue) -> QbResult<&mut Self> {
        match value {
            PartValue::Distinct(v) => self.distinct = v,
            PartValue::Columns(v) => self.columns = v,
            PartValue::Union(v) => self.unions = v,
            PartValue::From(mut tables) => {
                for (i, table) in tables.iter().enumerate() {
                    if tables[..i].iter().any(|t| t.correlation == table.correlation) {
                        return Err(QbError::DuplicateCorrelation(table.correlation.clone()));
                    }
                }
                for (i, table) in tables.iter_mut().enumerate() {
                    if i == 0 {
                        table.join_type = JoinType::None;
                        table.condition = None;
                    } else if table.join_type == JoinType::None {
                        table.join_type = JoinType::Cross;
                    }
                    if !table.join_type.accepts_condition() {
                        table.condition = None;
                    }
                }
                self.tables = tables;
            }
            PartValue::Where(v) => self.wheres = v,
            PartValue::Group(v) => self.group = v,
            PartValue::Having(v) => self.having = v,
            PartValue::Order(v) => self.order = v,
            PartValue::LimitCount(v) => self.limit_count = v.filter(|c| *c > 0),
            PartValue::LimitOffset(v) => self.limit_offset = v.filter(|o| *o > 0),
            PartValue::ForUpdate(v) => self.for_update = v,
            PartValue::StraightJoin(v) => self.straight_join = v,
        }
        Ok(self)
    }
}
