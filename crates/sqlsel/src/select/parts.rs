//! Structural parts of a [`Select`] and the input types its mutators accept.

use std::fmt;
use std::str::FromStr;

use super::Select;
use crate::error::{QbError, QbResult};
use crate::expr::Expr;

/// How a table enters the FROM clause.
///
/// The first registered table is always [`JoinType::None`]; every later table carries a
/// join keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    None,
    Inner,
    Left,
    Right,
    Full,
    Cross,
    Natural,
}

impl JoinType {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinType::None => "",
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
            JoinType::Cross => "CROSS JOIN",
            JoinType::Natural => "NATURAL JOIN",
        }
    }

    /// Outer joins refuse to run without an ON condition.
    pub fn requires_condition(self) -> bool {
        matches!(self, JoinType::Left | JoinType::Right | JoinType::Full)
    }

    pub fn accepts_condition(self) -> bool {
        matches!(
            self,
            JoinType::Inner | JoinType::Left | JoinType::Right | JoinType::Full
        )
    }
}

impl FromStr for JoinType {
    type Err = QbError;

    /// Accepts `inner`, `left`, `right`, `full`, `cross`, `natural`, optionally followed by
    /// `join` (and `outer` for the outer kinds), in any case.
    fn from_str(s: &str) -> QbResult<Self> {
        let norm = s.trim().to_ascii_lowercase();
        let kind = norm
            .strip_suffix("join")
            .map(str::trim_end)
            .unwrap_or(norm.as_str());
        match kind {
            "inner" => Ok(JoinType::Inner),
            "left" | "left outer" => Ok(JoinType::Left),
            "right" | "right outer" => Ok(JoinType::Right),
            "full" | "full outer" => Ok(JoinType::Full),
            "cross" => Ok(JoinType::Cross),
            "natural" => Ok(JoinType::Natural),
            _ => Err(QbError::InvalidJoinType(s.to_string())),
        }
    }
}

/// What a registered table reads from.
#[derive(Debug, Clone)]
pub enum TableSource {
    Name(String),
    Expr(Expr),
    Subquery(Box<Select>),
}

/// A table registered in the FROM clause under its correlation name.
#[derive(Debug, Clone)]
pub struct TableRef {
    pub correlation: String,
    pub join_type: JoinType,
    pub schema: Option<String>,
    pub source: TableSource,
    pub condition: Option<String>,
}

impl TableRef {
    /// Physical table name, when the source is a plain name.
    pub fn table_name(&self) -> Option<&str> {
        match &self.source {
            TableSource::Name(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnExpr {
    /// Identifier, quoted at render time.
    Ident(String),
    Raw(Expr),
}

/// One entry of the select list.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub correlation: Option<String>,
    pub expr: ColumnExpr,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn keyword(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// A WHERE condition, already wrapped in parentheses.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub connector: Connector,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupTerm {
    Ident(String),
    Raw(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderTerm {
    Term { value: String, direction: Direction },
    Raw(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnionKind {
    #[default]
    Union,
    UnionAll,
}

impl UnionKind {
    pub fn keyword(self) -> &'static str {
        match self {
            UnionKind::Union => "UNION",
            UnionKind::UnionAll => "UNION ALL",
        }
    }
}

/// A member of a UNION: a nested statement or a raw SQL string.
#[derive(Debug, Clone)]
pub enum UnionTarget {
    Select(Box<Select>),
    Raw(Expr),
}

impl UnionTarget {
    pub(crate) fn render(&self) -> QbResult<String> {
        match self {
            UnionTarget::Select(select) => select.assemble(),
            UnionTarget::Raw(expr) => Ok(expr.to_string()),
        }
    }
}

impl From<Select> for UnionTarget {
    fn from(select: Select) -> Self {
        UnionTarget::Select(Box::new(select))
    }
}

impl From<&Select> for UnionTarget {
    fn from(select: &Select) -> Self {
        UnionTarget::Select(Box::new(select.clone()))
    }
}

impl From<Expr> for UnionTarget {
    fn from(expr: Expr) -> Self {
        UnionTarget::Raw(expr)
    }
}

impl From<&str> for UnionTarget {
    fn from(sql: &str) -> Self {
        UnionTarget::Raw(Expr::new(sql))
    }
}

impl From<String> for UnionTarget {
    fn from(sql: String) -> Self {
        UnionTarget::Raw(Expr::new(sql))
    }
}

#[derive(Debug, Clone)]
pub struct UnionMember {
    pub target: UnionTarget,
    pub kind: UnionKind,
}

/// Named part of a statement, for [`Select::reset`] and [`Select::get_part`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Distinct,
    Columns,
    Union,
    From,
    Where,
    Group,
    Having,
    Order,
    LimitCount,
    LimitOffset,
    ForUpdate,
    StraightJoin,
}

impl Part {
    pub const ALL: [Part; 12] = [
        Part::StraightJoin,
        Part::Distinct,
        Part::Columns,
        Part::Union,
        Part::From,
        Part::Where,
        Part::Group,
        Part::Having,
        Part::Order,
        Part::LimitCount,
        Part::LimitOffset,
        Part::ForUpdate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Part::Distinct => "distinct",
            Part::Columns => "columns",
            Part::Union => "union",
            Part::From => "from",
            Part::Where => "where",
            Part::Group => "group",
            Part::Having => "having",
            Part::Order => "order",
            Part::LimitCount => "limitcount",
            Part::LimitOffset => "limitoffset",
            Part::ForUpdate => "forupdate",
            Part::StraightJoin => "straightjoin",
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Part {
    type Err = QbError;

    fn from_str(s: &str) -> QbResult<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Part::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| QbError::InvalidPartName(s.to_string()))
    }
}

/// Snapshot of one part's contents.
#[derive(Debug, Clone)]
pub enum PartValue {
    Distinct(bool),
    Columns(Vec<ColumnSpec>),
    Union(Vec<UnionMember>),
    From(Vec<TableRef>),
    Where(Vec<Predicate>),
    Group(Vec<GroupTerm>),
    Having(Vec<String>),
    Order(Vec<OrderTerm>),
    LimitCount(Option<u64>),
    LimitOffset(Option<u64>),
    ForUpdate(bool),
    StraightJoin(bool),
}

impl PartValue {
    pub fn part(&self) -> Part {
        match self {
            PartValue::Distinct(_) => Part::Distinct,
            PartValue::Columns(_) => Part::Columns,
            PartValue::Union(_) => Part::Union,
            PartValue::From(_) => Part::From,
            PartValue::Where(_) => Part::Where,
            PartValue::Group(_) => Part::Group,
            PartValue::Having(_) => Part::Having,
            PartValue::Order(_) => Part::Order,
            PartValue::LimitCount(_) => Part::LimitCount,
            PartValue::LimitOffset(_) => Part::LimitOffset,
            PartValue::ForUpdate(_) => Part::ForUpdate,
            PartValue::StraightJoin(_) => Part::StraightJoin,
        }
    }
}
