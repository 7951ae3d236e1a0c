//! # sqlsel
//!
//! A fluent, dialect-aware builder for SQL `SELECT` statements.
//!
//! ## Features
//!
//! - **Incremental**: add tables, joins, columns, filters, grouping, ordering and paging
//!   through `&mut self` mutators, in any order
//! - **Heuristic column parsing**: `"o.total AS grand"`, `"COUNT(o.id)"` and plain names
//!   are classified without a SQL grammar
//! - **LEFT JOIN pruning**: [`Select::reset_join_left`] drops joins nothing refers to
//! - **Dialects**: PostgreSQL (default) and MySQL quoting, LIMIT syntax and derived DML
//! - **Execution**: run statements through any [`GenericClient`] (tokio-postgres client,
//!   transaction or pooled client)
//!
//! ## Example
//!
//! ```
//! use sqlsel::{NO_COLUMNS, Select};
//!
//! let mut s = Select::new();
//! s.from("orders", ["id"]).unwrap()
//!     .join_left("refunds", "orders.id = refunds.order_id", NO_COLUMNS).unwrap();
//! s.reset_join_left();
//!
//! assert_eq!(s.to_string(), r#"SELECT "orders"."id" FROM "orders""#);
//! ```

pub mod client;
pub mod config;
pub mod dialect;
pub mod error;
pub mod expr;
pub mod ident;
pub mod row;
pub mod select;
pub mod value;

pub use client::GenericClient;
pub use config::{DialectKind, SelectConfig};
pub use dialect::{ColumnRef, Dialect, InsertMode, MySqlDialect, PostgresDialect};
pub use error::{QbError, QbResult};
pub use expr::{Expr, expr};
pub use row::{FromRow, RowExt};
pub use select::{
    ColumnExpr, ColumnInput, ColumnSpec, Connector, Direction, GroupTerm, JoinType, NO_COLUMNS,
    OrderTerm, Part, PartValue, Predicate, Select, TableInput, TableRef, TableSource, TermInput,
    UnionKind, UnionMember, UnionTarget,
};
pub use value::{SqlValue, ValueType};
