//! Row mapping traits and utilities

use crate::error::{QbError, QbResult};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

/// Trait for types that can be built from a fetched row.
///
/// Implement it by hand for record types:
///
/// ```ignore
/// use sqlsel::{FromRow, QbResult, RowExt};
///
/// struct Order {
///     id: i64,
///     total: f64,
/// }
///
/// impl FromRow for Order {
///     fn from_row(row: &tokio_postgres::Row) -> QbResult<Self> {
///         Ok(Self {
///             id: row.try_get_column("id")?,
///             total: row.try_get_column("total")?,
///         })
///     }
/// }
/// ```
///
/// Tuples up to six elements decode their fields by position.
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> QbResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning QbError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> QbResult<T>
    where
        T: for<'a> FromSql<'a>;

    /// Same as [`RowExt::try_get_column`], by position.
    fn try_get_index<T>(&self, index: usize) -> QbResult<T>
    where
        T: for<'a> FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> QbResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| QbError::decode(column, e.to_string()))
    }

    fn try_get_index<T>(&self, index: usize) -> QbResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get(index).map_err(|e| {
            let name = self
                .columns()
                .get(index)
                .map_or_else(|| format!("#{index}"), |c| c.name().to_string());
            QbError::decode(name, e.to_string())
        })
    }
}

macro_rules! impl_from_row_tuple {
    ($($idx:tt => $t:ident),+) => {
        impl<$($t),+> FromRow for ($($t,)+)
        where
            $($t: for<'a> FromSql<'a>),+
        {
            fn from_row(row: &Row) -> QbResult<Self> {
                Ok(($(row.try_get_index::<$t>($idx)?,)+))
            }
        }
    };
}

impl_from_row_tuple!(0 => A);
impl_from_row_tuple!(0 => A, 1 => B);
impl_from_row_tuple!(0 => A, 1 => B, 2 => C);
impl_from_row_tuple!(0 => A, 1 => B, 2 => C, 3 => D);
impl_from_row_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E);
impl_from_row_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F);
