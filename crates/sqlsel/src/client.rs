//! Connections a rendered statement can run on.

use std::future::Future;

use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

use crate::error::{QbError, QbResult};

/// Anything that can run SQL text with positional parameters.
///
/// [`Select`](crate::Select) execution methods accept any implementor, so a statement
/// can run on a plain connection, inside a transaction, or on a pooled client.
pub trait GenericClient: Send + Sync {
    /// Run a query and collect every row.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = QbResult<Vec<Row>>> + Send;

    /// Run a statement and return the affected row count.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = QbResult<u64>> + Send;

    /// First row of the result. [`QbError::NotFound`] when empty; extra rows are ignored.
    fn query_one(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = QbResult<Row>> + Send {
        async move {
            self.query_opt(sql, params)
                .await?
                .ok_or_else(|| QbError::not_found("query returned no rows"))
        }
    }

    fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = QbResult<Option<Row>>> + Send {
        async move { Ok(self.query(sql, params).await?.into_iter().next()) }
    }
}

/// tokio-postgres types with inherent `query` / `execute`.
macro_rules! impl_for_inherent {
    ($($ty:ty),* $(,)?) => {
        $(impl GenericClient for $ty {
            async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QbResult<Vec<Row>> {
                <$ty>::query(self, sql, params).await.map_err(QbError::from)
            }

            async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QbResult<u64> {
                <$ty>::execute(self, sql, params).await.map_err(QbError::from)
            }
        })*
    };
}

impl_for_inherent!(tokio_postgres::Client, tokio_postgres::Transaction<'_>);

/// Pool wrappers deref to a type that already implements the trait.
#[cfg(feature = "pool")]
macro_rules! impl_via_deref {
    ($($ty:ty),* $(,)?) => {
        $(impl GenericClient for $ty {
            async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QbResult<Vec<Row>> {
                GenericClient::query(&**self, sql, params).await
            }

            async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QbResult<u64> {
                GenericClient::execute(&**self, sql, params).await
            }
        })*
    };
}

#[cfg(feature = "pool")]
impl_via_deref!(
    deadpool_postgres::Client,
    deadpool_postgres::ClientWrapper,
    deadpool_postgres::Transaction<'_>,
);

impl<C: GenericClient> GenericClient for &C {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QbResult<Vec<Row>> {
        (**self).query(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QbResult<u64> {
        (**self).execute(sql, params).await
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QbResult<Row> {
        (**self).query_one(sql, params).await
    }

    async fn query_opt(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QbResult<Option<Row>> {
        (**self).query_opt(sql, params).await
    }
}
