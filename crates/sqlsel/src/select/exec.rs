//! Running a [`Select`] and the DML derived from it.

use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

use super::Select;
use crate::client::GenericClient;
use crate::dialect::InsertMode;
use crate::error::QbResult;
use crate::row::FromRow;

fn log_sql(sql: &str, param_count: usize) {
    tracing::debug!(target: "sqlsel.sql", sql = %sql, param_count, "executing");
}

impl Select {
    /// Render and fetch all rows.
    pub async fn fetch_all(
        &self,
        conn: &impl GenericClient,
        params: &[&(dyn ToSql + Sync)],
    ) -> QbResult<Vec<Row>> {
        let sql = self.assemble()?;
        log_sql(&sql, params.len());
        conn.query(&sql, params).await
    }

    /// Render and fetch the first row; `NotFound` when there is none.
    pub async fn fetch_one(
        &self,
        conn: &impl GenericClient,
        params: &[&(dyn ToSql + Sync)],
    ) -> QbResult<Row> {
        let sql = self.assemble()?;
        log_sql(&sql, params.len());
        conn.query_one(&sql, params).await
    }

    pub async fn fetch_opt(
        &self,
        conn: &impl GenericClient,
        params: &[&(dyn ToSql + Sync)],
    ) -> QbResult<Option<Row>> {
        let sql = self.assemble()?;
        log_sql(&sql, params.len());
        conn.query_opt(&sql, params).await
    }

    pub async fn fetch_all_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
        params: &[&(dyn ToSql + Sync)],
    ) -> QbResult<Vec<T>> {
        let rows = self.fetch_all(conn, params).await?;
        rows.iter().map(T::from_row).collect()
    }

    pub async fn fetch_one_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
        params: &[&(dyn ToSql + Sync)],
    ) -> QbResult<T> {
        let row = self.fetch_one(conn, params).await?;
        T::from_row(&row)
    }

    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
        params: &[&(dyn ToSql + Sync)],
    ) -> QbResult<Option<T>> {
        let row = self.fetch_opt(conn, params).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    // ==================== derived DML ====================

    /// `INSERT INTO table (fields) <this select>` in the statement's dialect.
    pub fn insert_from_select_sql(&self, table: &str, fields: &[&str], mode: InsertMode) -> QbResult<String> {
        self.dialect.insert_from_select(self, table, fields, mode)
    }

    /// UPDATE `table` using this statement's columns as assignments.
    pub fn update_from_select_sql(&self, table: &str, alias: Option<&str>) -> QbResult<String> {
        self.dialect.update_from_select(self, table, alias)
    }

    /// DELETE from the table registered as `correlation`, restricted by this statement.
    pub fn delete_from_select_sql(&self, correlation: &str) -> QbResult<String> {
        self.dialect.delete_from_select(self, correlation)
    }

    pub async fn insert_into(
        &self,
        conn: &impl GenericClient,
        table: &str,
        fields: &[&str],
        params: &[&(dyn ToSql + Sync)],
    ) -> QbResult<u64> {
        let sql = self.insert_from_select_sql(table, fields, InsertMode::Plain)?;
        log_sql(&sql, params.len());
        conn.execute(&sql, params).await
    }

    pub async fn insert_ignore_into(
        &self,
        conn: &impl GenericClient,
        table: &str,
        fields: &[&str],
        params: &[&(dyn ToSql + Sync)],
    ) -> QbResult<u64> {
        let sql = self.insert_from_select_sql(table, fields, InsertMode::Ignore)?;
        log_sql(&sql, params.len());
        conn.execute(&sql, params).await
    }

    pub async fn update_table(
        &self,
        conn: &impl GenericClient,
        table: &str,
        alias: Option<&str>,
        params: &[&(dyn ToSql + Sync)],
    ) -> QbResult<u64> {
        let sql = self.update_from_select_sql(table, alias)?;
        log_sql(&sql, params.len());
        conn.execute(&sql, params).await
    }

    pub async fn delete_from(
        &self,
        conn: &impl GenericClient,
        correlation: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> QbResult<u64> {
        let sql = self.delete_from_select_sql(correlation)?;
        log_sql(&sql, params.len());
        conn.execute(&sql, params).await
    }
}
