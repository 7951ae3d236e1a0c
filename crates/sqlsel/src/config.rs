//! Builder configuration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dialect::{Dialect, MySqlDialect, PostgresDialect};

/// Which SQL dialect a [`Select`](crate::Select) renders for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    Postgres,
    #[serde(alias = "mariadb")]
    MySql,
}

/// Configuration for [`Select`](crate::Select).
///
/// Deserializes with defaults for missing fields, so it can sit inside a larger
/// application config:
///
/// ```
/// use sqlsel::{DialectKind, SelectConfig};
///
/// let config: SelectConfig = serde_json::from_str(r#"{"dialect": "mysql"}"#).unwrap();
/// assert_eq!(config.dialect, DialectKind::MySql);
/// assert!(config.auto_quote);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Target dialect.
    pub dialect: DialectKind,
    /// Quote plain identifiers on output.
    pub auto_quote: bool,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            dialect: DialectKind::Postgres,
            auto_quote: true,
        }
    }
}

impl SelectConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect(mut self, dialect: DialectKind) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_auto_quote(mut self, auto_quote: bool) -> Self {
        self.auto_quote = auto_quote;
        self
    }

    /// Instantiate the configured dialect.
    pub fn build_dialect(&self) -> Arc<dyn Dialect> {
        match self.dialect {
            DialectKind::Postgres => {
                Arc::new(PostgresDialect::new().with_auto_quote(self.auto_quote))
            }
            DialectKind::MySql => Arc::new(MySqlDialect::new().with_auto_quote(self.auto_quote)),
        }
    }
}
