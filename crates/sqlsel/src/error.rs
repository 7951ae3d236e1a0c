//! Error types for sqlsel

use thiserror::Error;

/// Result type alias for sqlsel operations
pub type QbResult<T> = Result<T, QbError>;

/// Errors raised while building, rendering or executing a statement.
///
/// Builder errors signal programmer misuse and are returned synchronously from the
/// mutator that detected them; nothing is retried or recovered internally.
#[derive(Debug, Error)]
pub enum QbError {
    /// Join requested with a kind outside inner/left/right/full/cross/natural
    #[error("Invalid join type: {0}")]
    InvalidJoinType(String),

    /// Join or FROM called with an empty table specification
    #[error("Missing join target: {0}")]
    MissingJoinTarget(String),

    /// LEFT/RIGHT/FULL join added without an ON condition
    #[error("Missing join condition for {join} on '{table}'")]
    MissingJoinCondition { join: &'static str, table: String },

    /// Unknown statement part identifier
    #[error("Invalid part name: {0}")]
    InvalidPartName(String),

    /// `union()` called with an empty member collection
    #[error("union() requires at least one member")]
    UnionWithNoMembers,

    /// Explicit correlation name registered twice
    #[error("Correlation name '{0}' is already defined")]
    DuplicateCorrelation(String),

    /// Correlation name that no registered table uses
    #[error("No table registered under correlation name '{0}'")]
    UnknownCorrelation(String),

    /// Identifier that cannot be quoted safely
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Operation the dialect cannot express
    #[error("{dialect} does not support {message}")]
    Unsupported {
        dialect: &'static str,
        message: String,
    },

    /// Statement shape is unusable for the requested operation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// `fetch_one` / `query_one` saw an empty result
    #[error("Not found: {0}")]
    NotFound(String),

    /// A column could not be converted to the requested Rust type
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl QbError {
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an unsupported-operation error for a dialect
    pub fn unsupported(dialect: &'static str, message: impl Into<String>) -> Self {
        Self::Unsupported {
            dialect,
            message: message.into(),
        }
    }

    /// Raised by a mutator rather than by the database.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            Self::InvalidJoinType(_)
                | Self::MissingJoinTarget(_)
                | Self::MissingJoinCondition { .. }
                | Self::InvalidPartName(_)
                | Self::UnionWithNoMembers
                | Self::DuplicateCorrelation(_)
                | Self::UnknownCorrelation(_)
                | Self::InvalidIdentifier(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for QbError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
