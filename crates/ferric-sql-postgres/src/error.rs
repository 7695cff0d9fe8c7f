//! Runtime error taxonomy for the PostgreSQL connector.

use core::fmt;

use ferric_sql_core::params::BindError;
use thiserror::Error;

/// The violated constraint class of an [`DatabaseError::Integrity`] error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityKind {
    /// A UNIQUE or PRIMARY KEY constraint.
    Unique,
    /// A FOREIGN KEY constraint.
    ForeignKey,
    /// A NOT NULL constraint.
    NotNull,
    /// A CHECK constraint.
    Check,
}

impl fmt::Display for IntegrityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unique => "unique",
            Self::ForeignKey => "foreign key",
            Self::NotNull => "not null",
            Self::Check => "check",
        };
        f.write_str(name)
    }
}

/// Errors raised while talking to the database.
///
/// Execution-shaped variants keep the offending SQL text for diagnosis.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The connection could not be established or was lost.
    #[error("connection failure: {0}")]
    Connection(#[source] sqlx::Error),

    /// The backend rejected the statement's syntax.
    #[error("syntax error: {message}")]
    Syntax {
        /// The backend's message.
        message: String,
        /// The statement that was sent.
        sql: Option<String>,
    },

    /// A constraint was violated.
    #[error("integrity constraint violated ({kind}): {message}")]
    Integrity {
        /// The constraint class.
        kind: IntegrityKind,
        /// The backend's message.
        message: String,
        /// The statement that was sent.
        sql: Option<String>,
    },

    /// The pool or backend ran out of a resource.
    #[error("resource exhausted: {0}")]
    Resource(#[source] sqlx::Error),

    /// The statement failed for a reason outside the other classes.
    #[error("statement execution failed: {message}")]
    Execution {
        /// The backend's message.
        message: String,
        /// The statement that was sent.
        sql: Option<String>,
    },

    /// The statement uses syntax this dialect does not have.
    #[error("the {dialect} dialect does not support {feature}")]
    Unsupported {
        /// The dialect's name.
        dialect: &'static str,
        /// The unsupported feature.
        feature: &'static str,
    },

    /// A result column could not be decoded into its declared value type.
    #[error("column '{column}' could not be decoded: {message}")]
    Decode {
        /// The result column name.
        column: String,
        /// The decoder's message.
        message: String,
    },

    /// An unsigned value exceeds the backend's signed integer range.
    #[error("unsigned value {0} exceeds the backend integer range")]
    UnsignedRange(u64),

    /// A parameter binding was missing or invalid.
    #[error(transparent)]
    Bind(#[from] BindError),
}

impl DatabaseError {
    pub(crate) const fn connection(err: sqlx::Error) -> Self {
        Self::Connection(err)
    }

    /// Classifies an execution-time sqlx error.
    pub(crate) fn from_sqlx(err: sqlx::Error, sql: Option<&str>) -> Self {
        let sql = sql.map(str::to_owned);
        match err {
            sqlx::Error::Database(db) => {
                let message = db.message().to_owned();
                match db.kind() {
                    sqlx::error::ErrorKind::UniqueViolation => Self::Integrity {
                        kind: IntegrityKind::Unique,
                        message,
                        sql,
                    },
                    sqlx::error::ErrorKind::ForeignKeyViolation => Self::Integrity {
                        kind: IntegrityKind::ForeignKey,
                        message,
                        sql,
                    },
                    sqlx::error::ErrorKind::NotNullViolation => Self::Integrity {
                        kind: IntegrityKind::NotNull,
                        message,
                        sql,
                    },
                    sqlx::error::ErrorKind::CheckViolation => Self::Integrity {
                        kind: IntegrityKind::Check,
                        message,
                        sql,
                    },
                    _ if message.contains("syntax") => Self::Syntax { message, sql },
                    _ => Self::Execution { message, sql },
                }
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => Self::Resource(err),
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::Protocol(_) => {
                Self::Connection(err)
            }
            other => Self::Execution {
                message: other.to_string(),
                sql,
            },
        }
    }
}
