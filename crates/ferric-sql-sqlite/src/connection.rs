//! The SQLite connection: an sqlx pool plus statement execution.

use ferric_sql_core::params::ParameterSet;
use ferric_sql_core::row::{Row, RowSpec};
use ferric_sql_core::statement::{
    Checked, DeleteStatement, InsertStatement, SelectStatement, Statement, UpdateStatement,
};
use ferric_sql_core::types::ValueType;
use ferric_sql_core::value::Value;
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqliteRow};
use sqlx::Row as _;
use tracing::debug;

use crate::dialect::SqliteDialect;
use crate::error::DatabaseError;

type SqliteQuery<'q> = sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>;

/// A checked statement serialized for SQLite, with its parameter bindings.
///
/// The SQL text is fixed at prepare time; bind new values and re-run as
/// often as needed.
#[derive(Debug, Clone)]
pub struct Prepared<S> {
    statement: Checked<S>,
    sql: String,
    params: ParameterSet,
}

impl<S: Statement> Prepared<S> {
    /// The serialized SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The wrapped statement.
    #[must_use]
    pub fn statement(&self) -> &S {
        &self.statement
    }

    /// The parameter bindings.
    #[must_use]
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// The parameter bindings, for `set(name, value)` calls.
    pub fn params_mut(&mut self) -> &mut ParameterSet {
        &mut self.params
    }
}

/// A connection pool to a SQLite database.
#[derive(Debug, Clone)]
pub struct Connection {
    pool: SqlitePool,
}

impl Connection {
    /// Connects to the database at the given URL (e.g. `sqlite::memory:`).
    pub async fn connect(url: &str) -> Result<Self, DatabaseError> {
        let pool = SqlitePool::connect(url)
            .await
            .map_err(DatabaseError::connection)?;
        Ok(Self { pool })
    }

    /// Wraps an existing pool.
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The dialect statements are serialized with.
    #[must_use]
    pub const fn dialect(&self) -> SqliteDialect {
        SqliteDialect::new()
    }

    /// Serializes a checked statement and pairs it with an unbound
    /// parameter container.
    pub fn prepare<S: Statement>(&self, statement: Checked<S>) -> Prepared<S> {
        let sql = statement.to_sql_string(&self.dialect());
        let params = statement.parameter_set();
        debug!(sql = %sql, "prepared statement");
        Prepared {
            statement,
            sql,
            params,
        }
    }

    /// Runs a select, decoding each native row against the statement's row
    /// shape.
    pub async fn run_select(
        &self,
        prepared: &Prepared<SelectStatement>,
    ) -> Result<Vec<Row>, DatabaseError> {
        let spec = prepared.statement().row_spec();
        self.fetch_rows(prepared.sql(), prepared.params(), &spec)
            .await
    }

    /// Runs an insert, returning the number of affected rows.
    pub async fn run_insert(
        &self,
        prepared: &Prepared<InsertStatement>,
    ) -> Result<u64, DatabaseError> {
        self.execute(prepared.sql(), prepared.params()).await
    }

    /// Runs an insert with a RETURNING clause, decoding the returned rows.
    pub async fn run_insert_returning(
        &self,
        prepared: &Prepared<InsertStatement>,
    ) -> Result<Vec<Row>, DatabaseError> {
        let spec = prepared.statement().row_spec();
        self.fetch_rows(prepared.sql(), prepared.params(), &spec)
            .await
    }

    /// Runs an update, returning the number of affected rows.
    pub async fn run_update(
        &self,
        prepared: &Prepared<UpdateStatement>,
    ) -> Result<u64, DatabaseError> {
        self.execute(prepared.sql(), prepared.params()).await
    }

    /// Runs an update with a RETURNING clause, decoding the returned rows.
    pub async fn run_update_returning(
        &self,
        prepared: &Prepared<UpdateStatement>,
    ) -> Result<Vec<Row>, DatabaseError> {
        let spec = prepared.statement().row_spec();
        self.fetch_rows(prepared.sql(), prepared.params(), &spec)
            .await
    }

    /// Runs a delete, returning the number of affected rows.
    pub async fn run_delete(
        &self,
        prepared: &Prepared<DeleteStatement>,
    ) -> Result<u64, DatabaseError> {
        self.execute(prepared.sql(), prepared.params()).await
    }

    /// Runs a delete with a RETURNING clause, decoding the returned rows.
    pub async fn run_delete_returning(
        &self,
        prepared: &Prepared<DeleteStatement>,
    ) -> Result<Vec<Row>, DatabaseError> {
        let spec = prepared.statement().row_spec();
        self.fetch_rows(prepared.sql(), prepared.params(), &spec)
            .await
    }

    /// Starts a transaction.
    pub async fn begin(&self) -> Result<Transaction<'_>, DatabaseError> {
        let inner = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::from_sqlx(e, None))?;
        Ok(Transaction { inner })
    }

    async fn execute(&self, sql: &str, params: &ParameterSet) -> Result<u64, DatabaseError> {
        debug!(sql = %sql, "executing statement");
        let query = bind_all(sqlx::query(sql), params)?;
        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(e, Some(sql)))?;
        Ok(result.rows_affected())
    }

    async fn fetch_rows(
        &self,
        sql: &str,
        params: &ParameterSet,
        spec: &RowSpec,
    ) -> Result<Vec<Row>, DatabaseError> {
        debug!(sql = %sql, "executing statement");
        let query = bind_all(sqlx::query(sql), params)?;
        let native = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(e, Some(sql)))?;
        native.iter().map(|row| decode_row(spec, row)).collect()
    }
}

/// An open transaction handle.
#[derive(Debug)]
pub struct Transaction<'c> {
    inner: sqlx::Transaction<'c, sqlx::Sqlite>,
}

impl Transaction<'_> {
    /// Commits the transaction.
    pub async fn commit(self) -> Result<(), DatabaseError> {
        self.inner
            .commit()
            .await
            .map_err(|e| DatabaseError::from_sqlx(e, None))
    }

    /// Rolls the transaction back.
    pub async fn rollback(self) -> Result<(), DatabaseError> {
        self.inner
            .rollback()
            .await
            .map_err(|e| DatabaseError::from_sqlx(e, None))
    }
}

fn bind_all<'q>(
    mut query: SqliteQuery<'q>,
    params: &ParameterSet,
) -> Result<SqliteQuery<'q>, DatabaseError> {
    for value in params.values()? {
        query = bind_value(query, value)?;
    }
    Ok(query)
}

/// Binds one value to the next placeholder. SQLite stores integers as
/// signed 64-bit, so unsigned values beyond `i64::MAX` are rejected.
fn bind_value<'q>(
    query: SqliteQuery<'q>,
    value: Value,
) -> Result<SqliteQuery<'q>, DatabaseError> {
    Ok(match value {
        // ParameterSet::set never accepts Value::Default.
        Value::Null | Value::Default => query.bind(Option::<i64>::None),
        Value::Bool(b) => query.bind(b),
        Value::Int(i) => query.bind(i),
        Value::UInt(u) => {
            let i = i64::try_from(u).map_err(|_| DatabaseError::UnsignedRange(u))?;
            query.bind(i)
        }
        Value::Float(f) => query.bind(f),
        Value::Text(s) => query.bind(s),
        Value::Blob(b) => query.bind(b),
        Value::Date(d) => query.bind(d),
        Value::DateTime(dt) => query.bind(dt),
        Value::Time(t) => query.bind(t),
    })
}

fn decode_row(spec: &RowSpec, row: &SqliteRow) -> Result<Row, DatabaseError> {
    let mut values = Vec::with_capacity(spec.len());
    for (index, field) in spec.fields().iter().enumerate() {
        values.push(decode_field(row, index, field.value_type).map_err(|e| {
            DatabaseError::Decode {
                column: field.name.text().to_owned(),
                message: e.to_string(),
            }
        })?);
    }
    Ok(Row::new(spec.clone(), values))
}

fn decode_field(
    row: &SqliteRow,
    index: usize,
    value_type: ValueType,
) -> Result<Value, sqlx::Error> {
    Ok(match value_type {
        ValueType::Boolean => row
            .try_get::<Option<bool>, _>(index)?
            .map_or(Value::Null, Value::Bool),
        ValueType::Integral => row
            .try_get::<Option<i64>, _>(index)?
            .map_or(Value::Null, Value::Int),
        ValueType::UnsignedIntegral => match row.try_get::<Option<i64>, _>(index)? {
            Some(n) => Value::UInt(u64::try_from(n).map_err(|e| sqlx::Error::ColumnDecode {
                index: index.to_string(),
                source: Box::new(e),
            })?),
            None => Value::Null,
        },
        ValueType::FloatingPoint => row
            .try_get::<Option<f64>, _>(index)?
            .map_or(Value::Null, Value::Float),
        ValueType::Text => row
            .try_get::<Option<String>, _>(index)?
            .map_or(Value::Null, Value::Text),
        ValueType::Blob => row
            .try_get::<Option<Vec<u8>>, _>(index)?
            .map_or(Value::Null, Value::Blob),
        ValueType::DayPoint => row
            .try_get::<Option<chrono::NaiveDate>, _>(index)?
            .map_or(Value::Null, Value::Date),
        ValueType::TimePoint => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)?
            .map_or(Value::Null, Value::DateTime),
        ValueType::TimeOfDay => row
            .try_get::<Option<chrono::NaiveTime>, _>(index)?
            .map_or(Value::Null, Value::Time),
        ValueType::NoValue => Value::Null,
    })
}
