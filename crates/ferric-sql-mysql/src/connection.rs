//! The MySQL connection: an sqlx pool plus statement execution.

use ferric_sql_core::dialect::Dialect;
use ferric_sql_core::params::ParameterSet;
use ferric_sql_core::row::{Row, RowSpec};
use ferric_sql_core::statement::{
    Checked, DeleteStatement, InsertStatement, SelectStatement, Statement, UpdateStatement,
};
use ferric_sql_core::types::ValueType;
use ferric_sql_core::value::Value;
use sqlx::mysql::{MySqlArguments, MySqlPool, MySqlRow};
use sqlx::Row as _;
use tracing::debug;

use crate::dialect::MysqlDialect;
use crate::error::DatabaseError;

type MysqlQuery<'q> = sqlx::query::Query<'q, sqlx::MySql, MySqlArguments>;

/// A checked statement serialized for MySQL, with its parameter bindings.
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

/// A connection pool to a MySQL database.
#[derive(Debug, Clone)]
pub struct Connection {
    pool: MySqlPool,
}

impl Connection {
    /// Connects to the database at the given URL.
    pub async fn connect(url: &str) -> Result<Self, DatabaseError> {
        let pool = MySqlPool::connect(url)
            .await
            .map_err(DatabaseError::connection)?;
        Ok(Self { pool })
    }

    /// Wraps an existing pool.
    #[must_use]
    pub const fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// The dialect statements are serialized with.
    #[must_use]
    pub const fn dialect(&self) -> MysqlDialect {
        MysqlDialect::new()
    }

    /// Serializes a checked statement and pairs it with an unbound
    /// parameter container. MySQL has no RETURNING clause; statements
    /// carrying one are rejected here.
    pub fn prepare<S: Statement>(
        &self,
        statement: Checked<S>,
    ) -> Result<Prepared<S>, DatabaseError> {
        if statement.has_returning() && !self.dialect().supports_returning() {
            return Err(DatabaseError::Unsupported {
                dialect: self.dialect().name(),
                feature: "RETURNING",
            });
        }
        let sql = statement.to_sql_string(&self.dialect());
        let params = statement.parameter_set();
        debug!(sql = %sql, "prepared statement");
        Ok(Prepared {
            statement,
            sql,
            params,
        })
    }

    /// Runs a select, decoding each native row against the statement's row
    /// shape.
    pub async fn run_select(
        &self,
        prepared: &Prepared<SelectStatement>,
    ) -> Result<Vec<Row>, DatabaseError> {
        let spec = prepared.statement().row_spec();
        debug!(sql = %prepared.sql(), "executing statement");
        let query = bind_all(sqlx::query(prepared.sql()), prepared.params())?;
        let native = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(e, Some(prepared.sql())))?;
        native
            .iter()
            .map(|row| decode_row(&spec, row))
            .collect()
    }

    /// Runs an insert, returning the number of affected rows.
    pub async fn run_insert(
        &self,
        prepared: &Prepared<InsertStatement>,
    ) -> Result<u64, DatabaseError> {
        self.execute(prepared.sql(), prepared.params()).await
    }

    /// Runs an update, returning the number of affected rows.
    pub async fn run_update(
        &self,
        prepared: &Prepared<UpdateStatement>,
    ) -> Result<u64, DatabaseError> {
        self.execute(prepared.sql(), prepared.params()).await
    }

    /// Runs a delete, returning the number of affected rows.
    pub async fn run_delete(
        &self,
        prepared: &Prepared<DeleteStatement>,
    ) -> Result<u64, DatabaseError> {
        self.execute(prepared.sql(), prepared.params()).await
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
}

/// An open transaction handle.
#[derive(Debug)]
pub struct Transaction<'c> {
    inner: sqlx::Transaction<'c, sqlx::MySql>,
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
    mut query: MysqlQuery<'q>,
    params: &ParameterSet,
) -> Result<MysqlQuery<'q>, DatabaseError> {
    for value in params.values()? {
        query = bind_value(query, value);
    }
    Ok(query)
}

/// Binds one value to the next placeholder. MySQL has native unsigned
/// integers, so `Value::UInt` binds losslessly.
fn bind_value(query: MysqlQuery<'_>, value: Value) -> MysqlQuery<'_> {
    match value {
        // ParameterSet::set never accepts Value::Default.
        Value::Null | Value::Default => query.bind(Option::<i64>::None),
        Value::Bool(b) => query.bind(b),
        Value::Int(i) => query.bind(i),
        Value::UInt(u) => query.bind(u),
        Value::Float(f) => query.bind(f),
        Value::Text(s) => query.bind(s),
        Value::Blob(b) => query.bind(b),
        Value::Date(d) => query.bind(d),
        Value::DateTime(dt) => query.bind(dt),
        Value::Time(t) => query.bind(t),
    }
}

fn decode_row(spec: &RowSpec, row: &MySqlRow) -> Result<Row, DatabaseError> {
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
    row: &MySqlRow,
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
        ValueType::UnsignedIntegral => row
            .try_get::<Option<u64>, _>(index)?
            .map_or(Value::Null, Value::UInt),
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
