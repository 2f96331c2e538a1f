//! Query executor: runs normalized statements against MySQL.
//!
//! A fresh connection is opened inside every call and released on every exit
//! path; nothing is held across turns or retries. Failures split into two
//! kinds the pipeline treats differently: the connection could not be
//! acquired, or the statement itself was rejected by the driver.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::{Column, Connection, Row as SqlxRow};
use tracing::{debug, error};

use crate::error::PipelineError;

/// One result row: field names mapped to JSON values, in column order.
pub type Row = serde_json::Map<String, Value>;

pub const NO_RESULTS: &str = "No results found.";

/// Render a result set for the transcript and the composer prompt.
pub fn render_rows(rows: &[Row]) -> String {
    if rows.is_empty() {
        return NO_RESULTS.to_string();
    }
    serde_json::to_string(rows).unwrap_or_else(|e| {
        error!("failed to render result rows: {}", e);
        "[]".to_string()
    })
}

/// Execution seam between the pipeline and the database.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    async fn execute(&self, statement: &str) -> Result<Vec<Row>, PipelineError>;
}

/// Executes statements against MySQL over a per-call connection.
pub struct MySqlExecutor {
    database_url: String,
}

impl MySqlExecutor {
    pub fn new(database_url: String) -> Self {
        Self { database_url }
    }

    async fn connect(&self) -> Result<MySqlConnection, PipelineError> {
        MySqlConnection::connect(&self.database_url)
            .await
            .map_err(|e| {
                error!("Database connection failed: {}", e);
                PipelineError::Connection(e.to_string())
            })
    }

    /// Startup connectivity check. A failure here is fatal to the process,
    /// not a per-turn error.
    pub async fn ping(&self) -> Result<(), PipelineError> {
        let mut conn = self.connect().await?;
        conn.ping().await.map_err(|e| {
            error!("Database ping failed: {}", e);
            PipelineError::Connection(e.to_string())
        })?;
        conn.close().await.ok();
        Ok(())
    }
}

#[async_trait]
impl StatementExecutor for MySqlExecutor {
    async fn execute(&self, statement: &str) -> Result<Vec<Row>, PipelineError> {
        let mut conn = self.connect().await?;

        // The connection drops, and with it closes, on the error path too.
        let fetched = sqlx::query(statement).fetch_all(&mut conn).await;
        let rows = match fetched {
            Ok(rows) => rows,
            Err(e) => {
                error!("Query failed: {}\nError: {}", statement, e);
                return Err(classify_fetch_error(e));
            }
        };

        conn.close().await.ok();

        let decoded: Vec<Row> = rows.iter().map(decode_row).collect();
        debug!("statement returned {} row(s)", decoded.len());
        Ok(decoded)
    }
}

/// A rejected statement carries the driver's message; a dead socket mid-query
/// is a connectivity failure, not a statement failure.
fn classify_fetch_error(e: sqlx::Error) -> PipelineError {
    match e {
        sqlx::Error::Database(db) => PipelineError::Execution(db.message().to_string()),
        sqlx::Error::Io(io) => PipelineError::Connection(io.to_string()),
        other => PipelineError::Unexpected(other.to_string()),
    }
}

fn decode_row(row: &MySqlRow) -> Row {
    let mut fields = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        fields.insert(column.name().to_string(), decode_cell(row, idx));
    }
    fields
}

/// Best-effort decode of a single cell into JSON. Tries the common MySQL
/// type families in order, then falls back to the raw text representation
/// (DECIMAL and friends arrive as text on the wire).
fn decode_cell(row: &MySqlRow, idx: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
        return v
            .map(|d| Value::from(d.to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDate>, _>(idx) {
        return v
            .map(|d| Value::from(d.to_string()))
            .unwrap_or(Value::Null);
    }
    match row.try_get_unchecked::<Option<String>, _>(idx) {
        Ok(v) => v.map(Value::from).unwrap_or(Value::Null),
        Err(_) => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_of(fields: &[(&str, Value)]) -> Row {
        let mut row = Row::new();
        for (name, value) in fields {
            row.insert(name.to_string(), value.clone());
        }
        row
    }

    // ===== Row Rendering =====

    #[test]
    fn test_empty_result_set_renders_sentinel() {
        assert_eq!(render_rows(&[]), NO_RESULTS);
    }

    #[test]
    fn test_rows_render_as_json_array_in_column_order() {
        let rows = vec![
            row_of(&[
                ("first_name", Value::from("Asha")),
                ("roll_no", Value::from(12)),
            ]),
            row_of(&[
                ("first_name", Value::from("Ravi")),
                ("roll_no", Value::from(15)),
            ]),
        ];
        assert_eq!(
            render_rows(&rows),
            r#"[{"first_name":"Asha","roll_no":12},{"first_name":"Ravi","roll_no":15}]"#
        );
    }

    #[test]
    fn test_null_values_render_as_json_null() {
        let rows = vec![row_of(&[
            ("scholarship_id", Value::Null),
            ("first_name", Value::from("Meera")),
        ])];
        assert_eq!(
            render_rows(&rows),
            r#"[{"scholarship_id":null,"first_name":"Meera"}]"#
        );
    }
}
