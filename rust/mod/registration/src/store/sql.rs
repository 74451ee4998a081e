use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use regdesk_core::ServiceError;
use regdesk_sql::{Row, SQLError, SQLStore, Value};

use super::{RecordQuery, RecordStore, schema};
use crate::model::{Registration, RegistrationId};

const TABLE: &str = "registrations";

/// [`RecordStore`] over any [`SQLStore`].
pub struct SqlRecordStore {
    sql: Arc<dyn SQLStore>,
}

impl SqlRecordStore {
    /// Wrap `sql`, creating the table and indexes if missing.
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Self { sql })
    }
}

/// Fixed-width UTC timestamp for the sortable index columns.
fn sort_key(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn storage_err(e: SQLError) -> ServiceError {
    match e {
        SQLError::Constraint(msg) => ServiceError::Conflict(msg),
        other => ServiceError::Storage(other.to_string()),
    }
}

fn encode(record: &Registration) -> Result<String, ServiceError> {
    serde_json::to_string(record).map_err(|e| ServiceError::Internal(e.to_string()))
}

fn decode(row: &Row) -> Result<Registration, ServiceError> {
    let data = row
        .get_str("data")
        .ok_or_else(|| ServiceError::Storage("missing data column".into()))?;
    serde_json::from_str(data)
        .map_err(|e| ServiceError::Storage(format!("corrupt registration row: {e}")))
}

impl RecordStore for SqlRecordStore {
    fn insert(&self, record: &Registration) -> Result<(), ServiceError> {
        let sql = format!(
            "INSERT INTO {TABLE} (registration_id, data, faculty, gender, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
        );
        self.sql
            .exec(
                &sql,
                &[
                    Value::from(record.registration_id.as_str()),
                    Value::Text(encode(record)?),
                    Value::from(record.faculty.as_str()),
                    Value::from(record.gender.as_str()),
                    Value::Text(sort_key(&record.created_at)),
                    Value::Text(sort_key(&record.updated_at)),
                ],
            )
            .map_err(storage_err)?;
        debug!(id = %record.registration_id, "inserted registration");
        Ok(())
    }

    fn get(&self, id: &RegistrationId) -> Result<Option<Registration>, ServiceError> {
        let sql = format!("SELECT data FROM {TABLE} WHERE registration_id = ?1");
        self.sql
            .query_one(&sql, &[Value::from(id.as_str())])
            .map_err(storage_err)?
            .map(|row| decode(&row))
            .transpose()
    }

    fn list(&self, query: &RecordQuery) -> Result<Vec<Registration>, ServiceError> {
        let mut sql = format!("SELECT data FROM {TABLE}");
        let mut params = Vec::new();

        if let Some(faculty) = query.faculty {
            params.push(Value::from(faculty.as_str()));
            sql.push_str(&format!(" WHERE faculty = ?{}", params.len()));
        }

        // rowid breaks ties between records created in the same microsecond.
        sql.push_str(" ORDER BY created_at DESC, rowid DESC");

        if let Some(limit) = query.limit {
            params.push(Value::Integer(limit as i64));
            sql.push_str(&format!(" LIMIT ?{}", params.len()));
        }

        let rows = self.sql.query(&sql, &params).map_err(storage_err)?;
        rows.iter().map(decode).collect()
    }

    fn count(&self) -> Result<u64, ServiceError> {
        let sql = format!("SELECT COUNT(*) AS cnt FROM {TABLE}");
        let row = self.sql.query_one(&sql, &[]).map_err(storage_err)?;
        Ok(row.and_then(|r| r.get_i64("cnt")).unwrap_or(0) as u64)
    }

    fn update(&self, record: &Registration) -> Result<(), ServiceError> {
        // created_at is not in the SET list: the column is write-once.
        let sql = format!(
            "UPDATE {TABLE} SET data = ?1, faculty = ?2, gender = ?3, updated_at = ?4 \
             WHERE registration_id = ?5"
        );
        let affected = self
            .sql
            .exec(
                &sql,
                &[
                    Value::Text(encode(record)?),
                    Value::from(record.faculty.as_str()),
                    Value::from(record.gender.as_str()),
                    Value::Text(sort_key(&record.updated_at)),
                    Value::from(record.registration_id.as_str()),
                ],
            )
            .map_err(storage_err)?;

        if affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "registration '{}' not found",
                record.registration_id
            )));
        }
        debug!(id = %record.registration_id, "updated registration");
        Ok(())
    }
}
