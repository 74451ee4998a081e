use regdesk_core::ServiceError;
use regdesk_sql::SQLStore;

/// DDL for the registrations table.
///
/// The full record lives as JSON in `data`; the columns next to it are
/// copies used for filtering, ordering and uniqueness. `created_at` and
/// `updated_at` are fixed-width RFC 3339 strings, so text order is time
/// order.
const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS registrations (
        registration_id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        faculty TEXT NOT NULL,
        gender TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_reg_faculty ON registrations(faculty);
    CREATE INDEX IF NOT EXISTS idx_reg_created ON registrations(created_at);
";

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    sql.exec_batch(SCHEMA)
        .map_err(|e| ServiceError::Storage(format!("schema init failed: {e}")))
}
