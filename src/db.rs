// ==========================================
// DUPA Estimator - SQLite connection bootstrap
// ==========================================
// Every connection gets the same PRAGMAs and busy_timeout.
// Schema is created once per process start; no cache invalidation.
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// schema_version written by `init_schema`
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Apply the shared PRAGMAs to a connection
///
/// foreign_keys and busy_timeout are per-connection settings.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the shared configuration
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create all tables (idempotent)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS dupa_template (
            template_id TEXT PRIMARY KEY,
            pay_item_number TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            document TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS labor_rate (
            location TEXT NOT NULL,
            district TEXT NOT NULL,
            designation TEXT NOT NULL,
            hourly_rate REAL NOT NULL,
            PRIMARY KEY (location, designation)
        );

        CREATE TABLE IF NOT EXISTS equipment_rate (
            equipment_id TEXT PRIMARY KEY,
            description TEXT NOT NULL,
            hourly_rate REAL,
            rental_rate REAL
        );

        CREATE TABLE IF NOT EXISTS material_price (
            price_id INTEGER PRIMARY KEY AUTOINCREMENT,
            material_code TEXT NOT NULL,
            description TEXT NOT NULL,
            unit TEXT NOT NULL,
            base_price REAL NOT NULL,
            location TEXT,
            effective_date TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_material_price_code ON material_price(material_code);

        CREATE TABLE IF NOT EXISTS project (
            project_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            location TEXT NOT NULL,
            hauling_json TEXT
        );

        CREATE TABLE IF NOT EXISTS boq_line_item (
            line_item_id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            template_id TEXT NOT NULL,
            instantiated_at TEXT NOT NULL,
            document TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_boq_line_item_project ON boq_line_item(project_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Read schema_version (None when the table does not exist)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
