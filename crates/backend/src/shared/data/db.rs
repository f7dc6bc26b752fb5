use once_cell::sync::OnceCell;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};
use std::path::Path;

use crate::domain;
use crate::shared::config::{self, Config};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

const AUDIT_LOG_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS audit_log (
        id TEXT PRIMARY KEY NOT NULL,
        entity_type TEXT NOT NULL,
        entity_id TEXT NOT NULL,
        operation TEXT NOT NULL,
        old_values TEXT,
        new_values TEXT,
        actor TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
"#;

const AUDIT_LOG_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_audit_log_entity
        ON audit_log (entity_type, entity_id, created_at);
"#;

const SAVED_VIEWS_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS saved_views (
        id TEXT PRIMARY KEY NOT NULL,
        endpoint TEXT NOT NULL,
        name TEXT NOT NULL,
        columns TEXT NOT NULL,
        sorts TEXT NOT NULL,
        filters TEXT NOT NULL,
        page_size INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
"#;

const SAVED_VIEWS_INDEX: &str = r#"
    CREATE UNIQUE INDEX IF NOT EXISTS uq_saved_views_endpoint_name
        ON saved_views (endpoint, name);
"#;

/// Open the configured database file and install it as the global connection
pub async fn initialize_database(config: &Config) -> anyhow::Result<()> {
    let db_path = config::get_database_path(config)?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = connect(&sqlite_url(&db_path)).await?;
    tracing::info!("Database ready at {}", db_path.display());

    if DB_CONN.set(conn).is_err() {
        anyhow::bail!("Database connection already initialized");
    }
    Ok(())
}

fn sqlite_url(path: &Path) -> String {
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

/// Connect and create any missing tables. `sqlite::memory:` is held on a
/// single connection so every query sees the same database.
pub async fn connect(url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(url.to_string());
    options.sqlx_logging(false);
    if url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    let conn = Database::connect(options).await?;
    bootstrap_schema(&conn).await?;
    Ok(conn)
}

async fn execute(conn: &DatabaseConnection, sql: &str) -> anyhow::Result<()> {
    conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
        .await?;
    Ok(())
}

/// `CREATE TABLE IF NOT EXISTS` for every CRM table plus the audit log and
/// saved views
pub async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for collection in domain::COLLECTIONS {
        execute(conn, &collection.table.create_table_sql()).await?;
        for index in collection.table.index_sql() {
            execute(conn, &index).await?;
        }
    }
    execute(conn, AUDIT_LOG_DDL).await?;
    execute(conn, AUDIT_LOG_INDEX).await?;
    execute(conn, SAVED_VIEWS_DDL).await?;
    execute(conn, SAVED_VIEWS_INDEX).await?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

#[cfg(test)]
pub async fn memory() -> DatabaseConnection {
    connect("sqlite::memory:").await.unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let conn = memory().await;
        bootstrap_schema(&conn).await.unwrap();

        let rows = conn
            .query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type = 'table'".to_string(),
            ))
            .await
            .unwrap();
        let names: Vec<String> = rows
            .iter()
            .filter_map(|r| r.try_get::<String>("", "name").ok())
            .collect();
        for expected in ["contacts", "accounts", "opportunities", "tickets", "audit_log", "saved_views"] {
            assert!(names.iter().any(|n| n == expected), "missing table {expected}");
        }
    }

    #[test]
    fn file_urls_are_created_on_demand() {
        assert_eq!(
            sqlite_url(Path::new("/var/lib/crm/crm.db")),
            "sqlite:///var/lib/crm/crm.db?mode=rwc"
        );
        assert_eq!(
            sqlite_url(Path::new("C:\\crm\\crm.db")),
            "sqlite:///C:/crm/crm.db?mode=rwc"
        );
    }
}
