use crate::db::config::DbBackend;
use crate::db::{Database, DbError};

const MYSQL_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(255) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS words (
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        english VARCHAR(255) NOT NULL,
        spanish VARCHAR(255) NOT NULL,
        category_id BIGINT NULL,
        progress BIGINT NOT NULL DEFAULT 0,
        CONSTRAINT fk_words_category FOREIGN KEY (category_id)
            REFERENCES categories (id) ON DELETE SET NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS racha (
        date DATE NOT NULL PRIMARY KEY
    )
    "#,
];

// Progress is held to 32 bits: sqlx decodes SQLite integers through `Any` as
// i32, and an overflowing sum would otherwise be stored as REAL.
const SQLITE_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS words (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        english TEXT NOT NULL,
        spanish TEXT NOT NULL,
        category_id INTEGER NULL REFERENCES categories (id) ON DELETE SET NULL,
        progress INTEGER NOT NULL DEFAULT 0
            CHECK (progress BETWEEN -2147483648 AND 2147483647)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS racha (
        date TEXT NOT NULL PRIMARY KEY
    )
    "#,
];

pub fn statements(backend: DbBackend) -> &'static [&'static str] {
    match backend {
        DbBackend::MySql => MYSQL_SCHEMA,
        DbBackend::Sqlite => SQLITE_SCHEMA,
    }
}

/// Creates missing tables. Existing tables are never altered.
pub async fn ensure_schema(db: &Database) -> Result<(), DbError> {
    let mut conn = db.acquire().await?;
    for stmt in statements(db.backend()) {
        db.bounded(sqlx::query(stmt.trim()).execute(&mut *conn))
            .await?;
    }
    tracing::info!(backend = db.backend().as_str(), "schema ensured");
    Ok(())
}
