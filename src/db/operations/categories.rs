use serde::{Deserialize, Serialize};
use sqlx::any::AnyRow;
use sqlx::{AnyConnection, Row};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

fn map_category_row(row: &AnyRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

pub async fn list_categories(conn: &mut AnyConnection) -> Result<Vec<Category>, sqlx::Error> {
    let rows = sqlx::query("SELECT id, name FROM categories ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;
    rows.iter().map(map_category_row).collect()
}

pub async fn insert_category(
    conn: &mut AnyConnection,
    name: &str,
) -> Result<Category, sqlx::Error> {
    let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
        .bind(name)
        .execute(&mut *conn)
        .await?;
    let id = super::inserted_id(conn, &result).await?;

    Ok(Category {
        id,
        name: name.to_string(),
    })
}

/// Returns the number of rows matched by the rename.
pub async fn rename_category(
    conn: &mut AnyConnection,
    id: i64,
    name: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
        .bind(name)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn category_exists(conn: &mut AnyConnection, id: i64) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT id FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

/// Words in a deleted category stay, uncategorized.
pub async fn detach_words(conn: &mut AnyConnection, category_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE words SET category_id = NULL WHERE category_id = ?")
        .bind(category_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_category(conn: &mut AnyConnection, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}
