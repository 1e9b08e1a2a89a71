use serde::{Deserialize, Serialize};
use sqlx::any::AnyRow;
use sqlx::{AnyConnection, Row};

/// Progress every new word starts at.
pub const INITIAL_PROGRESS: i64 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: i64,
    pub english: String,
    pub spanish: String,
    pub category_id: Option<i64>,
    pub progress: i64,
}

/// Caller-editable fields. Progress only moves through [`add_progress`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewWord {
    pub english: String,
    pub spanish: String,
    #[serde(default)]
    pub category_id: Option<i64>,
}

fn map_word_row(row: &AnyRow) -> Result<Word, sqlx::Error> {
    Ok(Word {
        id: row.try_get("id")?,
        english: row.try_get("english")?,
        spanish: row.try_get("spanish")?,
        category_id: row.try_get("category_id")?,
        progress: row.try_get("progress")?,
    })
}

pub async fn list_words(conn: &mut AnyConnection) -> Result<Vec<Word>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT id, english, spanish, category_id, progress FROM words ORDER BY id",
    )
    .fetch_all(&mut *conn)
    .await?;
    rows.iter().map(map_word_row).collect()
}

pub async fn select_word(conn: &mut AnyConnection, id: i64) -> Result<Option<Word>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, english, spanish, category_id, progress FROM words WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    row.as_ref().map(map_word_row).transpose()
}

pub async fn insert_word(conn: &mut AnyConnection, word: &NewWord) -> Result<Word, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO words (english, spanish, category_id, progress) VALUES (?, ?, ?, ?)",
    )
    .bind(&word.english)
    .bind(&word.spanish)
    .bind(word.category_id)
    .bind(INITIAL_PROGRESS)
    .execute(&mut *conn)
    .await?;
    let id = super::inserted_id(conn, &result).await?;

    Ok(Word {
        id,
        english: word.english.clone(),
        spanish: word.spanish.clone(),
        category_id: word.category_id,
        progress: INITIAL_PROGRESS,
    })
}

pub async fn update_word(
    conn: &mut AnyConnection,
    id: i64,
    word: &NewWord,
) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("UPDATE words SET english = ?, spanish = ?, category_id = ? WHERE id = ?")
            .bind(&word.english)
            .bind(&word.spanish)
            .bind(word.category_id)
            .bind(id)
            .execute(&mut *conn)
            .await?;
    Ok(result.rows_affected())
}

pub async fn select_progress(conn: &mut AnyConnection, id: i64) -> Result<Option<i64>, sqlx::Error> {
    let row = sqlx::query("SELECT progress FROM words WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    row.map(|row| row.try_get("progress")).transpose()
}

/// Adds `points` to the stored counter. No bounds: negative points lower it.
pub async fn add_progress(
    conn: &mut AnyConnection,
    id: i64,
    points: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE words SET progress = progress + ? WHERE id = ?")
        .bind(points)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn word_exists(conn: &mut AnyConnection, id: i64) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT id FROM words WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

pub async fn delete_word(conn: &mut AnyConnection, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM words WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}
