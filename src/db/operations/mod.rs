pub mod categories;
pub mod streak;
pub mod words;

use sqlx::any::AnyQueryResult;
use sqlx::AnyConnection;

/// Id assigned by the insert that produced `result`. The SQLite driver does
/// not report it through `Any`, so it is read back on the same connection.
pub(crate) async fn inserted_id(
    conn: &mut AnyConnection,
    result: &AnyQueryResult,
) -> Result<i64, sqlx::Error> {
    if let Some(id) = result.last_insert_id() {
        return Ok(id);
    }
    sqlx::query_scalar::<_, i64>("SELECT last_insert_rowid()")
        .fetch_one(&mut *conn)
        .await
}
