use chrono::NaiveDate;
use sqlx::{AnyConnection, Row};

/// Calendar-day key stored in `racha.date`.
pub fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Number of distinct days recorded. Gaps are not detected.
pub async fn count_days(conn: &mut AnyConnection) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS total FROM racha")
        .fetch_one(&mut *conn)
        .await?;
    row.try_get("total")
}

/// Records `day` once. Returns `false` when it was already present.
pub async fn record_day(conn: &mut AnyConnection, day: NaiveDate) -> Result<bool, sqlx::Error> {
    let key = day_key(day);

    let existing = sqlx::query("SELECT 1 AS present FROM racha WHERE date = ?")
        .bind(&key)
        .fetch_optional(&mut *conn)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    match sqlx::query("INSERT INTO racha (date) VALUES (?)")
        .bind(&key)
        .execute(&mut *conn)
        .await
    {
        Ok(_) => Ok(true),
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Ok(false),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_key_is_iso_date() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(day_key(day), "2024-03-07");
    }
}
