//! Flat textual rendering of query results.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::error::Result;

/// First line of every rendered table.
pub const TABLE_PREAMBLE: &str = "Query Results:";

/// Cell separator in header and rows.
pub const CELL_SEPARATOR: &str = " | ";

/// One decoded result cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bytes(Vec<u8>),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Timestamp(NaiveDateTime),
    Other(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("NULL"),
            CellValue::Bytes(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            CellValue::Integer(n) => write!(f, "{}", n),
            CellValue::Float(x) => write!(f, "{:.2}", x),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d")),
            CellValue::Other(text) => f.write_str(text),
        }
    }
}

impl CellValue {
    /// Decode column `index` of a row.
    ///
    /// The column's declared type picks booleans and timestamps; everything
    /// else follows the storage class of the value itself.
    pub fn decode(row: &SqliteRow, index: usize) -> Result<Self> {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(CellValue::Null);
        }
        let storage = raw.type_info().name().to_ascii_uppercase();
        let declared = row.columns()[index].type_info().name().to_ascii_uppercase();

        let cell = match declared.as_str() {
            "BOOLEAN" | "BOOL" if storage == "INTEGER" => {
                CellValue::Boolean(row.try_get_unchecked::<bool, _>(index)?)
            }
            "DATETIME" | "TIMESTAMP" | "DATE" if storage == "TEXT" => {
                let text = row.try_get_unchecked::<String, _>(index)?;
                parse_timestamp(&text).map_or(CellValue::Other(text), CellValue::Timestamp)
            }
            _ => match storage.as_str() {
                "INTEGER" => CellValue::Integer(row.try_get_unchecked::<i64, _>(index)?),
                "REAL" => CellValue::Float(row.try_get_unchecked::<f64, _>(index)?),
                "BLOB" => CellValue::Bytes(row.try_get_unchecked::<Vec<u8>, _>(index)?),
                _ => CellValue::Other(row.try_get_unchecked::<String, _>(index)?),
            },
        };

        Ok(cell)
    }
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// A fully materialized result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl QueryTable {
    /// Decode fetched rows. `columns` names the header when `rows` is empty.
    pub fn from_rows(columns: Vec<String>, rows: &[SqliteRow]) -> Result<Self> {
        let columns = match rows.first() {
            Some(first) => first.columns().iter().map(|c| c.name().to_string()).collect(),
            None => columns,
        };

        let rows = rows
            .iter()
            .map(|row| (0..row.len()).map(|i| CellValue::decode(row, i)).collect())
            .collect::<Result<Vec<Vec<CellValue>>>>()?;

        Ok(Self { columns, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as preamble, header, then one line per row.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(TABLE_PREAMBLE.to_string());
        lines.push(self.columns.join(CELL_SEPARATOR));
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
            lines.push(cells.join(CELL_SEPARATOR));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[test]
    fn test_cell_rendering() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let cases = [
            (CellValue::Null, "NULL"),
            (CellValue::Bytes(b"squat".to_vec()), "squat"),
            (CellValue::Integer(-42), "-42"),
            (CellValue::Float(62.5), "62.50"),
            (CellValue::Float(1.0 / 3.0), "0.33"),
            (CellValue::Boolean(true), "true"),
            (CellValue::Timestamp(date.and_hms_opt(18, 30, 0).unwrap()), "2024-03-09"),
            (CellValue::Other("bench".to_string()), "bench"),
        ];

        for (cell, expected) in cases {
            assert_eq!(cell.to_string(), expected);
        }
    }

    #[test]
    fn test_render_layout() {
        let table = QueryTable {
            columns: vec!["exercise".to_string(), "max".to_string()],
            rows: vec![
                vec![CellValue::Other("squat".to_string()), CellValue::Float(80.0)],
                vec![CellValue::Other("bench".to_string()), CellValue::Null],
            ],
        };

        assert_eq!(
            table.render(),
            "Query Results:\nexercise | max\nsquat | 80.00\nbench | NULL"
        );
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2024-01-02 03:04:05").is_some());
        assert!(parse_timestamp("2024-01-02").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[tokio::test]
    async fn test_decode_by_declared_type() {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        sqlx::query(
            "INSERT INTO users (id, phone, active, created_at) VALUES (1, '1', 1, '2024-05-06 07:08:09')",
        )
        .execute(db.pool())
        .await
        .unwrap();
        sqlx::query("INSERT INTO workout_sets (user_id, exercise, weight, reps) VALUES (1, 'squat', 60, 10)")
            .execute(db.pool())
            .await
            .unwrap();

        let users = sqlx::query("SELECT id, active, created_at FROM users")
            .fetch_all(db.pool())
            .await
            .unwrap();
        let table = QueryTable::from_rows(Vec::new(), &users).unwrap();
        assert_eq!(table.render(), "Query Results:\nid | active | created_at\n1 | true | 2024-05-06");

        let sets = sqlx::query("SELECT exercise, weight, reps FROM workout_sets")
            .fetch_all(db.pool())
            .await
            .unwrap();
        let table = QueryTable::from_rows(Vec::new(), &sets).unwrap();
        assert_eq!(table.rows[0][1], CellValue::Float(60.0));
        assert_eq!(table.rows[0][2], CellValue::Integer(10));
    }
}
