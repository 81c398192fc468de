//! Read-only execution of generated SQL, confined to one user's rows.
//!
//! A generated statement is checked before it runs:
//! - exactly one statement, starting with `SELECT` or `WITH`
//! - no write, DDL or session keywords
//! - no reference to any table other than `workout_sets`, nor to a schema
//!
//! It is then wrapped so that the name `workout_sets` resolves to a CTE
//! holding only the requester's rows:
//!
//! ```text
//! WITH workout_sets AS (SELECT * FROM main.workout_sets WHERE user_id = ?) <statement>
//! ```
//!
//! The wrapped statement runs inside a transaction that is always rolled back.

use sqlx::{Executor, SqlitePool};
use tracing::{debug, warn};

use crate::error::{DatabaseError, Result};
use crate::table::QueryTable;

/// The only table a generated statement may read.
pub const QUERYABLE_TABLE: &str = "workout_sets";

const SCOPE_CTE: &str =
    "workout_sets AS (SELECT * FROM main.workout_sets WHERE user_id = ?1)";

const FORBIDDEN_KEYWORDS: &[&str] = &[
    "insert", "update", "delete", "drop", "create", "alter", "attach", "detach", "pragma",
    "vacuum", "reindex", "analyze", "begin", "commit", "rollback", "savepoint", "release",
    "load_extension", "returning",
];

const FORBIDDEN_NAMES: &[&str] = &["messages", "users", "main", "temp", "_sqlx_migrations"];

const FORBIDDEN_PREFIXES: &[&str] = &["sqlite_", "pragma_"];

#[derive(Debug, Clone, PartialEq)]
struct Word {
    text: String,
    start: usize,
    end: usize,
}

#[derive(Debug, Default)]
struct Lexed {
    words: Vec<Word>,
    /// Byte offsets of `;` outside literals and comments.
    semicolons: Vec<usize>,
}

/// Split a statement into lower-cased words, skipping literals and comments.
///
/// Quoted identifiers (`"x"`, `` `x` ``, `[x]`) count as words.
fn lex(sql: &str) -> Result<Lexed> {
    let bytes = sql.as_bytes();
    let mut lexed = Lexed::default();
    let mut i = 0;

    let unterminated = |what: &str| DatabaseError::RejectedQuery(format!("unterminated {}", what));

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b'\'' => {
                i += 1;
                loop {
                    match bytes.get(i) {
                        None => return Err(unterminated("string literal")),
                        Some(b'\'') if bytes.get(i + 1) == Some(&b'\'') => i += 2,
                        Some(b'\'') => break,
                        Some(_) => i += 1,
                    }
                }
                i += 1;
            }
            b'"' | b'`' | b'[' => {
                let close = if c == b'[' { b']' } else { c };
                let start = i + 1;
                let end = bytes[start..]
                    .iter()
                    .position(|&b| b == close)
                    .map(|offset| start + offset)
                    .ok_or_else(|| unterminated("quoted identifier"))?;
                lexed.words.push(Word {
                    text: sql[start..end].to_ascii_lowercase(),
                    start: i,
                    end: end + 1,
                });
                i = end + 1;
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                i = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(bytes.len(), |offset| i + offset);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = sql[i + 2..]
                    .find("*/")
                    .map(|offset| i + 2 + offset + 2)
                    .ok_or_else(|| unterminated("comment"))?;
            }
            b';' => {
                lexed.semicolons.push(i);
                i += 1;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'$') {
                    i += 1;
                }
                lexed.words.push(Word {
                    text: sql[start..i].to_ascii_lowercase(),
                    start,
                    end: i,
                });
            }
            _ => i += 1,
        }
    }

    Ok(lexed)
}

/// Validate a generated statement and wrap it in the per-user scope.
///
/// The returned SQL expects the user id bound as its first parameter.
pub fn scope_to_user(sql: &str) -> Result<String> {
    let reject = |reason: String| Err(DatabaseError::RejectedQuery(reason));

    let sql = sql.trim();
    let lexed = lex(sql)?;

    // A single trailing semicolon is tolerated.
    let body = match lexed.semicolons.as_slice() {
        [] => sql,
        [last] if sql[*last + 1..].trim().is_empty() => sql[..*last].trim_end(),
        _ => return reject("multiple statements".to_string()),
    };

    let Some(first) = lexed.words.first() else {
        return reject("empty statement".to_string());
    };

    for (i, word) in lexed.words.iter().enumerate() {
        let text = word.text.as_str();
        if FORBIDDEN_KEYWORDS.contains(&text) {
            return reject(format!("keyword '{}' is not allowed", text));
        }
        // `REPLACE INTO` is a write; `replace(x, y, z)` is a string function.
        if text == "replace" && lexed.words.get(i + 1).is_some_and(|next| next.text == "into") {
            return reject("keyword 'replace' is not allowed".to_string());
        }
        if FORBIDDEN_NAMES.contains(&text)
            || FORBIDDEN_PREFIXES.iter().any(|prefix| text.starts_with(prefix))
        {
            return reject(format!("'{}' is not queryable", text));
        }
    }

    match first.text.as_str() {
        "select" => Ok(format!("WITH {} {}", SCOPE_CTE, body)),
        "with" => {
            // Merge into the statement's own WITH clause, keeping RECURSIVE.
            let (keyword, rest_start) = match lexed.words.get(1) {
                Some(second) if second.text == "recursive" => ("WITH RECURSIVE", second.end),
                _ => ("WITH", first.end),
            };
            Ok(format!("{} {}, {}", keyword, SCOPE_CTE, body[rest_start..].trim_start()))
        }
        other => reject(format!("statement must start with SELECT or WITH, found '{}'", other)),
    }
}

/// Run a generated read statement against one user's workout sets.
///
/// The transaction is rolled back whether or not the statement succeeds.
pub async fn run_scoped_query(pool: &SqlitePool, user_id: i64, sql: &str) -> Result<QueryTable> {
    let scoped = scope_to_user(sql).inspect_err(|e| warn!(user_id, error = %e, "Refused generated query"))?;
    debug!(user_id, sql = %scoped, "Running scoped query");

    let mut tx = pool.begin().await?;
    let fetched = sqlx::query(&scoped).bind(user_id).fetch_all(&mut *tx).await;

    let columns = match &fetched {
        Ok(rows) if rows.is_empty() => (&mut *tx)
            .describe(&scoped)
            .await
            .map(|describe| describe.columns().iter().map(|c| sqlx::Column::name(c).to_string()).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    tx.rollback().await?;

    let rows = fetched?;
    QueryTable::from_rows(columns, &rows)
}
