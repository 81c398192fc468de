//! Question to SQL, SQL to table, table to answer.

use std::sync::Arc;

use brain_core::{BrainError, ChatMessage, LanguageModel};
use database::scoped_query::run_scoped_query;
use database::{Database, DatabaseError, QueryTable};
use tracing::debug;

use crate::prompts::{query_prompt, SUMMARY_PROMPT};

/// Strip markdown fences the model may wrap SQL in.
///
/// Removes a leading "```sql", then a leading "```", then a trailing "```",
/// then surrounding whitespace.
pub fn clean_sql_response(raw: &str) -> String {
    let mut sql = raw;
    if let Some(rest) = sql.strip_prefix("```sql") {
        sql = rest;
    }
    if let Some(rest) = sql.strip_prefix("```") {
        sql = rest;
    }
    if let Some(rest) = sql.trim_end().strip_suffix("```") {
        sql = rest;
    }
    sql.trim().to_string()
}

/// Answers data questions against the requester's own workout sets.
///
/// The three steps are exposed separately so the caller can bound and log
/// each one.
pub struct QueryEngine {
    model: Arc<dyn LanguageModel>,
    db: Database,
}

impl QueryEngine {
    pub fn new(model: Arc<dyn LanguageModel>, db: Database) -> Self {
        Self { model, db }
    }

    /// Ask the model for one SELECT statement and clean it.
    pub async fn generate(&self, user_id: i64, question: &str) -> Result<String, BrainError> {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let messages = [
            ChatMessage::system(query_prompt(user_id, &today)),
            ChatMessage::user(question),
        ];

        let raw = self.model.generate_text(&messages).await?;
        let sql = clean_sql_response(&raw);
        debug!(user_id, sql = %sql, "Generated query");
        Ok(sql)
    }

    /// Run the statement over the user's rows in a rolled-back transaction.
    pub async fn execute(&self, user_id: i64, sql: &str) -> Result<QueryTable, DatabaseError> {
        let table = run_scoped_query(self.db.pool(), user_id, sql).await?;
        debug!(user_id, rows = table.rows.len(), "Query executed");
        Ok(table)
    }

    /// Turn the rendered table into an answer to the question.
    pub async fn summarize(&self, question: &str, table: &QueryTable) -> Result<String, BrainError> {
        let messages = [
            ChatMessage::system(SUMMARY_PROMPT),
            ChatMessage::user(question),
            ChatMessage::system(table.render()),
        ];
        self.model.generate_text(&messages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::{workout_set, NewWorkoutSet};
    use mock_brain::ScriptedModel;

    #[test]
    fn test_clean_sql_response() {
        assert_eq!(clean_sql_response("```sql\nSELECT 1;\n```"), "SELECT 1;");
        assert_eq!(clean_sql_response("SELECT 1;"), "SELECT 1;");
        assert_eq!(clean_sql_response("```\nSELECT 2\n```\n"), "SELECT 2");
        assert_eq!(clean_sql_response("  SELECT 3  "), "SELECT 3");
    }

    async fn engine(model: ScriptedModel) -> (QueryEngine, Arc<ScriptedModel>) {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        workout_set::insert_workout_set(db.pool(), 1, &NewWorkoutSet::new("squat", 5, 100.0))
            .await
            .unwrap();
        let model = Arc::new(model);
        (QueryEngine::new(model.clone(), db), model)
    }

    #[tokio::test]
    async fn test_generate_cleans_and_scopes_prompt() {
        let (engine, model) =
            engine(ScriptedModel::new().with_text("```sql\nSELECT MAX(weight) FROM workout_sets\n```")).await;

        let sql = engine.generate(1, "best squat?").await.unwrap();

        assert_eq!(sql, "SELECT MAX(weight) FROM workout_sets");
        let prompt = &model.text_calls()[0][0];
        assert!(prompt.content.contains("user_id = 1"));
    }

    #[tokio::test]
    async fn test_summarize_sees_question_and_table() {
        let (engine, model) = engine(ScriptedModel::new().with_text("Your best squat is 100 kg.")).await;

        let table = engine
            .execute(1, "SELECT MAX(weight) AS best FROM workout_sets WHERE user_id = 1")
            .await
            .unwrap();
        let answer = engine.summarize("best squat?", &table).await.unwrap();

        assert_eq!(answer, "Your best squat is 100 kg.");
        let messages = &model.text_calls()[0];
        assert_eq!(messages[1], ChatMessage::user("best squat?"));
        assert_eq!(messages[2].content, "Query Results:\nbest\n100.00");
    }

    #[tokio::test]
    async fn test_execute_rejects_writes() {
        let (engine, _) = engine(ScriptedModel::new()).await;
        let result = engine.execute(1, "DELETE FROM workout_sets").await;
        assert!(matches!(result, Err(DatabaseError::RejectedQuery(_))));
    }
}
