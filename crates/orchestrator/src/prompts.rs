//! System prompts for each pipeline step.

use brain_core::hash_prompt;
use tracing::info;

/// Classifier instructions.
pub const CLASSIFIER_PROMPT: &str = r#"Classify the user's message of a fitness app into exactly one category:
- insert: the message reports workout data such as exercises, sets, reps or weight.
- query: the message asks for information about the workouts already logged.
- chat: anything else.
Answer with the category only."#;

/// Extractor instructions.
pub const EXTRACTOR_PROMPT: &str = r#"Extract the workout session described in the user's message.
Identify every exercise and its sets. Each set has its own number of reps and weight in kilograms.
A phrase like "3 sets of 10 at 60kg" means three separate sets of 10 reps at 60 kg.
If a weight is given in pounds, convert it to kilograms."#;

/// Summarizer instructions.
pub const SUMMARY_PROMPT: &str = r#"You answer a user's question about their own workout data.
You receive the question and the query results that answer it.
Reply with the answer only, in the language of the question. Do not mention tables, queries or labels."#;

/// Default chat system prompt (fallback if no override is configured).
pub const DEFAULT_CHAT_PROMPT: &str = r#"You are a helpful assistant for a fitness app.
Let the user know they can log workouts by sending the exercise name, sets, reps and weight,
and that they can ask questions about the workouts they have logged.
The earlier messages of this conversation are included as context."#;

/// Instructions for turning a question into SQL for one user.
pub fn query_prompt(user_id: i64, today: &str) -> String {
    format!(
        r#"You generate SQL for the SQLite database of a fitness app.
Always include "user_id = {user_id}" in the WHERE clause.
Today's date is {today}.
The only table you may use is:
workout_sets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER,
    exercise TEXT,
    weight REAL,
    reps INTEGER,
    created_at DATETIME
);
Write exactly one SELECT statement.
Return ONLY the SQL, with no markdown, no code fences and no explanation."#
    )
}

/// Log a fingerprint of every prompt in use.
pub fn log_prompt_fingerprints(chat_prompt: &str) {
    info!(
        classifier = %hash_prompt(CLASSIFIER_PROMPT),
        extractor = %hash_prompt(EXTRACTOR_PROMPT),
        query = %hash_prompt(&query_prompt(0, "")),
        summary = %hash_prompt(SUMMARY_PROMPT),
        chat = %hash_prompt(chat_prompt),
        "Prompt fingerprints"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_prompt_names_user() {
        let prompt = query_prompt(5215512345678, "2026-01-02");
        assert!(prompt.contains("user_id = 5215512345678"));
        assert!(prompt.contains("2026-01-02"));
        assert!(prompt.contains("workout_sets"));
    }
}
