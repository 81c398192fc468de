//! Per-request conversation state.

use std::fmt;

use brain_core::{ChatMessage, Role};
use database::{NewMessage, NewWorkoutSet};

use crate::extractor::ExerciseList;

/// Intent of one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Insert,
    Query,
    Chat,
    /// A label outside the three known ones, carried verbatim.
    Unrecognized(String),
}

impl Category {
    /// Labels offered to the classifier.
    pub const LABELS: [&'static str; 3] = ["insert", "query", "chat"];

    /// Map a classifier label. Matching is exact.
    pub fn from_label(label: &str) -> Self {
        match label {
            "insert" => Category::Insert,
            "query" => Category::Query,
            "chat" => Category::Chat,
            other => Category::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Insert => "insert",
            Category::Query => "query",
            Category::Chat => "chat",
            Category::Unrecognized(label) => label,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State threaded through one request.
///
/// Built once the message is classified and dropped after the reply; nothing
/// here outlives the request. `messages` starts with the user's message and
/// only grows.
#[derive(Debug, Clone)]
pub struct ConversationState {
    user_id: i64,
    user_input: String,
    category: Category,
    messages: Vec<ChatMessage>,
    exercise_list: Option<ExerciseList>,
}

impl ConversationState {
    pub fn new(user_id: i64, user_input: impl Into<String>, category: Category) -> Self {
        let user_input = user_input.into();
        Self {
            user_id,
            messages: vec![ChatMessage::user(user_input.clone())],
            user_input,
            category,
            exercise_list: None,
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn user_input(&self) -> &str {
        &self.user_input
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn exercise_list(&self) -> Option<&ExerciseList> {
        self.exercise_list.as_ref()
    }

    /// Append the turn's reply.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    pub fn set_exercise_list(&mut self, exercises: ExerciseList) {
        self.exercise_list = Some(exercises);
    }

    /// The reply, if the last message is one.
    pub fn last_assistant(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }

    /// True when the messages end with exactly one assistant entry.
    pub fn is_complete(&self) -> bool {
        let trailing = self
            .messages
            .iter()
            .rev()
            .take_while(|m| m.role == Role::Assistant)
            .count();
        trailing == 1
    }

    /// Messages as storage rows.
    pub fn new_messages(&self) -> Vec<NewMessage> {
        self.messages
            .iter()
            .filter_map(|m| match m.role {
                Role::User => Some(NewMessage::user(m.content.clone())),
                Role::Assistant => Some(NewMessage::assistant(m.content.clone())),
                Role::System => None,
            })
            .collect()
    }

    /// One storage row per (exercise, set) pair.
    pub fn new_workout_sets(&self) -> Vec<NewWorkoutSet> {
        self.exercise_list
            .iter()
            .flat_map(|list| list.exercises.iter())
            .flat_map(|record| {
                record
                    .sets
                    .iter()
                    .map(|set| NewWorkoutSet::new(record.exercise_name.clone(), set.reps, set.weight))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{ExerciseRecord, ExerciseSet};

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::from_label("insert"), Category::Insert);
        assert_eq!(Category::from_label("query"), Category::Query);
        assert_eq!(Category::from_label("chat"), Category::Chat);
        assert_eq!(
            Category::from_label("Chat"),
            Category::Unrecognized("Chat".to_string())
        );
        assert_eq!(Category::from_label("delete").to_string(), "delete");
    }

    #[test]
    fn test_state_starts_with_user_message() {
        let state = ConversationState::new(1, "hi", Category::Chat);
        assert_eq!(state.messages(), &[ChatMessage::user("hi")]);
        assert!(!state.is_complete());
        assert_eq!(state.last_assistant(), None);
    }

    #[test]
    fn test_complete_after_one_reply() {
        let mut state = ConversationState::new(1, "hi", Category::Chat);
        state.push_assistant("hello");
        assert!(state.is_complete());
        assert_eq!(state.last_assistant(), Some("hello"));

        state.push_assistant("again");
        assert!(!state.is_complete());
    }

    #[test]
    fn test_rows_flatten_exercises() {
        let mut state = ConversationState::new(1, "bench and row", Category::Insert);
        state.set_exercise_list(ExerciseList {
            exercises: vec![
                ExerciseRecord {
                    exercise_name: "bench".to_string(),
                    sets: vec![ExerciseSet { reps: 5, weight: 80.0 }, ExerciseSet { reps: 5, weight: 85.0 }],
                },
                ExerciseRecord {
                    exercise_name: "row".to_string(),
                    sets: vec![ExerciseSet { reps: 12, weight: 40.0 }],
                },
            ],
        });
        state.push_assistant("workout saved");

        let sets = state.new_workout_sets();
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[2], NewWorkoutSet::new("row", 12, 40.0));
        assert_eq!(
            state.new_messages(),
            vec![NewMessage::user("bench and row"), NewMessage::assistant("workout saved")]
        );
    }
}
