//! Structured extraction of exercises and sets.

use std::sync::Arc;

use brain_core::{generate_typed, BrainError, LanguageModel, ResponseShape};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use tracing::debug;

use crate::prompts::EXTRACTOR_PROMPT;

/// Every exercise found in one message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExerciseList {
    pub exercises: Vec<ExerciseRecord>,
}

/// One exercise and its sets. Names are not unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExerciseRecord {
    #[serde(rename = "exercise", deserialize_with = "non_blank")]
    pub exercise_name: String,
    #[serde(rename = "exercise_sets")]
    pub sets: Vec<ExerciseSet>,
}

/// A single set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExerciseSet {
    #[serde(rename = "n_reps")]
    pub reps: u8,
    /// Kilograms
    pub weight: f32,
}

fn non_blank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let name = String::deserialize(deserializer)?;
    if name.trim().is_empty() {
        return Err(serde::de::Error::custom("exercise name is empty"));
    }
    Ok(name)
}

impl ExerciseList {
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn set_count(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }
}

/// Shape the model must answer extraction requests in.
pub fn exercise_list_shape() -> ResponseShape {
    ResponseShape::strict(
        "exercises",
        "Exercises extracted from the user's message",
        json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "exercises": {
                    "type": "array",
                    "description": "List of exercises, each with its own sets.",
                    "items": {
                        "type": "object",
                        "additionalProperties": false,
                        "properties": {
                            "exercise": {
                                "type": "string",
                                "minLength": 1,
                                "description": "Exercise name"
                            },
                            "exercise_sets": {
                                "type": "array",
                                "description": "The sets of the exercise.",
                                "items": {
                                    "type": "object",
                                    "additionalProperties": false,
                                    "properties": {
                                        "n_reps": {
                                            "type": "integer",
                                            "minimum": 0,
                                            "maximum": 255,
                                            "description": "Number of reps in the set"
                                        },
                                        "weight": {
                                            "type": "number",
                                            "description": "Weight of the set in kilograms (kg)"
                                        }
                                    },
                                    "required": ["n_reps", "weight"]
                                }
                            }
                        },
                        "required": ["exercise", "exercise_sets"]
                    }
                }
            },
            "required": ["exercises"]
        }),
    )
}

/// Turns a workout description into an [`ExerciseList`].
pub struct Extractor {
    model: Arc<dyn LanguageModel>,
    shape: ResponseShape,
}

impl Extractor {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            shape: exercise_list_shape(),
        }
    }

    /// Extract exercises. An answer off the shape fails as a whole.
    pub async fn extract(&self, user_input: &str) -> Result<ExerciseList, BrainError> {
        let list: ExerciseList =
            generate_typed(self.model.as_ref(), EXTRACTOR_PROMPT, user_input, &self.shape).await?;
        debug!(
            exercises = list.exercises.len(),
            sets = list.set_count(),
            "Extracted workout"
        );
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_brain::ScriptedModel;

    #[tokio::test]
    async fn test_extract_decodes_wire_shape() {
        let model = ScriptedModel::new().with_structured(json!({
            "exercises": [
                {"exercise": "squats", "exercise_sets": [
                    {"n_reps": 10, "weight": 60},
                    {"n_reps": 8, "weight": 70.5}
                ]}
            ]
        }));
        let extractor = Extractor::new(Arc::new(model));

        let list = extractor.extract("squats").await.unwrap();
        assert_eq!(list.exercises[0].exercise_name, "squats");
        assert_eq!(list.exercises[0].sets[1], ExerciseSet { reps: 8, weight: 70.5 });
        assert_eq!(list.set_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_list_is_valid() {
        let model = ScriptedModel::new().with_structured(json!({"exercises": []}));
        let list = Extractor::new(Arc::new(model)).extract("nothing").await.unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_off_shape_answers_fail() {
        let answers = [
            json!({"exercises": [{"exercise": "squat", "exercise_sets": [{"n_reps": 300, "weight": 1}]}]}),
            json!({"exercises": [{"exercise": "squat", "exercise_sets": [], "notes": "x"}]}),
            json!({"exercises": [{"exercise": "squat"}]}),
            json!({"workouts": []}),
            json!({"exercises": [{"exercise": "", "exercise_sets": [{"n_reps": 5, "weight": 80}]}]}),
            json!({"exercises": [{"exercise": "  ", "exercise_sets": []}]}),
        ];

        for answer in answers {
            let model = ScriptedModel::new().with_structured(answer.clone());
            let result = Extractor::new(Arc::new(model)).extract("squat").await;
            assert!(
                matches!(result, Err(BrainError::InvalidResponse(_))),
                "expected failure for {}",
                answer
            );
        }
    }

    #[test]
    fn test_shape_is_strict() {
        let shape = exercise_list_shape();
        assert!(shape.strict);
        assert_eq!(shape.schema["additionalProperties"], false);
        assert_eq!(shape.schema["required"], json!(["exercises"]));
        assert_eq!(
            shape.schema["properties"]["exercises"]["items"]["properties"]["exercise"]["minLength"],
            1
        );
    }
}
