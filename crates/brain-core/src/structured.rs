//! Schema-constrained generation helpers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::BrainError;
use crate::trait_def::LanguageModel;

/// A named JSON schema that a structured generation must conform to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseShape {
    /// Schema name sent to the provider.
    pub name: String,
    /// Short description of what the schema captures.
    pub description: String,
    /// The JSON schema itself.
    pub schema: Value,
    /// Whether the provider must follow the schema exactly.
    pub strict: bool,
}

impl ResponseShape {
    /// Create a strict shape.
    pub fn strict(name: impl Into<String>, description: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            strict: true,
        }
    }

    /// Shape of a single-field classification answer: `{"category": <label>}`.
    pub fn label_choice(labels: &[&str]) -> Self {
        Self::strict(
            "Classifier",
            "Classify the user input into exactly one of the allowed categories",
            json!({
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "category": {
                        "type": "string",
                        "enum": labels,
                        "description": "The category of the user input."
                    }
                },
                "required": ["category"]
            }),
        )
    }
}

/// Run a structured generation and decode it into `T`.
///
/// Any value that does not decode into `T` is reported as
/// [`BrainError::InvalidResponse`]; there is no partial decoding.
pub async fn generate_typed<T: DeserializeOwned>(
    model: &dyn LanguageModel,
    instructions: &str,
    text: &str,
    shape: &ResponseShape,
) -> Result<T, BrainError> {
    let value = model.generate_structured(instructions, text, shape).await?;
    serde_json::from_value(value).map_err(|e| {
        BrainError::InvalidResponse(format!("response does not match '{}': {}", shape.name, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_choice_lists_labels() {
        let shape = ResponseShape::label_choice(&["insert", "query", "chat"]);
        assert!(shape.strict);
        assert_eq!(
            shape.schema["properties"]["category"]["enum"],
            json!(["insert", "query", "chat"])
        );
        assert_eq!(shape.schema["required"], json!(["category"]));
    }
}
