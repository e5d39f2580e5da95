use serde::Deserialize;

use crate::error::FieldError;

/// Submitted add-task form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub description: String,
}

impl TaskForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        if self.description.trim().is_empty() {
            Err(vec![FieldError::new(
                "description",
                "description must not be empty",
            )])
        } else {
            Ok(())
        }
    }
}
