use crate::{
    error::{FieldError, Result, TaskError, ValidationErrors},
    models::{parse_due_date, NewTask, Status, TaskEdit, TaskInput},
};

/// Longest accepted task name, in characters
pub const MAX_NAME_LENGTH: usize = 200;

/// Validation utilities for task submissions.
///
/// Every check collects into a [`ValidationErrors`] list so a form can show
/// all of its problems at once instead of the first one.
pub struct TaskValidator;

impl TaskValidator {
    /// Validate a task name
    ///
    /// Task names must:
    /// - Not be empty or only whitespace
    /// - Be at most 200 characters long
    pub fn validate_task_name(name: &str) -> std::result::Result<(), FieldError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(FieldError::new("name", "The Name field is required"));
        }

        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(FieldError::new(
                "name",
                format!("Task name must be at most {MAX_NAME_LENGTH} characters long"),
            ));
        }

        Ok(())
    }

    /// Validate a complete NewTask structure
    ///
    /// # Returns
    /// * `Ok(())` - If the task is valid
    /// * `Err(TaskError::Validation)` - If any field is invalid
    pub fn validate_new_task(task: &NewTask) -> Result<()> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = Self::validate_task_name(&task.name) {
            errors.push(e);
        }
        if let Some(id) = task.id {
            if id <= 0 {
                errors.push(FieldError::new("id", "Task id must be positive"));
            }
        }
        errors.into_result()
    }

    /// Turn a create form into a [`NewTask`], collecting every field error
    pub fn validate_create(input: &TaskInput) -> Result<NewTask> {
        let mut errors = ValidationErrors::new();
        let fields = Self::validate_common(input, &mut errors);

        if let Some(id) = input.id {
            if id <= 0 {
                errors.push(FieldError::new("id", "Task id must be positive"));
            }
        }

        errors.into_result()?;
        let (name, due, status) = fields.ok_or_else(|| {
            TaskError::Internal("validated fields missing without errors".to_string())
        })?;

        Ok(NewTask {
            id: input.id,
            name,
            description: input.description.clone().unwrap_or_default(),
            due,
            status,
        })
    }

    /// Turn an edit form into a [`TaskEdit`], collecting every field error
    pub fn validate_edit(input: &TaskInput) -> Result<TaskEdit> {
        let mut errors = ValidationErrors::new();
        let fields = Self::validate_common(input, &mut errors);

        if input.id.is_none() {
            errors.push(FieldError::new("id", "The Id field is required"));
        }

        errors.into_result()?;
        let (Some(id), Some((name, due, status))) = (input.id, fields) else {
            return Err(TaskError::Internal(
                "validated fields missing without errors".to_string(),
            ));
        };

        Ok(TaskEdit {
            id,
            name,
            description: input.description.clone().unwrap_or_default(),
            due,
            status,
            version: input.version,
        })
    }

    /// Checks shared by create and edit. Returns the parsed fields when all
    /// of them are usable.
    fn validate_common(
        input: &TaskInput,
        errors: &mut ValidationErrors,
    ) -> Option<(String, chrono::NaiveDate, Status)> {
        let name = match input.name.as_deref() {
            Some(name) => match Self::validate_task_name(name) {
                Ok(()) => Some(name.to_string()),
                Err(e) => {
                    errors.push(e);
                    None
                }
            },
            None => {
                errors.push(FieldError::new("name", "The Name field is required"));
                None
            }
        };

        let due = match input.due.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => match parse_due_date(raw) {
                Ok(due) => Some(due),
                Err(e) => {
                    errors.push(e);
                    None
                }
            },
            _ => {
                errors.push(FieldError::new("due", "The Due field is required"));
                None
            }
        };

        let status = match input.status.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => match raw.parse::<Status>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.push(FieldError::new("status", format!("Unknown status '{raw}'")));
                    None
                }
            },
            _ => Some(Status::default()),
        };

        Some((name?, due?, status?))
    }
}
