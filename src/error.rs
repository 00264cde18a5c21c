//! Error types for stepper construction, navigation, and result access.

use thiserror::Error;

use crate::schema::SchemaViolation;

/// Errors raised by the stepper state machine.
#[derive(Error, Debug)]
pub enum StepperError {
    /// The part list was empty, so there is no valid starting step.
    #[error("a stepper requires at least one part")]
    EmptyParts,

    /// Two parts in the list share the same id.
    #[error("duplicate part id '{part_id}'")]
    DuplicateId { part_id: String },

    /// A referenced step id does not exist in the part list.
    #[error("step '{part_id}' not found in parts")]
    UnknownStep { part_id: String },

    /// `complete()` was called before this output-bearing part submitted.
    #[error("part '{part_id}' is not complete")]
    Incomplete { part_id: String },

    /// The candidate output did not satisfy the part's output schema.
    #[error("output for part '{part_id}' failed validation ({} issue(s))", violations.len())]
    Schema {
        part_id: String,
        violations: Vec<SchemaViolation>,
    },

    /// A submission is already in flight; the caller should disable
    /// submission triggers while the stepper is submitting.
    #[error("a submission is already in flight")]
    Busy,

    /// The compute gate itself failed. A negative verdict is not an error
    /// and is reported through the submit outcome instead.
    #[error("compute gate failed: {0}")]
    Compute(#[source] anyhow::Error),
}

impl StepperError {
    /// Check if this error indicates a caller bug in the wizard definition
    /// rather than a runtime condition. Configuration errors are fatal and
    /// not meant to be recovered from.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StepperError::EmptyParts
                | StepperError::DuplicateId { .. }
                | StepperError::UnknownStep { .. }
        )
    }

    /// Get the part id this error refers to, if any.
    pub fn part_id(&self) -> Option<&str> {
        match self {
            StepperError::DuplicateId { part_id }
            | StepperError::UnknownStep { part_id }
            | StepperError::Incomplete { part_id }
            | StepperError::Schema { part_id, .. } => Some(part_id),
            _ => None,
        }
    }
}
