//! Index-based navigation over an ordered part list.
//!
//! Controls never store their own step pointer. Every operation derives the
//! position from the authoritative current id held by the stepper, so the
//! navigation view cannot drift from the state it describes.

use crate::error::StepperError;
use crate::part::Part;

/// Outcome of asking the controls for the following step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// There is a following part with this id
    Moved(String),
    /// Already at the last part; the traversal is finished
    Finished,
}

/// Read-only navigation view over `(parts, current step id)`.
#[derive(Debug, Clone, Copy)]
pub struct Controls<'a> {
    parts: &'a [Part],
    step: &'a str,
}

impl<'a> Controls<'a> {
    pub(crate) fn new(parts: &'a [Part], step: &'a str) -> Self {
        Self { parts, step }
    }

    /// The current step id.
    pub fn step(&self) -> &'a str {
        self.step
    }

    /// Position of the current step, `None` if the id is not in the list.
    pub fn index(&self) -> Option<usize> {
        self.parts.iter().position(|p| p.id == self.step)
    }

    /// Id of the immediately following part, or [`NextStep::Finished`] when
    /// already at the last index.
    pub fn next(&self) -> Result<NextStep, StepperError> {
        let index = self.index().ok_or_else(|| self.unknown_step())?;
        match self.parts.get(index + 1) {
            Some(part) => Ok(NextStep::Moved(part.id.clone())),
            None => Ok(NextStep::Finished),
        }
    }

    /// Id of the immediately preceding part, `None` at the first index or
    /// when the current id is not in the list.
    pub fn back(&self) -> Option<&'a str> {
        match self.index() {
            Some(index) if index > 0 => Some(&self.parts[index - 1].id),
            _ => None,
        }
    }

    /// The part definition at the current step.
    pub fn part(&self) -> Result<&'a Part, StepperError> {
        let index = self.index().ok_or_else(|| self.unknown_step())?;
        Ok(&self.parts[index])
    }

    /// Whether a following part exists.
    pub fn has_next(&self) -> bool {
        self.index().is_some_and(|i| i + 1 < self.parts.len())
    }

    /// Whether a preceding part exists.
    pub fn has_previous(&self) -> bool {
        self.index().is_some_and(|i| i > 0)
    }

    fn unknown_step(&self) -> StepperError {
        StepperError::UnknownStep {
            part_id: self.step.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts() -> Vec<Part> {
        vec![
            Part::builder("welcome", "Welcome").build(),
            Part::builder("account", "Account").build(),
            Part::builder("confirm", "Confirm").build(),
        ]
    }

    #[test]
    fn test_index_of_first_step_is_zero() {
        let parts = parts();
        let controls = Controls::new(&parts, "welcome");
        assert_eq!(controls.index(), Some(0));
    }

    #[test]
    fn test_index_of_unknown_step_is_none() {
        let parts = parts();
        let controls = Controls::new(&parts, "missing");
        assert_eq!(controls.index(), None);
    }

    #[test]
    fn test_next_yields_following_part() {
        let parts = parts();
        let controls = Controls::new(&parts, "welcome");
        assert_eq!(
            controls.next().unwrap(),
            NextStep::Moved("account".to_string())
        );
    }

    #[test]
    fn test_next_at_last_index_is_finished() {
        let parts = parts();
        let controls = Controls::new(&parts, "confirm");
        assert_eq!(controls.next().unwrap(), NextStep::Finished);
    }

    #[test]
    fn test_next_with_unknown_step_is_config_error() {
        let parts = parts();
        let controls = Controls::new(&parts, "missing");
        let err = controls.next().unwrap_err();
        assert!(err.is_config_error());
        assert_eq!(err.part_id(), Some("missing"));
    }

    #[test]
    fn test_back_at_first_index_returns_none() {
        let parts = parts();
        let controls = Controls::new(&parts, "welcome");
        assert_eq!(controls.back(), None);
    }

    #[test]
    fn test_back_yields_preceding_part() {
        let parts = parts();
        let controls = Controls::new(&parts, "confirm");
        assert_eq!(controls.back(), Some("account"));
    }

    #[test]
    fn test_back_with_unknown_step_returns_none() {
        let parts = parts();
        let controls = Controls::new(&parts, "missing");
        assert_eq!(controls.back(), None);
    }

    #[test]
    fn test_boundary_predicates() {
        let parts = parts();

        let first = Controls::new(&parts, "welcome");
        assert!(first.has_next());
        assert!(!first.has_previous());

        let last = Controls::new(&parts, "confirm");
        assert!(!last.has_next());
        assert!(last.has_previous());
    }

    #[test]
    fn test_part_returns_current_definition() {
        let parts = parts();
        let controls = Controls::new(&parts, "account");
        assert_eq!(controls.part().unwrap().title, "Account");
    }
}
