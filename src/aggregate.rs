//! Result accumulation across submitted step outputs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::StepperError;
use crate::part::{OutputMap, Part};

/// Accumulated wizard results: per-part outputs plus a flattened merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WizardResult {
    /// Last-submitted output per part id
    pub parts: HashMap<String, OutputMap>,
    /// Shallow merge of every submitted output, in submission order.
    ///
    /// Later submissions win for overlapping keys. This includes keys
    /// shared across different parts: the winner is decided by submission
    /// order, not declaration order.
    pub merged: OutputMap,
}

/// Mutable accumulator owned by the stepper.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    result: WizardResult,
}

impl Accumulator {
    /// Store an output under its part id and fold its fields into the merge.
    /// No validation happens here; validating the output is the part's
    /// responsibility before submission reaches the accumulator.
    pub(crate) fn submit(&mut self, step_id: &str, output: OutputMap) {
        for (key, value) in &output {
            self.result.merged.insert(key.clone(), value.clone());
        }
        self.result.parts.insert(step_id.to_string(), output);
    }

    /// The last-submitted output for a part id, if any.
    pub(crate) fn saved(&self, step_id: &str) -> Option<&OutputMap> {
        self.result.parts.get(step_id)
    }

    /// Clone the accumulated result as it stands.
    pub(crate) fn snapshot(&self) -> WizardResult {
        self.result.clone()
    }
}

/// Result accessors handed to the finish callback.
///
/// The probe snapshots the accumulator at the moment the traversal reaches
/// the end; `partial` is always available, `complete` verifies that every
/// output-bearing part has submitted.
#[derive(Debug, Clone)]
pub struct FinishProbe {
    result: WizardResult,
    required: Vec<String>,
}

impl FinishProbe {
    pub(crate) fn new(result: WizardResult, parts: &[Part]) -> Self {
        let required = parts
            .iter()
            .filter(|p| p.has_output())
            .map(|p| p.id.clone())
            .collect();
        Self { result, required }
    }

    /// Everything gathered so far, possibly incomplete. Useful for
    /// autosave-style inspection without forcing full completion.
    pub fn partial(&self) -> &WizardResult {
        &self.result
    }

    /// The fully-populated result.
    ///
    /// Fails with [`StepperError::Incomplete`] naming the first
    /// output-bearing part (in declaration order) that has not submitted.
    pub fn complete(&self) -> Result<&WizardResult, StepperError> {
        for part_id in &self.required {
            if !self.result.parts.contains_key(part_id) {
                return Err(StepperError::Incomplete {
                    part_id: part_id.clone(),
                });
            }
        }
        Ok(&self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, FieldType, OutputSchema};
    use serde_json::json;

    fn output(value: serde_json::Value) -> OutputMap {
        value.as_object().expect("test output must be an object").clone()
    }

    fn parts() -> Vec<Part> {
        vec![
            Part::builder("welcome", "Welcome").build(),
            Part::builder("account", "Account")
                .schema(OutputSchema::new(vec![FieldSpec::required(
                    "email",
                    FieldType::String,
                )]))
                .build(),
            Part::builder("plan", "Plan")
                .schema(OutputSchema::new(vec![FieldSpec::required(
                    "tier",
                    FieldType::String,
                )]))
                .build(),
        ]
    }

    #[test]
    fn test_submit_round_trip() {
        let mut acc = Accumulator::default();
        acc.submit("account", output(json!({"email": "ada@example.com"})));

        let snapshot = acc.snapshot();
        assert_eq!(
            snapshot.parts["account"].get("email"),
            Some(&json!("ada@example.com"))
        );
        assert_eq!(snapshot.merged.get("email"), Some(&json!("ada@example.com")));
    }

    #[test]
    fn test_resubmission_replaces_part_entry() {
        let mut acc = Accumulator::default();
        acc.submit("account", output(json!({"email": "ada@example.com"})));
        acc.submit("account", output(json!({"email": "grace@example.com"})));

        let snapshot = acc.snapshot();
        assert_eq!(
            snapshot.parts["account"].get("email"),
            Some(&json!("grace@example.com"))
        );
        assert_eq!(
            snapshot.merged.get("email"),
            Some(&json!("grace@example.com"))
        );
    }

    #[test]
    fn test_merge_last_submission_wins_across_parts() {
        let mut acc = Accumulator::default();
        acc.submit("account", output(json!({"contact": "ada@example.com"})));
        acc.submit("plan", output(json!({"contact": "billing@example.com"})));

        let snapshot = acc.snapshot();
        assert_eq!(
            snapshot.merged.get("contact"),
            Some(&json!("billing@example.com"))
        );
        // Per-part entries keep each step's own submission
        assert_eq!(
            snapshot.parts["account"].get("contact"),
            Some(&json!("ada@example.com"))
        );
    }

    #[test]
    fn test_complete_fails_naming_first_missing_part() {
        let parts = parts();
        let mut acc = Accumulator::default();
        acc.submit("plan", output(json!({"tier": "pro"})));

        let probe = FinishProbe::new(acc.snapshot(), &parts);
        let err = probe.complete().unwrap_err();
        assert_eq!(err.part_id(), Some("account"));
    }

    #[test]
    fn test_complete_ignores_output_less_parts() {
        let parts = parts();
        let mut acc = Accumulator::default();
        acc.submit("account", output(json!({"email": "ada@example.com"})));
        acc.submit("plan", output(json!({"tier": "pro"})));

        // "welcome" never submits anything and is not required
        let probe = FinishProbe::new(acc.snapshot(), &parts);
        let result = probe.complete().unwrap();
        assert_eq!(result.merged.get("tier"), Some(&json!("pro")));
    }

    #[test]
    fn test_partial_is_always_available() {
        let parts = parts();
        let probe = FinishProbe::new(Accumulator::default().snapshot(), &parts);
        assert!(probe.partial().parts.is_empty());
        assert!(probe.complete().is_err());
    }
}
