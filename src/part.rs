//! Part definitions: the static description of one wizard step.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::schema::OutputSchema;

/// One submitted step output, a flat JSON object.
pub type OutputMap = Map<String, Value>;

/// Derives a step's initial form values from its prior submission.
///
/// Called each time the step becomes active with whatever was previously
/// submitted for that id (an empty object on first visit). Must be pure.
pub type DefaultsFn = Arc<dyn Fn(&OutputMap) -> OutputMap + Send + Sync>;

/// Verdict returned by a [`ComputeGate`].
#[derive(Debug, Clone, Default)]
pub struct GateVerdict {
    /// Whether navigation may proceed
    pub is_valid: bool,
    /// Extra data the gate hands back to the submitter
    pub extra: OutputMap,
}

impl GateVerdict {
    /// A verdict that lets navigation proceed.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            extra: OutputMap::new(),
        }
    }

    /// A verdict that keeps the stepper on the current step.
    pub fn invalid() -> Self {
        Self {
            is_valid: false,
            extra: OutputMap::new(),
        }
    }

    /// Attach an extra value for the submitter.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Async validation/side-effect hook run before a step's output is accepted
/// and navigation proceeds.
///
/// The stepper is `submitting` while a check is in flight. Returning a
/// verdict with `is_valid == false` is the normal negative path and keeps
/// the current step; returning `Err` surfaces as
/// [`StepperError::Compute`](crate::StepperError::Compute).
#[async_trait]
pub trait ComputeGate: Send + Sync {
    /// Inspect the candidate output and decide whether navigation proceeds.
    ///
    /// The output is a snapshot taken at the moment of submission; the
    /// stepper does not mutate it while the check is pending.
    async fn check(&self, output: &OutputMap) -> Result<GateVerdict>;
}

/// Static definition of a single step in a wizard.
///
/// Parts are immutable for the lifetime of a stepper instance. A part either
/// carries an output schema (it contributes to the aggregated result and is
/// required for completion) or it does not (a purely informational step).
#[derive(Clone)]
pub struct Part {
    /// Unique step id
    pub id: String,
    /// Display label (presentation only)
    pub title: String,
    /// Output contract; `None` for output-less steps
    pub schema: Option<OutputSchema>,
    pub(crate) defaults: Option<DefaultsFn>,
    pub(crate) gate: Option<Arc<dyn ComputeGate>>,
}

impl Part {
    /// Start building a part with the given id and display title.
    pub fn builder(id: impl Into<String>, title: impl Into<String>) -> PartBuilder {
        PartBuilder {
            part: Part {
                id: id.into(),
                title: title.into(),
                schema: None,
                defaults: None,
                gate: None,
            },
        }
    }

    /// Whether this part contributes output to the aggregated result.
    pub fn has_output(&self) -> bool {
        self.schema.is_some()
    }

    /// Initial form values for this step given its prior submission.
    ///
    /// Without a defaults function the step starts from an empty object,
    /// matching a first visit.
    pub(crate) fn initial_values(&self, prior: &OutputMap) -> OutputMap {
        match &self.defaults {
            Some(defaults) => defaults(prior),
            None => OutputMap::new(),
        }
    }
}

impl fmt::Debug for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Part")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("schema", &self.schema)
            .field("has_defaults", &self.defaults.is_some())
            .field("has_gate", &self.gate.is_some())
            .finish()
    }
}

/// Fluent constructor for [`Part`].
pub struct PartBuilder {
    part: Part,
}

impl PartBuilder {
    /// Declare the output contract for this part.
    pub fn schema(mut self, schema: OutputSchema) -> Self {
        self.part.schema = Some(schema);
        self
    }

    /// Derive initial form values from the prior submission for this id.
    pub fn defaults<F>(mut self, defaults: F) -> Self
    where
        F: Fn(&OutputMap) -> OutputMap + Send + Sync + 'static,
    {
        self.part.defaults = Some(Arc::new(defaults));
        self
    }

    /// Attach an async gate that must approve submissions before the
    /// stepper advances past this part.
    pub fn gate(mut self, gate: impl ComputeGate + 'static) -> Self {
        self.part.gate = Some(Arc::new(gate));
        self
    }

    /// Finish building the part.
    pub fn build(self) -> Part {
        self.part
    }
}
