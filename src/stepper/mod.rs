//! Stepper orchestrator: owns the current-step state and wires navigation,
//! result aggregation, and the optional compute gate together.

use std::collections::HashSet;
use std::fmt;

use crate::aggregate::{Accumulator, FinishProbe, WizardResult};
use crate::controls::{Controls, NextStep};
use crate::error::StepperError;
use crate::part::{GateVerdict, OutputMap, Part};


/// Direction of the most recent navigation.
///
/// Derived purely from comparing the old and new step index. Informs
/// presentation (slide/transition effects) and never controls logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// No navigation has happened yet
    #[default]
    Initial,
    /// The last move went to a later index
    Forward,
    /// The last move went to an earlier index
    Back,
}

impl Direction {
    /// Signed presentation value: `+1` forward, `-1` back, `0` initial.
    pub fn signum(self) -> i8 {
        match self {
            Direction::Initial => 0,
            Direction::Forward => 1,
            Direction::Back => -1,
        }
    }
}

/// Runtime state of the stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepperState {
    /// Accepting submissions and navigation
    #[default]
    Idle,
    /// A compute gate is in flight; submissions and back-navigation are
    /// rejected until it resolves
    Submitting,
}

/// Outcome of submitting the current step.
#[derive(Debug)]
pub enum Advance {
    /// Moved to the following step
    Moved(GateVerdict),
    /// Submitted from the last step; the finish notification fired
    Finished(GateVerdict),
    /// The compute gate declined; no movement, nothing aggregated
    Rejected(GateVerdict),
}

/// Everything the presentation layer needs to render the active step.
///
/// Handed out explicitly instead of through ambient context: whoever renders
/// a step receives the part definition and its initial values, and drives
/// the machine through the stepper it already holds.
#[derive(Debug)]
pub struct ActiveStep<'a> {
    /// The part definition at the current step
    pub part: &'a Part,
    /// Initial form values derived from the prior submission for this id
    pub defaults: OutputMap,
}

type StepCallback = Box<dyn FnMut(&str) + Send>;
type FinishCallback = Box<dyn FnMut(&FinishProbe) + Send>;

/// Builder for [`Stepper`]. Construction fails fast on configuration
/// errors: an empty part list, duplicate ids, or an unknown start step.
pub struct StepperBuilder {
    parts: Vec<Part>,
    start_step: Option<String>,
    on_step_change: Option<StepCallback>,
    on_finish: Option<FinishCallback>,
}

impl StepperBuilder {
    /// Start building a stepper over the given ordered part list.
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            parts,
            start_step: None,
            on_step_change: None,
            on_finish: None,
        }
    }

    /// Start at this step instead of the first part.
    pub fn start_step(mut self, id: impl Into<String>) -> Self {
        self.start_step = Some(id.into());
        self
    }

    /// Called with the new step id after every navigation.
    pub fn on_step_change(mut self, callback: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_step_change = Some(Box::new(callback));
        self
    }

    /// Called each time the traversal reaches the end, with accessors for
    /// the partial and validated-complete result.
    pub fn on_finish(mut self, callback: impl FnMut(&FinishProbe) + Send + 'static) -> Self {
        self.on_finish = Some(Box::new(callback));
        self
    }

    /// Validate the configuration and build the stepper.
    pub fn build(self) -> Result<Stepper, StepperError> {
        let first = self
            .parts
            .first()
            .ok_or(StepperError::EmptyParts)?
            .id
            .clone();

        // Ensure each part has a unique id
        let mut seen = HashSet::new();
        for part in &self.parts {
            if !seen.insert(part.id.as_str()) {
                return Err(StepperError::DuplicateId {
                    part_id: part.id.clone(),
                });
            }
        }

        let step = match self.start_step {
            Some(id) => {
                if !self.parts.iter().any(|p| p.id == id) {
                    return Err(StepperError::UnknownStep { part_id: id });
                }
                id
            }
            None => first,
        };

        tracing::debug!(step = %step, parts = self.parts.len(), "stepper initialized");

        Ok(Stepper {
            parts: self.parts,
            step,
            direction: Direction::Initial,
            state: StepperState::Idle,
            results: Accumulator::default(),
            on_step_change: self.on_step_change,
            on_finish: self.on_finish,
        })
    }
}

/// The wizard state machine.
///
/// Owns the authoritative current step id, the direction of travel, the
/// idle/submitting state, and the result accumulator. Lives exactly as long
/// as one wizard traversal; nothing persists beyond the instance.
pub struct Stepper {
    parts: Vec<Part>,
    step: String,
    direction: Direction,
    state: StepperState,
    results: Accumulator,
    on_step_change: Option<StepCallback>,
    on_finish: Option<FinishCallback>,
}

impl Stepper {
    /// Start building a stepper over the given ordered part list.
    pub fn builder(parts: Vec<Part>) -> StepperBuilder {
        StepperBuilder::new(parts)
    }

    /// The authoritative current step id.
    pub fn current_step(&self) -> &str {
        &self.step
    }

    /// Direction of the most recent navigation.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Current runtime state.
    pub fn state(&self) -> StepperState {
        self.state
    }

    /// The ordered part list this stepper was built with.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Navigation view bound to the current step.
    pub fn controls(&self) -> Controls<'_> {
        Controls::new(&self.parts, &self.step)
    }

    /// Snapshot of everything gathered so far, possibly incomplete.
    pub fn results(&self) -> WizardResult {
        self.results.snapshot()
    }

    /// Result accessors over the current accumulator, independent of the
    /// finish callback.
    pub fn finish_probe(&self) -> FinishProbe {
        FinishProbe::new(self.results.snapshot(), &self.parts)
    }

    /// Render contract for the active step: the part definition plus its
    /// initial values, derived from whatever was previously submitted for
    /// this id (an empty object on first visit).
    pub fn active(&self) -> Result<ActiveStep<'_>, StepperError> {
        let part = self.controls().part()?;
        let defaults = match self.results.saved(&part.id) {
            Some(prior) => part.initial_values(prior),
            None => part.initial_values(&OutputMap::new()),
        };
        Ok(ActiveStep { part, defaults })
    }

    /// Submit the current step's output and request advancement.
    ///
    /// Runs the part's schema validation and compute gate where declared,
    /// forwards the output to the accumulator for output-bearing parts, and
    /// asks the controls to advance. Submitting from the last step fires the
    /// finish notification instead of moving.
    pub async fn next(&mut self, output: Option<OutputMap>) -> Result<Advance, StepperError> {
        if self.state == StepperState::Submitting {
            return Err(StepperError::Busy);
        }

        let part = self.controls().part()?.clone();
        let output = output.unwrap_or_default();

        if let Some(schema) = &part.schema {
            if let Err(violations) = schema.validate(&output) {
                return Err(StepperError::Schema {
                    part_id: part.id.clone(),
                    violations,
                });
            }
        }

        let verdict = if let Some(gate) = &part.gate {
            self.state = StepperState::Submitting;
            tracing::debug!(step = %part.id, "running compute gate");
            let outcome = gate.check(&output).await;
            // Cleared before any gate error propagates; the machine must
            // never stay in `Submitting` after the await resolves.
            self.state = StepperState::Idle;

            let verdict = outcome.map_err(StepperError::Compute)?;
            if !verdict.is_valid {
                tracing::debug!(step = %part.id, "compute gate declined");
                return Ok(Advance::Rejected(verdict));
            }
            verdict
        } else {
            GateVerdict::valid()
        };

        if part.has_output() {
            self.results.submit(&part.id, output);
        }

        match self.controls().next()? {
            NextStep::Moved(next_id) => {
                self.move_to(next_id, Direction::Forward);
                Ok(Advance::Moved(verdict))
            }
            NextStep::Finished => {
                self.fire_finish();
                Ok(Advance::Finished(verdict))
            }
        }
    }

    /// Move to the preceding step. Returns `false` at the first step.
    pub fn back(&mut self) -> Result<bool, StepperError> {
        if self.state == StepperState::Submitting {
            return Err(StepperError::Busy);
        }
        match self.controls().back() {
            Some(previous) => {
                let previous = previous.to_string();
                self.move_to(previous, Direction::Back);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Jump to an arbitrary step. Direction is derived from comparing the
    /// old and new index; jumping to the current step leaves it unchanged.
    pub fn set_step(&mut self, id: impl Into<String>) -> Result<(), StepperError> {
        let id = id.into();
        let new_index = self
            .parts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StepperError::UnknownStep {
                part_id: id.clone(),
            })?;

        let direction = match self.controls().index() {
            Some(old_index) if new_index > old_index => Direction::Forward,
            Some(old_index) if new_index < old_index => Direction::Back,
            _ => self.direction,
        };
        self.move_to(id, direction);
        Ok(())
    }

    /// Synchronize to an externally controlled step value. The external
    /// value is authoritative; no step-change notification fires.
    pub fn sync_step(&mut self, id: impl Into<String>) -> Result<(), StepperError> {
        let id = id.into();
        if !self.parts.iter().any(|p| p.id == id) {
            return Err(StepperError::UnknownStep { part_id: id });
        }
        tracing::debug!(step = %id, "step synced from external value");
        self.step = id;
        Ok(())
    }

    /// Synchronize to an externally controlled runtime state. The external
    /// value is authoritative.
    pub fn sync_state(&mut self, state: StepperState) {
        self.state = state;
    }

    fn move_to(&mut self, step: String, direction: Direction) {
        tracing::debug!(from = %self.step, to = %step, "step change");
        self.step = step;
        self.direction = direction;
        if let Some(callback) = self.on_step_change.as_mut() {
            callback(&self.step);
        }
    }

    fn fire_finish(&mut self) {
        tracing::debug!(step = %self.step, "traversal reached the end");
        let probe = FinishProbe::new(self.results.snapshot(), &self.parts);
        if let Some(callback) = self.on_finish.as_mut() {
            callback(&probe);
        }
    }
}

impl fmt::Debug for Stepper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stepper")
            .field("step", &self.step)
            .field("direction", &self.direction)
            .field("state", &self.state)
            .field("parts", &self.parts.len())
            .finish()
    }
}
