//! Multistep - the non-visual core of a multi-step form/wizard.
//!
//! Provides an ordered list of [`Part`] definitions, index-derived
//! navigation [`Controls`], a result accumulator with partial and
//! validated-complete views, and a [`Stepper`] orchestrator with an
//! optional async [`ComputeGate`] per step.
//!
//! Rendering, animation, and form binding are the caller's concern: the
//! presentation layer consumes [`ActiveStep`], [`Direction::signum`], and
//! [`StepperState`], and drives the machine through [`Stepper::next`],
//! [`Stepper::back`], and [`Stepper::set_step`].
//!
//! ```
//! use multistep::{Part, Stepper};
//!
//! let parts = vec![
//!     Part::builder("welcome", "Welcome").build(),
//!     Part::builder("confirm", "Confirm").build(),
//! ];
//! let stepper = Stepper::builder(parts).build()?;
//!
//! assert_eq!(stepper.current_step(), "welcome");
//! assert!(stepper.controls().has_next());
//! # Ok::<(), multistep::StepperError>(())
//! ```

pub mod aggregate;
pub mod controls;
pub mod error;
pub mod part;
pub mod schema;
pub mod stepper;

pub use aggregate::{FinishProbe, WizardResult};
pub use controls::{Controls, NextStep};
pub use error::StepperError;
pub use part::{ComputeGate, DefaultsFn, GateVerdict, OutputMap, Part, PartBuilder};
pub use schema::{FieldSpec, FieldType, OutputSchema, SchemaViolation};
pub use stepper::{ActiveStep, Advance, Direction, Stepper, StepperBuilder, StepperState};
