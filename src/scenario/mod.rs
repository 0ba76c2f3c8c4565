//! Ordered tag scenarios and the runner that drives them
//!
//! A run moves through `RunStage`s: token, reference data, created tag,
//! updated tag. Cases that need an earlier stage declare it and fail with a
//! precondition error instead of running against missing state.

pub mod cases;
pub mod context;
pub mod report;
pub mod runner;

pub use cases::{CreateTag, CreateTagValidation, UpdateTagEvent};
pub use context::{EventTypeSelection, Prerequisite, RunStage, SuiteContext};
pub use report::{CaseReport, CaseStatus, RunReport};
pub use runner::{RunOptions, Scenario, ScenarioRunner, load_event_types, run_suite, setup};
