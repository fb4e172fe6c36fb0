//! Sequential CRUD test harness.
//!
//! A run walks a list of [`TestCase`](crate::models::TestCase)s against the
//! selected backend, one request at a time, recording each response and
//! checking it for an expected or forbidden substring.

mod backend;
mod report;
mod runner;
mod suite;

pub use backend::BackendRegistry;
pub use report::{RunOutcome, RunReport, StepReport};
pub use runner::{Harness, HarnessState};
pub use suite::load_suite;
