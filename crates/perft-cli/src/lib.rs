//! Support code for the `perft` binary: regression suites and output
//! rendering.

pub mod output;
pub mod suite;

pub use output::{render_divide, OutputFormat};
pub use suite::{CaseOutcome, PerftCase, PerftSuite, SuiteError};
