//! Perft regression suites loaded from TOML files.
//!
//! A suite is a list of `[[case]]` tables, each naming a position, a depth
//! and the expected leaf count:
//!
//! ```toml
//! [[case]]
//! name = "startpos"
//! fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
//! depth = 3
//! nodes = 8902
//! ```

use std::path::Path;
use std::time::{Duration, Instant};

use chess_movegen::{perft_divide_parallel, Position, PositionError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or running a suite.
#[derive(Error, Debug)]
pub enum SuiteError {
    /// Failed to read the suite file from disk.
    #[error("Failed to read suite file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the suite file as valid TOML.
    #[error("Failed to parse suite: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A case holds a FEN that does not describe a valid position.
    #[error("case '{name}': {source}")]
    InvalidPosition {
        name: String,
        #[source]
        source: PositionError,
    },
}

/// One expected perft count.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PerftCase {
    pub name: String,
    pub fen: String,
    pub depth: u32,
    pub nodes: u64,
}

/// A list of perft cases.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct PerftSuite {
    #[serde(default, rename = "case")]
    pub cases: Vec<PerftCase>,
}

/// Result of running one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    pub name: String,
    pub depth: u32,
    pub expected: u64,
    pub actual: u64,
    pub elapsed: Duration,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

impl PerftSuite {
    /// Reads and parses a suite file.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::ReadError`] if the file cannot be read, or
    /// [`SuiteError::ParseError`] if it is not a valid suite.
    pub fn load(path: &Path) -> Result<Self, SuiteError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses a suite from TOML text.
    pub fn parse(content: &str) -> Result<Self, SuiteError> {
        Ok(toml::from_str(content)?)
    }

    /// Runs every case, splitting root moves over `threads` workers.
    ///
    /// All FENs are validated before any counting starts.
    pub fn run(&self, threads: usize) -> Result<Vec<CaseOutcome>, SuiteError> {
        let positions = self
            .cases
            .iter()
            .map(|case| {
                Position::from_fen(&case.fen).map_err(|source| SuiteError::InvalidPosition {
                    name: case.name.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let outcomes = self
            .cases
            .iter()
            .zip(&positions)
            .map(|(case, position)| {
                let started = Instant::now();
                let actual = perft_divide_parallel(position, case.depth, threads).total;
                let outcome = CaseOutcome {
                    name: case.name.clone(),
                    depth: case.depth,
                    expected: case.nodes,
                    actual,
                    elapsed: started.elapsed(),
                };
                if outcome.passed() {
                    tracing::info!(case = %case.name, depth = case.depth, nodes = actual, "case passed");
                } else {
                    tracing::warn!(
                        case = %case.name,
                        depth = case.depth,
                        expected = case.nodes,
                        actual,
                        "case failed"
                    );
                }
                outcome
            })
            .collect();

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUITE: &str = r#"
[[case]]
name = "startpos"
fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
depth = 2
nodes = 400

[[case]]
name = "wrong on purpose"
fen = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -"
depth = 1
nodes = 15
"#;

    #[test]
    fn parses_cases() {
        let suite = PerftSuite::parse(SUITE).unwrap();
        assert_eq!(suite.cases.len(), 2);
        assert_eq!(suite.cases[0].name, "startpos");
        assert_eq!(suite.cases[0].depth, 2);
        assert_eq!(suite.cases[1].nodes, 15);
    }

    #[test]
    fn empty_suite_is_valid() {
        let suite = PerftSuite::parse("").unwrap();
        assert!(suite.cases.is_empty());
        assert!(suite.run(1).unwrap().is_empty());
    }

    #[test]
    fn run_reports_pass_and_fail() {
        let outcomes = PerftSuite::parse(SUITE).unwrap().run(2).unwrap();
        assert!(outcomes[0].passed());
        assert_eq!(outcomes[0].actual, 400);
        assert!(!outcomes[1].passed());
        assert_eq!(outcomes[1].actual, 14);
    }

    #[test]
    fn rejects_bad_fen_before_running() {
        let suite = PerftSuite::parse(
            r#"
[[case]]
name = "broken"
fen = "8/8/8 w - -"
depth = 1
nodes = 0
"#,
        )
        .unwrap();
        let err = suite.run(1).unwrap_err();
        assert!(matches!(err, SuiteError::InvalidPosition { ref name, .. } if name == "broken"));
    }

    #[test]
    fn rejects_missing_fields() {
        let err = PerftSuite::parse("[[case]]\nname = \"x\"\n").unwrap_err();
        assert!(matches!(err, SuiteError::ParseError(_)));
    }

    #[test]
    fn bundled_suite_parses() {
        let suite = PerftSuite::parse(include_str!("../suites/standard.toml")).unwrap();
        assert_eq!(suite.cases.len(), 5);
        for case in &suite.cases {
            assert!(Position::from_fen(&case.fen).is_ok(), "{}", case.name);
        }
    }
}
