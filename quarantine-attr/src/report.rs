//! Per-target outcomes and the run summary.

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::QuarantineError;

#[derive(Debug)]
pub enum Outcome {
    Removed,
    NotPresent,
    /// Attribute found in check mode.
    Present,
    Failed(QuarantineError),
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Removed => "removed",
            Outcome::NotPresent => "clean",
            Outcome::Present => "quarantined",
            Outcome::Failed(_) => "failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

#[derive(Debug)]
pub struct OperationResult {
    pub path: PathBuf,
    pub outcome: Outcome,
}

impl OperationResult {
    pub fn new(path: PathBuf, outcome: Outcome) -> Self {
        Self { path, outcome }
    }
}

impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<12} {}", self.outcome.label(), self.path.display())?;
        if let Outcome::Failed(e) = &self.outcome {
            write!(f, ": {}", e)?;
        }
        Ok(())
    }
}

/// Results of one run, in input order.
#[derive(Debug, Default)]
pub struct Report {
    results: Vec<OperationResult>,
}

impl Report {
    pub fn new(results: Vec<OperationResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[OperationResult] {
        &self.results
    }

    pub fn failures(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.outcome.is_failure())
            .count()
    }

    /// Process exit code: 1 if any target failed, 0 otherwise.
    pub fn code(&self) -> u8 {
        if self.failures() > 0 {
            1
        } else {
            0
        }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for result in &self.results {
            writeln!(out, "{}", result)?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn result(path: &str, outcome: Outcome) -> OperationResult {
        OperationResult::new(PathBuf::from(path), outcome)
    }

    #[rstest]
    #[case::empty(vec![], 0)]
    #[case::all_clean(vec![Outcome::NotPresent, Outcome::Removed, Outcome::Present], 0)]
    #[case::one_failed(vec![Outcome::Removed, Outcome::Failed(QuarantineError::PermissionDenied)], 1)]
    #[case::interrupted(vec![Outcome::Failed(QuarantineError::Interrupted)], 1)]
    fn exit_code_reflects_failures(#[case] outcomes: Vec<Outcome>, #[case] expected: u8) {
        let report = Report::new(outcomes.into_iter().map(|o| result("x", o)).collect());
        assert_eq!(report.code(), expected);
    }

    #[test]
    fn one_line_per_target() {
        let report = Report::new(vec![
            result("MyApp.app", Outcome::Removed),
            result("MyApp.app/Contents/Info.plist", Outcome::NotPresent),
            result("tool.zip", Outcome::Present),
            result("missing.txt", Outcome::Failed(QuarantineError::NotFound)),
        ]);
        let mut out = Vec::new();
        report.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "removed      MyApp.app\n\
             clean        MyApp.app/Contents/Info.plist\n\
             quarantined  tool.zip\n\
             failed       missing.txt: not found\n"
        );
        assert_eq!(report.failures(), 1);
    }
}
