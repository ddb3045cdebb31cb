//! Resolve → remove → report.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use crate::pool;
use crate::remover::{self, Mode};
use crate::report::{OperationResult, Outcome, Report};
use crate::resolve::{self, ResolveOptions, Root};
use crate::{QuarantineError, QUARANTINE_ATTR};

#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub mode: Mode,
    pub resolve: ResolveOptions,
    pub jobs: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: Mode::Remove,
            resolve: ResolveOptions::default(),
            jobs: pool::default_jobs(),
        }
    }
}

/// Runs one full pass over `roots`. Targets not started before `cancel` was
/// raised are reported as interrupted.
pub fn run(roots: &[Root], options: &Options, cancel: &AtomicBool) -> Report {
    let mut slots: Vec<Option<OperationResult>> = Vec::new();
    let mut queued: Vec<(usize, PathBuf)> = Vec::new();
    let mut targets = Vec::new();
    for entry in resolve::resolve(roots, &options.resolve) {
        match entry {
            Ok(target) => {
                queued.push((slots.len(), target.path.clone()));
                targets.push(target);
                slots.push(None);
            }
            Err(unresolved) => slots.push(Some(OperationResult::new(
                unresolved.path,
                Outcome::Failed(unresolved.error),
            ))),
        }
    }

    let mode = options.mode;
    let outcomes = pool::run(targets, options.jobs, cancel, |target| {
        remover::process(&target, QUARANTINE_ATTR, mode)
    });
    for ((index, path), outcome) in queued.into_iter().zip(outcomes) {
        let outcome = outcome.unwrap_or(Outcome::Failed(QuarantineError::Interrupted));
        slots[index] = Some(OperationResult::new(path, outcome));
    }

    Report::new(slots.into_iter().flatten().collect())
}
