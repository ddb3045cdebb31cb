//! Detection and removal of the quarantine extended attribute.
//!
//! The `aq` binary is a thin wrapper around [`pipeline::run`]: paths are
//! expanded by [`resolve`], each target is handed to [`remover::process`] on
//! the [`pool`], and the outcomes are collected into a [`Report`].

mod error;
pub mod interrupt;
pub mod pipeline;
pub mod pool;
pub mod remover;
pub mod report;
pub mod resolve;
pub mod xattr;

#[cfg(test)]
mod test_support;

pub use error::QuarantineError;
pub use remover::Mode;
pub use report::{OperationResult, Outcome, Report};
pub use resolve::{ResolveOptions, Root, Target, TargetKind};
pub use xattr::QUARANTINE_ATTR;
