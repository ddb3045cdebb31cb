use log::debug;

use crate::report::Outcome;
use crate::resolve::{Target, TargetKind};
use crate::xattr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Remove,
    /// Report only, never modify.
    Check,
}

/// Applies `mode` to one target. Only metadata is touched, never content.
///
/// Symlink targets are acted on themselves, not on what they point to.
pub fn process(target: &Target, name: &str, mode: Mode) -> Outcome {
    let follow = target.kind != TargetKind::Symlink;
    let path = &target.path;
    let present = match xattr::has(path, name, follow) {
        Ok(present) => present,
        Err(e) => return Outcome::Failed(e),
    };
    match (present, mode) {
        (false, _) => Outcome::NotPresent,
        (true, Mode::Check) => Outcome::Present,
        (true, Mode::Remove) => match xattr::remove(path, name, follow) {
            Ok(true) => {
                debug!("removed '{}' from '{}'", name, path.display());
                Outcome::Removed
            }
            // gone between the check and the removal
            Ok(false) => Outcome::NotPresent,
            Err(e) => Outcome::Failed(e),
        },
    }
}
