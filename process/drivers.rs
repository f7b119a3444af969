//! Drivers for the version control system the build runs in.

use miette::Result;

mod git_driver;

pub use git_driver::GitDriver;

/// Provides the defaults derived from the version control
/// state of the current directory.
///
/// These are only consulted when neither a flag, an env var,
/// nor the config file supplied a value.
pub trait VcsDriver {
    /// Returns the name of the checked out branch.
    ///
    /// An empty string is returned for a detached `HEAD`.
    ///
    /// # Errors
    /// Will error if the vcs tool can't be run or fails.
    fn current_branch() -> Result<String>;

    /// Returns the abbreviated sha of `HEAD`.
    ///
    /// # Errors
    /// Will error if the vcs tool can't be run or fails.
    fn short_sha() -> Result<String>;
}
