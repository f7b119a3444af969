use std::{path::Path, process::Command};

use docker_meta_utils::cmd;
use log::trace;
use miette::{bail, Context, IntoDiagnostic, Result};

use super::VcsDriver;

/// Runs `git` in the current directory.
pub struct GitDriver;

impl GitDriver {
    fn stdout(mut command: Command) -> Result<String> {
        let output = command
            .output()
            .into_diagnostic()
            .context("Failed to execute git")?;

        if !output.status.success() {
            let err_out = String::from_utf8_lossy(&output.stderr);
            bail!("Failed to run git: {}", err_out.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn git(dir: Option<&Path>) -> Command {
        let mut command = cmd!("git");
        if let Some(dir) = dir {
            cmd!(command, "-C", dir);
        }
        command
    }

    /// Returns the checked out branch of the repository at `dir`.
    ///
    /// # Errors
    /// Will error if git can't be run or fails.
    pub fn current_branch_in(dir: Option<&Path>) -> Result<String> {
        trace!("GitDriver::current_branch_in({dir:?})");

        let mut command = Self::git(dir);
        cmd!(command, "branch", "--show-current");
        trace!("{command:?}");

        Self::stdout(command).inspect(|branch| trace!("branch={branch}"))
    }

    /// Returns the abbreviated `HEAD` sha of the repository at `dir`.
    ///
    /// # Errors
    /// Will error if git can't be run or fails.
    pub fn short_sha_in(dir: Option<&Path>) -> Result<String> {
        trace!("GitDriver::short_sha_in({dir:?})");

        let mut command = Self::git(dir);
        cmd!(command, "rev-parse", "--short", "HEAD");
        trace!("{command:?}");

        Self::stdout(command).inspect(|sha| trace!("sha={sha}"))
    }
}

impl VcsDriver for GitDriver {
    fn current_branch() -> Result<String> {
        Self::current_branch_in(None)
    }

    fn short_sha() -> Result<String> {
        Self::short_sha_in(None)
    }
}
