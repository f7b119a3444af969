//! This module is responsible for managing processes spawned
//! by this tool. The only external program consulted is `git`,
//! which provides defaults for the branch and commit sha.

pub mod drivers;
