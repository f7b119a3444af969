pub mod config;
pub mod discovery;
pub mod error;
pub mod preset;
pub mod tag_semver;
pub mod target;

pub use config::*;
pub use error::*;
pub use preset::*;
pub use tag_semver::*;
pub use target::*;
