//! Generates the tags, labels and build args of a
//! `docker buildx bake` file from a resolved configuration.

pub mod bake_file;
pub mod generator;
pub mod resolved;
pub mod tags;

pub use bake_file::*;
pub use generator::generate;
pub use resolved::*;
