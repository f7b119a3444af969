//! Generates docker buildx bake tags, labels and build args
//! for images built from Gerrit changes and branches.

pub mod commands;
pub mod resolver;
