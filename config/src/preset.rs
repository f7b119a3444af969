use std::str::FromStr;

use docker_meta_utils::constants::{GERRIT_PRESET, UNSUPPORTED_PRESET_MESSAGE};
use miette::Diagnostic;
use thiserror::Error;

/// The tagging workflow a configuration targets.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    #[default]
    Gerrit,
}

#[derive(Debug, Error, Diagnostic)]
#[error("{}", UNSUPPORTED_PRESET_MESSAGE)]
#[diagnostic(
    code(docker_meta::config::preset),
    help("Set `preset: gerrit` in the configuration file")
)]
pub struct UnsupportedPresetError {
    pub preset: Option<String>,
}

impl Preset {
    /// Parses the `preset` value of a configuration file.
    ///
    /// # Errors
    /// Will error if the preset is missing or isn't `gerrit`.
    pub fn parse(preset: Option<&str>) -> Result<Self, UnsupportedPresetError> {
        match preset {
            Some(preset) => preset.parse(),
            None => Err(UnsupportedPresetError { preset: None }),
        }
    }
}

impl FromStr for Preset {
    type Err = UnsupportedPresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            GERRIT_PRESET => Ok(Self::Gerrit),
            other => Err(UnsupportedPresetError {
                preset: Some(other.to_string()),
            }),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gerrit => f.write_str(GERRIT_PRESET),
        }
    }
}
