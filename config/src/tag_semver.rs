use docker_meta_utils::semver::Version;
use serde::{de::Error, Deserialize};

/// Whether `<major>`, `<major>.<minor>` and `<major>.<minor>.<patch>`
/// tags are generated for the latest build.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagSemver {
    Enabled,
    Disabled,

    /// Enabled only when the version is valid semver.
    #[default]
    Auto,
}

impl TagSemver {
    /// Collapses the setting into a plain switch for `version`.
    #[must_use]
    pub fn resolve(self, version: Option<&str>) -> bool {
        match self {
            Self::Enabled => true,
            Self::Disabled => false,
            Self::Auto => version.is_some_and(Version::is_valid),
        }
    }
}

impl From<bool> for TagSemver {
    fn from(value: bool) -> Self {
        if value {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

impl std::fmt::Display for TagSemver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Enabled => "true",
            Self::Disabled => "false",
            Self::Auto => "auto",
        })
    }
}

impl<'de> Deserialize<'de> for TagSemver {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bool(value) => Ok(value.into()),
            Raw::Str(auto) if auto == "auto" => Ok(Self::Auto),
            Raw::Str(other) => Err(D::Error::custom(format!(
                "invalid tag-semver value '{other}', expected true, false or \"auto\""
            ))),
        }
    }
}
