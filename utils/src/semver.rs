use std::str::FromStr;

use miette::bail;
use semver::BuildMetadata;

/// The largest integer a JSON number can hold exactly.
const MAX_SAFE_COMPONENT: u64 = (1 << 53) - 1;

/// A semantic version parsed with the same leniency
/// image tooling usually applies to git tags.
///
/// Surrounding whitespace and a single leading `v` are ignored and
/// build metadata is dropped, so `v1.2.3+abc` renders as `1.2.3`.
/// Pre-release identifiers are kept. Numeric components must fit
/// in 53 bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(semver::Version);

impl Version {
    /// Returns the canonical rendering of `version` when it
    /// is valid semver, otherwise `version` verbatim.
    #[must_use]
    pub fn normalize(version: &str) -> String {
        version
            .parse::<Self>()
            .map_or_else(|_| version.to_string(), |v| v.to_string())
    }

    #[must_use]
    pub fn is_valid(version: &str) -> bool {
        version.parse::<Self>().is_ok()
    }
}

impl std::ops::Deref for Version {
    type Target = semver::Version;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Version {
    type Err = miette::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let stripped = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let Ok(mut parsed_ver) = semver::Version::parse(stripped) else {
            bail!("Failed to parse version {s}");
        };
        if [parsed_ver.major, parsed_ver.minor, parsed_ver.patch]
            .iter()
            .any(|&component| component > MAX_SAFE_COMPONENT)
        {
            bail!("Version {s} has a component larger than {MAX_SAFE_COMPONENT}");
        }
        parsed_ver.build = BuildMetadata::EMPTY;
        Ok(Self(parsed_ver))
    }
}
