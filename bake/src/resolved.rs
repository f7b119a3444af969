use std::ops::Deref;

use bon::Builder;
use docker_meta_config::TargetSpec;
use docker_meta_utils::constants::SHORT_SHA_LEN;
use indexmap::IndexMap;
use serde_json::Value;

/// A git sha abbreviated to at most 7 characters.
///
/// Shorter shas are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortSha(String);

impl ShortSha {
    #[must_use]
    pub fn new(sha: &str) -> Self {
        Self(sha.chars().take(SHORT_SHA_LEN).collect())
    }
}

impl From<&str> for ShortSha {
    fn from(sha: &str) -> Self {
        Self::new(sha)
    }
}

impl From<String> for ShortSha {
    fn from(sha: String) -> Self {
        Self::new(&sha)
    }
}

impl Deref for ShortSha {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ShortSha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A Gerrit change being reviewed.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ChangeRequest {
    #[builder(into)]
    pub change_number: String,

    #[builder(into)]
    pub patchset_number: Option<String>,
}

/// Fully validated settings for one run of the generator.
///
/// Built once by the resolver and never modified afterwards.
#[derive(Debug, Clone, Builder)]
pub struct ResolvedConfig {
    /// The raw version, normalized by the generator when it is semver.
    #[builder(into)]
    pub version: Option<String>,

    #[builder(into)]
    pub branch: String,

    pub latest: bool,

    #[builder(default = true)]
    pub tag_version: bool,

    #[builder(default)]
    pub tag_git_sha: bool,

    /// Already collapsed from `auto` by the resolver.
    #[builder(default)]
    pub tag_semver: bool,

    /// Set when building in change request mode.
    pub change_request: Option<ChangeRequest>,

    #[builder(into)]
    pub git_sha: ShortSha,

    /// ISO 8601 build date.
    #[builder(into)]
    pub build_date: String,

    #[builder(default)]
    pub targets: IndexMap<String, TargetSpec>,

    pub groups: Option<IndexMap<String, Value>>,
}
