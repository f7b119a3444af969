use bon::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{TagSemver, TargetSpec};

/// The contents of a `docker-meta` configuration file.
///
/// Every top-level setting is optional here. Missing values are
/// filled in from flags, the environment, git and defaults when
/// the configuration is resolved.
#[derive(Default, Clone, Debug, PartialEq, Deserialize, Builder)]
#[serde(rename_all = "kebab-case")]
pub struct DockerMetaConfig {
    /// Only `gerrit` is supported.
    #[builder(into)]
    pub preset: Option<String>,

    /// The version to publish.
    #[builder(into)]
    pub version: Option<String>,

    #[builder(into)]
    pub branch: Option<String>,

    /// Push as latest.
    pub latest: Option<bool>,

    /// Use `version` to generate tags.
    pub tag_version: Option<bool>,

    /// Generate `:sha-<git-sha>` tags outside of change request mode.
    pub tag_git_sha: Option<bool>,

    pub tag_semver: Option<TagSemver>,

    /// Gerrit change request mode.
    pub change_request: Option<bool>,

    #[serde(default, deserialize_with = "string_or_number")]
    #[builder(into)]
    pub change_number: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    #[builder(into)]
    pub patchset_number: Option<String>,

    #[builder(into)]
    pub git_sha: Option<String>,

    /// ISO 8601 build date.
    #[builder(into)]
    pub build_date: Option<String>,

    #[serde(default)]
    #[builder(default)]
    pub targets: IndexMap<String, TargetSpec>,

    /// Copied verbatim to the `group` section of the bake file.
    pub groups: Option<IndexMap<String, Value>>,
}

/// Gerrit numbers are often written unquoted in YAML.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(u64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    }))
}
