use bon::Builder;
use chrono::{SecondsFormat, Utc};
use docker_meta_bake::{ChangeRequest, ResolvedConfig};
use docker_meta_config::{DockerMetaConfig, Preset, TagSemver, UnsupportedPresetError};
use docker_meta_process::drivers::VcsDriver;
use docker_meta_utils::{
    constants::{
        BRANCH, BUILD_DATE, CHANGE_REQUEST, GERRIT_CHANGE_NUMBER, GERRIT_PATCHSET_NUMBER,
        GIT_COMMIT, GIT_SHA, LATEST, VERSION,
    },
    semver::Version,
};
use log::{debug, trace};
use miette::{Context, Diagnostic, Result};
use thiserror::Error;

#[cfg(not(test))]
use docker_meta_utils::get_env_var;

#[cfg(test)]
use docker_meta_utils::test_utils::get_env_var;

/// Values given on the command line.
///
/// Each one takes precedence over the environment
/// and the configuration file.
#[derive(Default, Clone, Debug, Builder)]
pub struct Overrides {
    #[builder(into)]
    pub version: Option<String>,

    #[builder(into)]
    pub branch: Option<String>,

    #[builder(into)]
    pub git_sha: Option<String>,

    #[builder(into)]
    pub build_date: Option<String>,

    #[builder(into)]
    pub change_number: Option<String>,

    #[builder(into)]
    pub patchset_number: Option<String>,

    pub latest: Option<bool>,
    pub tag_version: Option<bool>,
    pub tag_git_sha: Option<bool>,
    pub tag_semver: Option<bool>,
    pub change_request: Option<bool>,
}

#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Preset(#[from] UnsupportedPresetError),

    #[error("version unset")]
    #[diagnostic(
        code(docker_meta::resolve::version),
        help("Pass --version, set VERSION or add `version` to the config file. Use --no-tag-version to build without one")
    )]
    VersionUnset,

    #[error("tag-semver is enabled but version doesn't seem to be valid semver")]
    #[diagnostic(
        code(docker_meta::resolve::tag_semver),
        help("Use --no-tag-semver or set `tag-semver: auto` to only tag semver versions")
    )]
    InvalidSemver,

    #[error("branch unset")]
    #[diagnostic(code(docker_meta::resolve::branch))]
    BranchUnset,

    #[error("git-sha unset")]
    #[diagnostic(code(docker_meta::resolve::git_sha))]
    GitShaUnset,

    #[error("build-date unset")]
    #[diagnostic(code(docker_meta::resolve::build_date))]
    BuildDateUnset,

    #[error("change-number unset in change-request mode")]
    #[diagnostic(
        code(docker_meta::resolve::change_number),
        help("Pass --change-number or set GERRIT_CHANGE_NUMBER")
    )]
    ChangeNumberUnset,

    #[error("target '{0}' has no images")]
    #[diagnostic(code(docker_meta::resolve::images))]
    NoImages(String),
}

/// Merges `overrides`, the environment, `config` and the
/// defaults taken from `V` into the settings of one run.
///
/// Git is only asked for the branch or the sha when
/// no other source provided it.
///
/// # Errors
/// Will error if the configuration is invalid or if
/// a needed default can't be read from git.
pub fn resolve<V: VcsDriver>(
    config: DockerMetaConfig,
    overrides: &Overrides,
) -> Result<ResolvedConfig> {
    trace!("resolve({config:#?}, {overrides:#?})");

    Preset::parse(config.preset.as_deref()).map_err(ResolveError::from)?;

    let latest = overrides
        .latest
        .or_else(|| env_bool(LATEST))
        .or(config.latest)
        .unwrap_or(false);
    let tag_version = overrides.tag_version.or(config.tag_version).unwrap_or(true);
    let tag_git_sha = overrides.tag_git_sha.or(config.tag_git_sha).unwrap_or(false);
    let tag_semver = overrides
        .tag_semver
        .map(TagSemver::from)
        .or(config.tag_semver)
        .unwrap_or_default();

    let version = first_set([
        overrides.version.clone(),
        env_string(&[VERSION]),
        config.version,
    ]);

    let branch = match first_set([
        overrides.branch.clone(),
        env_string(&[BRANCH]),
        config.branch,
    ]) {
        Some(branch) => Some(branch),
        None => {
            debug!("Reading branch from git");
            non_empty(V::current_branch().context("Failed to determine the current branch")?)
        }
    };

    let git_sha = match first_set([
        overrides.git_sha.clone(),
        env_string(&[GIT_SHA, GIT_COMMIT]),
        config.git_sha,
    ]) {
        Some(sha) => Some(sha),
        None => {
            debug!("Reading git sha from git");
            non_empty(V::short_sha().context("Failed to determine the git sha")?)
        }
    };

    let build_date = first_set([
        overrides.build_date.clone(),
        env_string(&[BUILD_DATE]),
        config.build_date,
    ])
    .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

    let change_request = overrides
        .change_request
        .or_else(|| env_bool(CHANGE_REQUEST))
        .or(config.change_request)
        .unwrap_or(false);
    let change_number = first_set([
        overrides.change_number.clone(),
        env_string(&[GERRIT_CHANGE_NUMBER]),
        config.change_number,
    ]);
    let patchset_number = first_set([
        overrides.patchset_number.clone(),
        env_string(&[GERRIT_PATCHSET_NUMBER]),
        config.patchset_number,
    ]);

    if tag_version && version.is_none() {
        return Err(ResolveError::VersionUnset.into());
    } else if tag_semver == TagSemver::Enabled
        && !version.as_deref().is_some_and(Version::is_valid)
    {
        return Err(ResolveError::InvalidSemver.into());
    }

    let branch = branch.ok_or(ResolveError::BranchUnset)?;
    let git_sha = git_sha.ok_or(ResolveError::GitShaUnset)?;
    if build_date.is_empty() {
        return Err(ResolveError::BuildDateUnset.into());
    }

    let change_request = if change_request {
        let change_number = change_number.ok_or(ResolveError::ChangeNumberUnset)?;
        Some(
            ChangeRequest::builder()
                .change_number(change_number)
                .maybe_patchset_number(patchset_number)
                .build(),
        )
    } else {
        None
    };

    if let Some((name, _)) = config
        .targets
        .iter()
        .find(|(_, target)| target.images.is_empty())
    {
        return Err(ResolveError::NoImages(name.clone()).into());
    }

    let tag_semver = tag_semver.resolve(version.as_deref());
    debug!("tag-semver resolved to {tag_semver}");

    Ok(ResolvedConfig::builder()
        .maybe_version(version)
        .branch(branch)
        .latest(latest)
        .tag_version(tag_version)
        .tag_git_sha(tag_git_sha)
        .tag_semver(tag_semver)
        .maybe_change_request(change_request)
        .git_sha(git_sha)
        .build_date(build_date)
        .targets(config.targets)
        .maybe_groups(config.groups)
        .build())
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn first_set<const N: usize>(layers: [Option<String>; N]) -> Option<String> {
    layers.into_iter().flatten().find(|value| !value.is_empty())
}

/// The first of `keys` that is set to a non-empty value.
fn env_string(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| get_env_var(key).ok())
        .find(|value| !value.is_empty())
}

/// A present variable is `true` only when its value is exactly `true`.
fn env_bool(key: &str) -> Option<bool> {
    get_env_var(key).ok().map(|value| value == "true")
}
