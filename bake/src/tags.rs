//! Tag strategies.
//!
//! Change request builds only ever get `gcr-` tags. Every other
//! build gets, in order, sha tags, version tags and, when pushed
//! as latest, semver, branch and `latest` tags.

use std::sync::LazyLock;

use docker_meta_config::TargetSpec;
use docker_meta_utils::{
    constants::{
        CHANGE_REQUEST_TAG_PREFIX, GIT_SHA_TAG_PREFIX, LATEST_BRANCHES, LATEST_TAG,
    },
    semver::Version,
};
use log::trace;
use regex::Regex;

use crate::{ChangeRequest, ResolvedConfig};

static INVALID_TAG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9._-]+").unwrap());

/// The mutually exclusive ways a target can be tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagStrategy<'a> {
    ChangeRequest(&'a ChangeRequest),
    Normal,
}

impl<'a> TagStrategy<'a> {
    #[must_use]
    pub fn select(config: &'a ResolvedConfig) -> Self {
        config
            .change_request
            .as_ref()
            .map_or(Self::Normal, Self::ChangeRequest)
    }
}

/// Generates every tag for `target` followed by
/// the literal tags declared on it.
#[must_use]
pub fn generate_tags(config: &ResolvedConfig, version: &str, target: &TargetSpec) -> Vec<String> {
    let images = target.images.as_slice();

    let mut tags = match TagStrategy::select(config) {
        TagStrategy::ChangeRequest(change_request) => change_request_tags(images, change_request),
        TagStrategy::Normal => normal_tags(config, version, images),
    };

    if let Some(extra_tags) = target.tags.as_ref() {
        tags.extend(extra_tags.iter().cloned());
    }
    trace!("{tags:?}");

    tags
}

fn change_request_tags(images: &[String], change_request: &ChangeRequest) -> Vec<String> {
    let change = format!("{CHANGE_REQUEST_TAG_PREFIX}{}", change_request.change_number);

    let mut tags = tag_images(images, &change).collect::<Vec<_>>();
    if let Some(patchset) = change_request.patchset_number.as_deref() {
        tags.extend(tag_images(images, &format!("{change}-{patchset}")));
    }
    tags
}

fn normal_tags(config: &ResolvedConfig, version: &str, images: &[String]) -> Vec<String> {
    let mut tags = Vec::new();

    if config.tag_git_sha {
        tags.extend(tag_images(
            images,
            &format!("{GIT_SHA_TAG_PREFIX}{}", config.git_sha),
        ));
    }

    if config.tag_version {
        tags.extend(tag_images(images, version));
    }

    if config.latest {
        let semver = config
            .version
            .as_deref()
            .filter(|_| config.tag_version && config.tag_semver)
            .and_then(|v| v.parse::<Version>().ok());

        if let Some(semver) = semver {
            for semver_tag in semver_tags(&semver, version) {
                tags.extend(tag_images(images, &semver_tag));
            }
        }

        tags.extend(tag_images(images, &sanitize_branch(&config.branch)));

        if LATEST_BRANCHES.contains(&config.branch.as_str()) {
            tags.extend(tag_images(images, LATEST_TAG));
        }
    }

    tags
}

/// Returns the `<major>`, `<major>.<minor>` and `<major>.<minor>.<patch>`
/// tags for `version`, leaving out the patch tag when it is the
/// same as the already tagged `normalized` version.
#[must_use]
pub fn semver_tags(version: &Version, normalized: &str) -> Vec<String> {
    let major = version.major.to_string();
    let minor = format!("{major}.{}", version.minor);
    let patch = format!("{minor}.{}", version.patch);

    if patch == normalized {
        vec![major, minor]
    } else {
        vec![major, minor, patch]
    }
}

/// Replaces every run of characters that aren't allowed
/// in a tag with a single `-`.
#[must_use]
pub fn sanitize_branch(branch: &str) -> String {
    INVALID_TAG_CHARS.replace_all(branch, "-").into_owned()
}

fn tag_images<'a>(images: &'a [String], tag: &'a str) -> impl Iterator<Item = String> + 'a {
    images.iter().map(move |image| format!("{image}:{tag}"))
}
