use docker_meta_config::TargetSpec;
use docker_meta_utils::{
    constants::{
        BRANCH_ARG, BUILD_DATE_LABEL, SCHEMA_VERSION, SCHEMA_VERSION_LABEL, VCS_REF_LABEL,
        VERSION_ARG, VERSION_LABEL,
    },
    semver::Version,
};
use indexmap::IndexMap;
use log::{debug, trace};

use crate::{tags::generate_tags, BakeFile, BakeTarget, ResolvedConfig};

/// Generates the bake file for every target of `config`.
///
/// Targets keep their declaration order and `groups`
/// is copied to `group` as is.
#[must_use]
pub fn generate(config: &ResolvedConfig) -> BakeFile {
    trace!("generate({config:#?})");

    let version = config
        .version
        .as_deref()
        .map(Version::normalize)
        .unwrap_or_default();
    debug!("Normalized version: {version:?}");

    let target = config
        .targets
        .iter()
        .map(|(name, spec)| {
            debug!("Generating target {name}");
            (name.clone(), generate_target(config, &version, spec))
        })
        .collect();

    BakeFile {
        target,
        group: config.groups.clone(),
    }
}

fn generate_target(config: &ResolvedConfig, version: &str, spec: &TargetSpec) -> BakeTarget {
    BakeTarget {
        tags: generate_tags(config, version, spec),
        labels: generate_labels(config, version, spec),
        args: generate_args(config, version, spec),
        extra: spec.extra.clone(),
    }
}

fn generate_labels(
    config: &ResolvedConfig,
    version: &str,
    spec: &TargetSpec,
) -> IndexMap<String, String> {
    let mut labels = IndexMap::new();
    labels.insert(VCS_REF_LABEL.to_string(), config.git_sha.to_string());
    labels.insert(BUILD_DATE_LABEL.to_string(), config.build_date.clone());
    if config.tag_version {
        labels.insert(VERSION_LABEL.to_string(), version.to_string());
    }
    labels.insert(SCHEMA_VERSION_LABEL.to_string(), SCHEMA_VERSION.to_string());

    merge(labels, spec.labels.as_ref())
}

fn generate_args(
    config: &ResolvedConfig,
    version: &str,
    spec: &TargetSpec,
) -> IndexMap<String, String> {
    let mut args = IndexMap::new();
    if config.tag_version {
        args.insert(VERSION_ARG.to_string(), version.to_string());
    }
    args.insert(BRANCH_ARG.to_string(), config.branch.clone());

    merge(args, spec.args.as_ref())
}

/// Declared values win. An overridden key keeps its original position.
fn merge(
    mut generated: IndexMap<String, String>,
    declared: Option<&IndexMap<String, String>>,
) -> IndexMap<String, String> {
    for (key, value) in declared.into_iter().flatten() {
        if let Some(previous) = generated.insert(key.clone(), value.clone()) {
            debug!("Overriding generated {key}={previous} with {value}");
        }
    }
    generated
}
