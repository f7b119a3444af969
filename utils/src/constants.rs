// Config
pub const DOCKER_META: &str = "docker-meta";
pub const GERRIT_PRESET: &str = "gerrit";
pub const PACKAGE_JSON: &str = "package.json";

// Labels
pub const VCS_REF_LABEL: &str = "org.label-schema.vsc-ref";
pub const BUILD_DATE_LABEL: &str = "org.label-schema.build-date";
pub const VERSION_LABEL: &str = "org.label-schema.version";
pub const SCHEMA_VERSION_LABEL: &str = "org.label-schema.schema-version";
pub const SCHEMA_VERSION: &str = "1.0.0-rc1";

// Build args
pub const VERSION_ARG: &str = "VERSION";
pub const BRANCH_ARG: &str = "BRANCH";

// Tags
pub const LATEST_TAG: &str = "latest";
pub const GIT_SHA_TAG_PREFIX: &str = "sha-";
pub const CHANGE_REQUEST_TAG_PREFIX: &str = "gcr-";
pub const LATEST_BRANCHES: [&str; 2] = ["master", "develop"];
pub const SHORT_SHA_LEN: usize = 7;

// Env vars
pub const LATEST: &str = "LATEST";
pub const VERSION: &str = "VERSION";
pub const BRANCH: &str = "BRANCH";
pub const GIT_SHA: &str = "GIT_SHA";
pub const GIT_COMMIT: &str = "GIT_COMMIT";
pub const BUILD_DATE: &str = "BUILD_DATE";
pub const CHANGE_REQUEST: &str = "CHANGE_REQUEST";
pub const GERRIT_CHANGE_NUMBER: &str = "GERRIT_CHANGE_NUMBER";
pub const GERRIT_PATCHSET_NUMBER: &str = "GERRIT_PATCHSET_NUMBER";

// Messages
pub const UNSUPPORTED_PRESET_MESSAGE: &str = "The only supported preset for now is 'gerrit'.";
