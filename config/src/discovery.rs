use std::{
    fs,
    path::{Path, PathBuf},
};

use docker_meta_utils::constants::{DOCKER_META, PACKAGE_JSON};
use log::{debug, trace};
use serde_json::{Map, Value};

use crate::{ConfigError, DockerMetaConfig};

/// Places searched for a configuration file, in order.
pub const SEARCH_PLACES: &[&str] = &[
    PACKAGE_JSON,
    ".docker-metarc",
    ".docker-metarc.json",
    ".docker-metarc.yaml",
    ".docker-metarc.yml",
    ".config/docker-metarc",
    ".config/docker-metarc.json",
    ".config/docker-metarc.yaml",
    ".config/docker-metarc.yml",
    "docker-meta.config.json",
    "docker-meta.config.yaml",
    "docker-meta.config.yml",
];

const JS_EXTENSIONS: &[&str] = &["js", "ts", "cjs", "mjs"];

const JS_SEARCH_PLACES: &[&str] = &[
    ".docker-metarc.js",
    ".docker-metarc.ts",
    ".docker-metarc.cjs",
    ".docker-metarc.mjs",
    "docker-meta.config.js",
    "docker-meta.config.ts",
    "docker-meta.config.cjs",
    "docker-meta.config.mjs",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    PackageJson,
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        if path.file_name().is_some_and(|name| name == PACKAGE_JSON) {
            return Ok(Self::PackageJson);
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            None | Some("yaml" | "yml") => Ok(Self::Yaml),
            Some(ext) if JS_EXTENSIONS.contains(&ext) => Err(ConfigError::UnsupportedJsConfig {
                path: path.to_path_buf(),
            }),
            Some(_) => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl DockerMetaConfig {
    /// Searches `dir` for a configuration file. Only `dir` itself
    /// is searched, parent directories are not.
    ///
    /// Empty files and a `package.json` without a `docker-meta`
    /// property are skipped.
    ///
    /// # Errors
    /// Will error if no configuration file is found or
    /// if the first one found cannot be read or parsed.
    pub fn search<P: AsRef<Path>>(dir: P) -> Result<(PathBuf, Self), ConfigError> {
        let dir = dir.as_ref();
        trace!("DockerMetaConfig::search({})", dir.display());

        for place in SEARCH_PLACES {
            let path = dir.join(place);
            if !path.is_file() {
                continue;
            }

            let contents = read(&path)?;
            if contents.trim().is_empty() {
                debug!("Skipping empty config file {}", path.display());
                continue;
            }

            if let Some(config) = Self::from_contents(&path, &contents)? {
                debug!("Found config file {}", path.display());
                return Ok((path, config));
            }
            debug!("No `{DOCKER_META}` property in {}", path.display());
        }

        if let Some(path) = JS_SEARCH_PLACES
            .iter()
            .map(|place| dir.join(place))
            .find(|path| path.is_file())
        {
            return Err(ConfigError::UnsupportedJsConfig { path });
        }

        Err(ConfigError::NotFound {
            dir: dir.to_path_buf(),
        })
    }

    /// Loads the configuration file at `path`.
    ///
    /// The format is picked from the file name: `package.json` uses its
    /// `docker-meta` property, `.json` files are JSON and `.yaml`, `.yml`
    /// or extensionless files are YAML.
    ///
    /// # Errors
    /// Will error if the file cannot be read, is empty,
    /// has an unsupported format, or fails to parse.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        trace!("DockerMetaConfig::load({})", path.display());

        let contents = read(path)?;
        if contents.trim().is_empty() {
            return Err(ConfigError::Empty {
                path: path.to_path_buf(),
            });
        }

        Self::from_contents(path, &contents)?.ok_or_else(|| ConfigError::MissingPackageProperty {
            path: path.to_path_buf(),
        })
    }

    fn from_contents(path: &Path, contents: &str) -> Result<Option<Self>, ConfigError> {
        match Format::of(path)? {
            Format::PackageJson => {
                let mut package: Map<String, Value> =
                    serde_json::from_str(contents).map_err(json_err(path, contents))?;

                package
                    .remove(DOCKER_META)
                    .map(|value| {
                        serde_json::from_value(value).map_err(|e| {
                            ConfigError::parse(path.to_path_buf(), contents, e.to_string(), 0, 0)
                        })
                    })
                    .transpose()
            }
            Format::Json => serde_json::from_str(contents)
                .map(Some)
                .map_err(json_err(path, contents)),
            Format::Yaml => serde_yaml::from_str(contents)
                .map(Some)
                .map_err(yaml_err(path, contents)),
        }
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn json_err<'a>(path: &'a Path, contents: &'a str) -> impl Fn(serde_json::Error) -> ConfigError + 'a {
    move |err: serde_json::Error| {
        ConfigError::parse(
            path.to_path_buf(),
            contents,
            err.to_string(),
            err.line(),
            err.column(),
        )
    }
}

fn yaml_err<'a>(path: &'a Path, contents: &'a str) -> impl Fn(serde_yaml::Error) -> ConfigError + 'a {
    move |err: serde_yaml::Error| {
        let (line, column) = err
            .location()
            .map_or((0, 0), |location| (location.line(), location.column()));
        ConfigError::parse(path.to_path_buf(), contents, err.to_string(), line, column)
    }
}

#[cfg(test)]
mod test {
    use std::{fs, path::Path};

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use crate::{ConfigError, DockerMetaConfig};

    const YAML_CONFIG: &str = "\
preset: gerrit
targets:
  docker-meta:
    images:
      - felipecrs/docker-meta
      - ghcr.io/felipecrs/docker-meta
    labels:
      org.label-schema.build-date: docker-meta
";

    const JSON_CONFIG: &str = r#"{
  "preset": "gerrit",
  "targets": {
    "docker-meta": {
      "images": ["felipecrs/docker-meta", "ghcr.io/felipecrs/docker-meta"],
      "labels": { "org.label-schema.build-date": "docker-meta" }
    }
  }
}"#;

    #[fixture]
    fn dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    fn write(dir: &Path, name: &str, contents: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    fn assert_fixture(config: &DockerMetaConfig) {
        assert_eq!(config.preset.as_deref(), Some("gerrit"));
        let target = &config.targets["docker-meta"];
        assert_eq!(
            target.images,
            vec!["felipecrs/docker-meta", "ghcr.io/felipecrs/docker-meta"]
        );
        assert_eq!(
            target.labels.as_ref().unwrap()["org.label-schema.build-date"],
            "docker-meta"
        );
    }

    #[rstest]
    #[case::rc(".docker-metarc", YAML_CONFIG)]
    #[case::rc_json_in_rc(".docker-metarc", JSON_CONFIG)]
    #[case::rc_json(".docker-metarc.json", JSON_CONFIG)]
    #[case::rc_yaml(".docker-metarc.yaml", YAML_CONFIG)]
    #[case::rc_yml(".docker-metarc.yml", YAML_CONFIG)]
    #[case::dot_config(".config/docker-metarc.yaml", YAML_CONFIG)]
    #[case::config_json("docker-meta.config.json", JSON_CONFIG)]
    #[case::config_yaml("docker-meta.config.yaml", YAML_CONFIG)]
    #[case::config_yml("docker-meta.config.yml", YAML_CONFIG)]
    fn search_finds(dir: TempDir, #[case] name: &str, #[case] contents: &str) {
        write(dir.path(), name, contents);

        let (path, config) = DockerMetaConfig::search(dir.path()).unwrap();

        assert_eq!(path, dir.path().join(name));
        assert_fixture(&config);
    }

    #[rstest]
    fn search_uses_package_json_property(dir: TempDir) {
        write(
            dir.path(),
            "package.json",
            &format!(r#"{{ "name": "app", "docker-meta": {JSON_CONFIG} }}"#),
        );

        let (path, config) = DockerMetaConfig::search(dir.path()).unwrap();

        assert_eq!(path, dir.path().join("package.json"));
        assert_fixture(&config);
    }

    #[rstest]
    fn search_skips_package_json_without_property(dir: TempDir) {
        write(dir.path(), "package.json", r#"{ "name": "app" }"#);
        write(dir.path(), "docker-meta.config.yaml", YAML_CONFIG);

        let (path, _) = DockerMetaConfig::search(dir.path()).unwrap();

        assert_eq!(path, dir.path().join("docker-meta.config.yaml"));
    }

    #[rstest]
    fn search_skips_empty_files(dir: TempDir) {
        write(dir.path(), ".docker-metarc", "  \n");
        write(dir.path(), "docker-meta.config.json", JSON_CONFIG);

        let (path, _) = DockerMetaConfig::search(dir.path()).unwrap();

        assert_eq!(path, dir.path().join("docker-meta.config.json"));
    }

    #[rstest]
    fn search_prefers_earlier_places(dir: TempDir) {
        write(dir.path(), "docker-meta.config.yaml", "preset: other\n");
        write(dir.path(), ".docker-metarc.json", JSON_CONFIG);

        let (path, config) = DockerMetaConfig::search(dir.path()).unwrap();

        assert_eq!(path, dir.path().join(".docker-metarc.json"));
        assert_fixture(&config);
    }

    #[rstest]
    fn search_reports_js_configs(dir: TempDir) {
        write(dir.path(), "docker-meta.config.js", "module.exports = {};");

        let err = DockerMetaConfig::search(dir.path()).unwrap_err();

        assert!(matches!(err, ConfigError::UnsupportedJsConfig { .. }));
    }

    #[rstest]
    fn search_not_found(dir: TempDir) {
        let err = DockerMetaConfig::search(dir.path()).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert!(err.to_string().starts_with("Can not load the config file."));
    }

    #[rstest]
    #[case::yaml("custom.yaml", YAML_CONFIG)]
    #[case::json("custom.json", JSON_CONFIG)]
    #[case::no_extension("custom", YAML_CONFIG)]
    fn load_explicit(dir: TempDir, #[case] name: &str, #[case] contents: &str) {
        write(dir.path(), name, contents);

        let config = DockerMetaConfig::load(dir.path().join(name)).unwrap();

        assert_fixture(&config);
    }

    #[rstest]
    fn load_empty_file(dir: TempDir) {
        write(dir.path(), "custom.yaml", "");

        let err = DockerMetaConfig::load(dir.path().join("custom.yaml")).unwrap_err();

        assert!(matches!(err, ConfigError::Empty { .. }));
    }

    #[rstest]
    fn load_missing_file(dir: TempDir) {
        let err = DockerMetaConfig::load(dir.path().join("nope.yaml")).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[rstest]
    #[case::toml("custom.toml", ConfigError::UnsupportedFormat { path: "custom.toml".into() })]
    #[case::js("custom.js", ConfigError::UnsupportedJsConfig { path: "custom.js".into() })]
    fn load_unsupported(dir: TempDir, #[case] name: &str, #[case] expected: ConfigError) {
        write(dir.path(), name, "preset = 'gerrit'");

        let err = DockerMetaConfig::load(dir.path().join(name)).unwrap_err();

        assert_eq!(
            std::mem::discriminant(&err),
            std::mem::discriminant(&expected)
        );
    }

    #[rstest]
    fn load_package_json_without_property(dir: TempDir) {
        write(dir.path(), "package.json", r#"{ "name": "app" }"#);

        let err = DockerMetaConfig::load(dir.path().join("package.json")).unwrap_err();

        assert!(matches!(err, ConfigError::MissingPackageProperty { .. }));
    }

    #[rstest]
    fn load_reports_parse_location(dir: TempDir) {
        write(dir.path(), "custom.json", "{\n  \"preset\": gerrit\n}");

        let err = DockerMetaConfig::load(dir.path().join("custom.json")).unwrap_err();

        let ConfigError::Parse { span, .. } = &err else {
            panic!("expected a parse error, got {err:?}");
        };
        assert!(span.is_some());
    }
}
