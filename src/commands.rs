use std::{env, path::PathBuf};

use clap::{crate_version, Parser};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use docker_meta_bake::generate;
use docker_meta_config::DockerMetaConfig;
use docker_meta_process::drivers::GitDriver;
use log::{debug, info, trace};
use miette::{IntoDiagnostic, Result};

use crate::resolver::{resolve, Overrides};

pub trait DockerMetaCommand {
    /// Runs the command and returns a result
    /// of the execution
    ///
    /// # Errors
    /// Can return a `miette` Error
    fn try_run(&mut self) -> Result<()>;

    /// Runs the command and exits if there is an error.
    ///
    /// The report is printed regardless of the log level.
    fn run(&mut self) {
        if let Err(e) = self.try_run() {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}

/// Generates the tags, labels and build args of a
/// `docker buildx bake` file.
///
/// The bake file can then be passed to
/// `docker buildx bake -f docker-bake.json -f <bake file>`.
#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(
    name = "docker-meta",
    about,
    long_about = None,
    disable_version_flag = true,
)]
pub struct DockerMetaArgs {
    /// Print the version of docker-meta and exit.
    #[arg(short = 'V', long)]
    pub docker_meta_version: bool,

    /// The config file to use instead of searching
    /// the current directory for one.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// File to output to instead of STDOUT.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// The branch being built.
    ///
    /// Defaults to `BRANCH`, then the config file and
    /// then `git branch --show-current`.
    #[arg(long)]
    pub branch: Option<String>,

    /// The version of the image.
    ///
    /// Defaults to `VERSION` and then the config file.
    #[arg(id = "image_version", long = "version")]
    pub image_version: Option<String>,

    /// The git sha being built. Only the first 7 characters are used.
    ///
    /// Defaults to `GIT_SHA`, `GIT_COMMIT`, the config file
    /// and then `git rev-parse --short HEAD`.
    #[arg(long)]
    pub git_sha: Option<String>,

    /// The ISO 8601 build date. Defaults to now.
    #[arg(long)]
    pub build_date: Option<String>,

    /// The Gerrit change number. Defaults to `GERRIT_CHANGE_NUMBER`.
    #[arg(long)]
    pub change_number: Option<String>,

    /// The Gerrit patchset number. Defaults to `GERRIT_PATCHSET_NUMBER`.
    #[arg(long)]
    pub patchset_number: Option<String>,

    /// Push as latest, adding branch tags and a `latest` tag
    /// for the `master` and `develop` branches.
    #[arg(long, overrides_with = "no_latest")]
    pub latest: bool,

    #[arg(long, overrides_with = "latest", hide = true)]
    pub no_latest: bool,

    /// Tag images with the version.
    #[arg(long, overrides_with = "no_tag_version")]
    pub tag_version: bool,

    #[arg(long, overrides_with = "tag_version", hide = true)]
    pub no_tag_version: bool,

    /// Tag images with `sha-<git sha>`.
    #[arg(long, overrides_with = "no_tag_git_sha")]
    pub tag_git_sha: bool,

    #[arg(long, overrides_with = "tag_git_sha", hide = true)]
    pub no_tag_git_sha: bool,

    /// Tag latest images with `<major>` and `<major>.<minor>`.
    ///
    /// When neither this nor `--no-tag-semver` is given, semver
    /// tags are only added for versions that are valid semver.
    #[arg(long, overrides_with = "no_tag_semver")]
    pub tag_semver: bool,

    #[arg(long, overrides_with = "tag_semver", hide = true)]
    pub no_tag_semver: bool,

    /// Build in Gerrit change request mode, tagging images
    /// with `gcr-<change number>` only.
    #[arg(long, overrides_with = "no_change_request")]
    pub change_request: bool,

    #[arg(long, overrides_with = "change_request", hide = true)]
    pub no_change_request: bool,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,
}

impl DockerMetaCommand for DockerMetaArgs {
    fn try_run(&mut self) -> Result<()> {
        trace!("DockerMetaArgs::try_run()");

        if self.docker_meta_version {
            println!("{}", crate_version!());
            return Ok(());
        }

        let config = self.load_config()?;
        let resolved = resolve::<GitDriver>(config, &self.overrides())?;
        let bake = generate(&resolved).to_json_pretty()?;

        if let Some(output) = self.output.as_ref() {
            info!("Writing bake file to {}", output.display());
            std::fs::write(output, bake).into_diagnostic()?;
        } else {
            println!("{bake}");
        }

        Ok(())
    }
}

impl DockerMetaArgs {
    fn load_config(&self) -> Result<DockerMetaConfig> {
        trace!("DockerMetaArgs::load_config()");

        let config = if let Some(path) = self.config.as_ref() {
            DockerMetaConfig::load(path)?
        } else {
            let (path, config) = DockerMetaConfig::search(env::current_dir().into_diagnostic()?)?;
            debug!("Found config file {}", path.display());
            config
        };

        Ok(config)
    }

    /// The values given on the command line.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides::builder()
            .maybe_version(self.image_version.clone())
            .maybe_branch(self.branch.clone())
            .maybe_git_sha(self.git_sha.clone())
            .maybe_build_date(self.build_date.clone())
            .maybe_change_number(self.change_number.clone())
            .maybe_patchset_number(self.patchset_number.clone())
            .maybe_latest(tri_state(self.latest, self.no_latest))
            .maybe_tag_version(tri_state(self.tag_version, self.no_tag_version))
            .maybe_tag_git_sha(tri_state(self.tag_git_sha, self.no_tag_git_sha))
            .maybe_tag_semver(tri_state(self.tag_semver, self.no_tag_semver))
            .maybe_change_request(tri_state(self.change_request, self.no_change_request))
            .build()
    }
}

/// `--x` and `--no-x` override each other, so at most one is set.
const fn tri_state(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use clap::{CommandFactory, Parser};
    use log::LevelFilter;
    use rstest::rstest;

    use super::DockerMetaArgs;

    fn parse(args: &[&str]) -> DockerMetaArgs {
        DockerMetaArgs::try_parse_from(std::iter::once("docker-meta").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn verify_cli() {
        DockerMetaArgs::command().debug_assert();
    }

    #[test]
    fn version_is_the_image_version() {
        let args = parse(&["--version", "1.2.3"]);

        assert_eq!(args.image_version.as_deref(), Some("1.2.3"));
        assert!(!args.docker_meta_version);
        assert_eq!(args.overrides().version.as_deref(), Some("1.2.3"));
    }

    #[rstest]
    #[case::short(&["-V"])]
    #[case::long(&["--docker-meta-version"])]
    fn docker_meta_version(#[case] args: &[&str]) {
        assert!(parse(args).docker_meta_version);
    }

    #[rstest]
    #[case::unset(&[], None)]
    #[case::set(&["--latest"], Some(true))]
    #[case::unset_flag(&["--no-latest"], Some(false))]
    #[case::last_wins_no(&["--latest", "--no-latest"], Some(false))]
    #[case::last_wins_yes(&["--no-latest", "--latest"], Some(true))]
    fn tri_state_flags(#[case] args: &[&str], #[case] expected: Option<bool>) {
        assert_eq!(parse(args).overrides().latest, expected);
    }

    #[test]
    fn every_tri_state_flag() {
        let overrides = parse(&[
            "--no-tag-version",
            "--tag-git-sha",
            "--no-tag-semver",
            "--change-request",
        ])
        .overrides();

        assert_eq!(overrides.latest, None);
        assert_eq!(overrides.tag_version, Some(false));
        assert_eq!(overrides.tag_git_sha, Some(true));
        assert_eq!(overrides.tag_semver, Some(false));
        assert_eq!(overrides.change_request, Some(true));
    }

    #[test]
    fn string_overrides() {
        let args = parse(&[
            "-c",
            "docker-meta.yml",
            "-o",
            "bake.json",
            "--branch",
            "develop",
            "--git-sha",
            "81a88f456",
            "--build-date",
            "2024-01-01T00:00:00.000Z",
            "--change-number",
            "123",
            "--patchset-number",
            "4",
        ]);
        let overrides = args.overrides();

        assert_eq!(args.config.unwrap().to_str(), Some("docker-meta.yml"));
        assert_eq!(args.output.unwrap().to_str(), Some("bake.json"));
        assert_eq!(overrides.branch.as_deref(), Some("develop"));
        assert_eq!(overrides.git_sha.as_deref(), Some("81a88f456"));
        assert_eq!(
            overrides.build_date.as_deref(),
            Some("2024-01-01T00:00:00.000Z")
        );
        assert_eq!(overrides.change_number.as_deref(), Some("123"));
        assert_eq!(overrides.patchset_number.as_deref(), Some("4"));
    }

    #[rstest]
    #[case::default(&[], LevelFilter::Warn)]
    #[case::verbose(&["-v"], LevelFilter::Info)]
    #[case::very_verbose(&["-vvv"], LevelFilter::Trace)]
    #[case::quiet(&["-q"], LevelFilter::Error)]
    fn verbosity(#[case] args: &[&str], #[case] expected: LevelFilter) {
        assert_eq!(parse(args).verbosity.log_level_filter(), expected);
    }
}
