use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Can not load the config file. None was found in {}", dir.display())]
    #[diagnostic(
        code(docker_meta::config::not_found),
        help("Create a `docker-meta.config.yaml` in the current directory or pass one with `--config`")
    )]
    NotFound { dir: PathBuf },

    #[error("Failed to read {}", path.display())]
    #[diagnostic(code(docker_meta::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {reason}", path.display())]
    #[diagnostic(code(docker_meta::config::parse))]
    Parse {
        path: PathBuf,
        reason: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("The config file {} is empty", path.display())]
    #[diagnostic(code(docker_meta::config::empty))]
    Empty { path: PathBuf },

    #[error("Unsupported config file format for {}", path.display())]
    #[diagnostic(
        code(docker_meta::config::format),
        help("Use a `.json`, `.yaml` or `.yml` file")
    )]
    UnsupportedFormat { path: PathBuf },

    #[error("JavaScript config files are not supported: {}", path.display())]
    #[diagnostic(
        code(docker_meta::config::javascript),
        help("Convert the exported object to `docker-meta.config.json` or `docker-meta.config.yaml`")
    )]
    UnsupportedJsConfig { path: PathBuf },

    #[error("{} has no `docker-meta` property", path.display())]
    #[diagnostic(code(docker_meta::config::package_json))]
    MissingPackageProperty { path: PathBuf },
}

impl ConfigError {
    pub(crate) fn parse(path: PathBuf, contents: &str, reason: String, line: usize, column: usize) -> Self {
        let span = offset(contents, line, column).map(|offset| SourceSpan::from((offset, 1)));

        Self::Parse {
            src: NamedSource::new(path.display().to_string(), contents.to_string()),
            path,
            reason,
            span,
        }
    }
}

/// Converts a one-based line/column pair into a byte offset.
fn offset(contents: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }

    let line_start = contents
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum::<usize>();

    let offset = line_start + column.saturating_sub(1);
    (offset < contents.len()).then_some(offset)
}
