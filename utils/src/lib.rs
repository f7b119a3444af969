pub mod constants;
pub mod logging;
mod macros;
pub mod semver;

#[cfg(feature = "test")]
pub mod test_utils;

use miette::{Context, IntoDiagnostic, Result};

/// Retrieves an environment variable.
///
/// # Errors
/// Will error if the variable is unset or not valid unicode.
pub fn get_env_var<S>(key: S) -> Result<String>
where
    S: AsRef<str>,
{
    fn inner(key: &str) -> Result<String> {
        std::env::var(key)
            .into_diagnostic()
            .with_context(|| format!("Failed to retrieve env var '{key}'"))
    }
    inner(key.as_ref())
}
