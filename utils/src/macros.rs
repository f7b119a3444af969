/// Creates or modifies a `std::process::Command` adding args.
///
/// # Examples
/// ```
/// use docker_meta_utils::cmd;
///
/// let mut command = cmd!("echo", "Hello world!");
/// cmd!(command, "This is Joe.");
/// command.status().unwrap();
/// ```
#[macro_export]
macro_rules! cmd {
    ($command:literal) => {
        {
            ::std::process::Command::new($command)
        }
    };
    ($command:literal, $($arg:expr),+ $(,)?) => {
        {
            let mut c = $crate::cmd!($command);
            c$(.arg($arg))*;
            c
        }
    };
    ($command:ident, $($arg:expr),+ $(,)?) => {
        {
            $command$(.arg($arg))*;
        }
    };
}

/// Shorthand for `String::from`.
#[macro_export]
macro_rules! string {
    ($str:expr) => {
        String::from($str)
    };
}

/// Creates a `Vec<String>` from anything `String` can be built from.
///
/// # Examples
/// ```
/// use docker_meta_utils::string_vec;
///
/// let tag = "1.2.3";
/// let tags: Vec<String> = string_vec!["latest", format!("sha-{tag}")];
/// assert_eq!(tags, vec!["latest".to_string(), "sha-1.2.3".to_string()]);
/// ```
#[macro_export]
macro_rules! string_vec {
    ($($string:expr),* $(,)?) => {
        {
            vec![$($crate::string!($string),)*]
        }
    };
}
