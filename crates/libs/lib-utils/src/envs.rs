//! # Environment Variables
//!
//! Utilities for reading and parsing environment variables.
//!
//! Empty values are treated the same as unset ones, so `FOO=` in a `.env`
//! file falls back to the default instead of producing an empty setting.

use std::env;
use std::str::FromStr;

/// Get an environment variable by name.
pub fn get_env(name: &'static str) -> Result<String, Error> {
    match env::var(name) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(Error::MissingEnv(name)),
    }
}

/// Get an environment variable, falling back to `default` when unset.
pub fn get_env_or(name: &'static str, default: &str) -> String {
    get_env(name).unwrap_or_else(|_| default.to_string())
}

/// Get and parse an environment variable.
pub fn get_env_parse<T: FromStr>(name: &'static str) -> Result<T, Error> {
    let val = get_env(name)?;
    val.trim().parse::<T>().map_err(|_| Error::WrongFormat(name))
}

/// Get and parse an environment variable, using `default` when unset.
///
/// A value that is present but unparsable is still an error.
pub fn get_env_parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, Error> {
    match get_env_parse(name) {
        Ok(val) => Ok(val),
        Err(Error::MissingEnv(_)) => Ok(default),
        Err(e) => Err(e),
    }
}

// region:    --- Error
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    MissingEnv(&'static str),
    WrongFormat(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MissingEnv(name) => write!(fmt, "{name} must be set in environment"),
            Error::WrongFormat(name) => write!(fmt, "{name} has an invalid format"),
        }
    }
}

impl std::error::Error for Error {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names; the process environment is shared.

    #[test]
    fn test_missing_env() {
        assert_eq!(
            get_env("LIB_UTILS_TEST_NEVER_SET"),
            Err(Error::MissingEnv("LIB_UTILS_TEST_NEVER_SET"))
        );
        assert_eq!(get_env_or("LIB_UTILS_TEST_NEVER_SET", "fallback"), "fallback");
    }

    #[test]
    fn test_parse_or_default() {
        let val: u64 = get_env_parse_or("LIB_UTILS_TEST_PARSE_UNSET", 42).unwrap();
        assert_eq!(val, 42);
    }

    #[test]
    fn test_parse_wrong_format() {
        env::set_var("LIB_UTILS_TEST_PARSE_BAD", "not-a-number");
        let res: Result<u64, Error> = get_env_parse_or("LIB_UTILS_TEST_PARSE_BAD", 1);
        assert_eq!(res, Err(Error::WrongFormat("LIB_UTILS_TEST_PARSE_BAD")));
    }

    #[test]
    fn test_empty_value_is_missing() {
        env::set_var("LIB_UTILS_TEST_EMPTY", "  ");
        assert!(get_env("LIB_UTILS_TEST_EMPTY").is_err());
    }
}
