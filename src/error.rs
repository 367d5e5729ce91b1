//! Error types and handling for the `powderwatch` application

use thiserror::Error;

/// Main error type for the `powderwatch` application
#[derive(Error, Debug)]
pub enum PowderwatchError {
    /// Config file or watch-list problems
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Transport-level HTTP failures (connect, timeout, non-2xx status)
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// Malformed payloads that should have been machine readable
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Unreadable or unwritable cache files
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// Filesystem errors outside the cache formats themselves
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Anything without a more specific variant
    #[error("Application error: {message}")]
    General { message: String },
}

impl PowderwatchError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new HTTP error
    pub fn http<S: Into<String>>(message: S) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PowderwatchError::Config { .. } => {
                "Configuration error. Please check your config and watch-list files.".to_string()
            }
            PowderwatchError::Http { .. } => {
                "Unable to reach the forecast site. Please check your internet connection."
                    .to_string()
            }
            PowderwatchError::Parse { message } => {
                format!("Unexpected page content: {message}")
            }
            PowderwatchError::Cache { .. } => {
                "Cache files are unreadable. Clearing the cache directory usually helps."
                    .to_string()
            }
            PowderwatchError::Io { .. } => {
                "A file operation failed. Check the cache and watch-list paths.".to_string()
            }
            PowderwatchError::General { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_create_matching_variants() {
        let config_err = PowderwatchError::config("missing watch-list");
        assert!(matches!(config_err, PowderwatchError::Config { .. }));

        let http_err = PowderwatchError::http("connection failed");
        assert!(matches!(http_err, PowderwatchError::Http { .. }));

        let parse_err = PowderwatchError::parse("bad bulk response");
        assert!(matches!(parse_err, PowderwatchError::Parse { .. }));
    }

    #[test]
    fn test_user_messages_name_the_problem() {
        let config_err = PowderwatchError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let http_err = PowderwatchError::http("test");
        assert!(http_err.user_message().contains("Unable to reach"));

        let parse_err = PowderwatchError::parse("stray markup");
        assert!(parse_err.user_message().contains("stray markup"));
    }

    #[test]
    fn test_io_errors_convert_via_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let watch_err: PowderwatchError = io_err.into();
        assert!(matches!(watch_err, PowderwatchError::Io { .. }));
    }
}
