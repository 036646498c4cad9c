//! Errors raised while loading `blogql.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read blogql config `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid blogql.toml: {0}")]
    Toml(#[from] toml::de::Error),

    /// Parsed, but violates a rule serde cannot express (duplicate theme ids,
    /// non-scalar scope values, depth below 1).
    #[error("invalid blogql config: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_error_names_file_and_keeps_source() {
        let err = ConfigError::Io(
            PathBuf::from("/srv/shop/blogql.toml"),
            Error::new(ErrorKind::PermissionDenied, "permission denied"),
        );
        assert_eq!(err.to_string(), "cannot read blogql config `/srv/shop/blogql.toml`");
        assert_eq!(err.source().unwrap().to_string(), "permission denied");
    }

    #[test]
    fn test_toml_error_includes_parser_message() {
        let err: ConfigError = toml::from_str::<toml::Value>("scope = ").unwrap_err().into();
        assert!(err.to_string().starts_with("invalid blogql.toml: "));
        assert!(err.to_string().len() > "invalid blogql.toml: ".len());
    }

    #[test]
    fn test_validation_message() {
        let err = ConfigError::Validation("duplicate theme id `3`".into());
        assert_eq!(err.to_string(), "invalid blogql config: duplicate theme id `3`");
    }
}
