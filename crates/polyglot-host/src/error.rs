//! Error types.

use crate::host::HostValue;

/// Interop-level failures surfaced to guest code
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InteropError {
    /// The operation does not support the given value(s)
    #[error("Unsupported type: [{}]", display_values(.values))]
    UnsupportedType {
        /// Values that were rejected
        values: Vec<HostValue>,
    },

    /// No (writable) member with this name
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),
}

impl InteropError {
    /// Create an unsupported-type error for the given values
    pub fn unsupported_type(values: impl Into<Vec<HostValue>>) -> Self {
        InteropError::UnsupportedType {
            values: values.into(),
        }
    }

    /// Create an unknown-identifier error
    pub fn unknown_identifier(name: impl Into<String>) -> Self {
        InteropError::UnknownIdentifier(name.into())
    }
}

fn display_values(values: &[HostValue]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Interop result
pub type InteropResult<T> = Result<T, InteropError>;

/// Errors that can occur while loading runtime options
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read options file
    #[error("Failed to read options file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse options: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is present but not understood
    #[error("Invalid options: {0}")]
    Invalid(String),

    /// Options were already installed for this process
    #[error("Runtime options are already installed")]
    AlreadyInstalled,
}

/// Report a broken accessibility precondition or environment inconsistency.
#[cold]
#[track_caller]
pub(crate) fn internal_fault(context: &str, detail: impl std::fmt::Display) -> ! {
    panic!("internal host access fault in {}: {}", context, detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_display() {
        let err = InteropError::unsupported_type(vec![HostValue::Int(1), HostValue::from("a")]);
        assert_eq!(err.to_string(), "Unsupported type: [1, \"a\"]");

        let empty = InteropError::unsupported_type(Vec::new());
        assert_eq!(empty.to_string(), "Unsupported type: []");
    }

    #[test]
    fn test_unknown_identifier_display() {
        let err = InteropError::unknown_identifier("NAME");
        assert_eq!(err.to_string(), "Unknown identifier: NAME");
    }
}
