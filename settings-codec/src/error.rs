//! Error definitions shared by every codec.

use std::fmt::Display;

use thiserror::Error;

/// Result alias used by codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Errors produced while decoding a setting value from its string form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The string is not well-formed for the target type.
    #[error("cannot decode `{input}` as {type_name}: {reason}")]
    Decode {
        /// The offending input string.
        input: String,
        /// Name of the target type.
        type_name: &'static str,
        /// Human-readable reason reported by the parser.
        reason: String,
    },

    /// The string decoded but is not semantically valid for the target type.
    #[error("invalid {type_name} `{input}`: {reason}")]
    Validation {
        /// The offending input string.
        input: String,
        /// Name of the target type.
        type_name: &'static str,
        /// Human-readable reason for rejection.
        reason: String,
    },
}

impl CodecError {
    /// Builds a [`CodecError::Decode`] from any displayable parser error.
    #[must_use]
    pub fn decode(input: &str, type_name: &'static str, reason: impl Display) -> Self {
        Self::Decode {
            input: input.to_owned(),
            type_name,
            reason: reason.to_string(),
        }
    }

    /// Builds a [`CodecError::Validation`] from any displayable reason.
    #[must_use]
    pub fn validation(input: &str, type_name: &'static str, reason: impl Display) -> Self {
        Self::Validation {
            input: input.to_owned(),
            type_name,
            reason: reason.to_string(),
        }
    }

    /// Returns the raw input that failed to decode.
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Self::Decode { input, .. } | Self::Validation { input, .. } => input,
        }
    }

    /// Returns the name of the type the input was decoded into.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Decode { type_name, .. } | Self::Validation { type_name, .. } => type_name,
        }
    }
}
