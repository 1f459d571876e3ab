//! Codec trait and the mapping from Rust types to their default codec.

use crate::CodecResult;

/// Bidirectional converter between a string encoding and a typed value.
///
/// `parse` is fallible and must not have side effects; `format` is total over
/// every value the type can hold.
pub trait Codec: Send + Sync + 'static {
    /// Typed value produced by this codec.
    type Value: Send + Sync + 'static;

    /// Returns the name used in error messages.
    fn type_name(&self) -> &'static str;

    /// Decodes a value from its string encoding.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`](crate::CodecError::Decode) when the input is
    /// malformed, or [`CodecError::Validation`](crate::CodecError::Validation) when
    /// it is well-formed but semantically invalid.
    fn parse(&self, input: &str) -> CodecResult<Self::Value>;

    /// Encodes a value into its canonical string form.
    fn format(&self, value: &Self::Value) -> String;
}

/// Types that can back a setting without naming a codec explicitly.
pub trait SettingValue: Send + Sync + Sized + 'static {
    /// Codec used when none is supplied at registration.
    type Codec: Codec<Value = Self> + Default;

    /// Returns a fresh instance of the default codec.
    #[must_use]
    fn default_codec() -> Self::Codec {
        Self::Codec::default()
    }
}
