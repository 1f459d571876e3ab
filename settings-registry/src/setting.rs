//! Registered settings and the accessors bound to them.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use settings_codec::CodecResult;

use crate::{RegistryError, RegistryResult};

/// Live accessor pair bound to one in-process variable.
pub trait SettingAccess: Send + Sync {
    /// Returns the string-encoded current value.
    fn get(&self) -> String;

    /// Decodes `value` and assigns it. On failure the variable is unchanged.
    ///
    /// # Errors
    ///
    /// Returns the codec error describing why `value` was rejected.
    fn set(&self, value: &str) -> CodecResult<()>;
}

/// Object that describes and manages its own setting.
///
/// Useful when a component already owns its state and wants to expose it as a
/// setting without handing out a [`SettingCell`](crate::SettingCell).
pub trait SettingSource: Send + Sync + 'static {
    /// Unique setting name.
    fn setting_name(&self) -> &str;

    /// Human-readable description.
    fn setting_description(&self) -> &str;

    /// Returns the string-encoded current value.
    fn setting_get(&self) -> String;

    /// Decodes and applies a new value.
    ///
    /// # Errors
    ///
    /// Returns the codec error describing why `value` was rejected.
    fn setting_set(&self, value: &str) -> CodecResult<()>;
}

pub(crate) struct FnAccess<G, S> {
    pub(crate) get: G,
    pub(crate) set: S,
}

impl<G, S> SettingAccess for FnAccess<G, S>
where
    G: Fn() -> String + Send + Sync,
    S: Fn(&str) -> CodecResult<()> + Send + Sync,
{
    fn get(&self) -> String {
        (self.get)()
    }

    fn set(&self, value: &str) -> CodecResult<()> {
        (self.set)(value)
    }
}

pub(crate) struct SourceAccess<T>(pub(crate) Arc<T>);

impl<T: SettingSource> SettingAccess for SourceAccess<T> {
    fn get(&self) -> String {
        self.0.setting_get()
    }

    fn set(&self, value: &str) -> CodecResult<()> {
        self.0.setting_set(value)
    }
}

/// A registered setting: name, description, and live accessors.
///
/// Cloning is cheap; clones share the same accessors.
#[derive(Clone)]
pub struct Setting {
    name: String,
    description: String,
    access: Arc<dyn SettingAccess>,
}

impl Setting {
    pub(crate) fn new(name: String, description: String, access: Arc<dyn SettingAccess>) -> Self {
        Self {
            name,
            description,
            access,
        }
    }

    /// Returns the setting name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the current live value, string-encoded.
    #[must_use]
    pub fn get(&self) -> String {
        self.access.get()
    }

    /// Decodes and applies a new live value.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Codec`] when the value cannot be decoded or fails
    /// validation; the bound variable keeps its previous value.
    pub fn set(&self, value: &str) -> RegistryResult<()> {
        self.access
            .set(value)
            .map_err(|source| RegistryError::Codec {
                name: self.name.clone(),
                source,
            })
    }

    /// Captures the current value as a view entry.
    #[must_use]
    pub fn entry(&self) -> SettingEntry {
        SettingEntry::new(&self.name, self.get(), &self.description)
    }
}

impl fmt::Debug for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setting")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("access", &"dyn SettingAccess")
            .finish()
    }
}

/// Key/value/description triple used by every resolved view and by the
/// live query wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingEntry {
    /// Setting name.
    pub key: String,
    /// String-encoded value.
    pub value: String,
    /// Description, empty when unknown.
    #[serde(default)]
    pub description: String,
}

impl SettingEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn entry_wire_shape() {
        let entry = SettingEntry::new("port", "8080", "Listen port");
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({ "key": "port", "value": "8080", "description": "Listen port" })
        );

        let decoded: SettingEntry =
            serde_json::from_value(json!({ "key": "port", "value": "8080" })).unwrap();
        assert_eq!(decoded, SettingEntry::new("port", "8080", ""));

        assert!(serde_json::from_value::<SettingEntry>(json!({ "key": "port" })).is_err());
    }
}
