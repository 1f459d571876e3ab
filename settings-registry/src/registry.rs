//! Process-wide table of registered settings.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use settings_codec::{Codec, CodecError, CodecResult, SettingValue};
use thiserror::Error;
use tracing::debug;

use crate::setting::{FnAccess, SourceAccess};
use crate::{Setting, SettingAccess, SettingCell, SettingEntry, SettingSource};

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Default)]
struct RegistryInner {
    settings: Vec<Setting>,
    index: HashMap<String, usize>,
}

/// Registry that stores settings keyed by name, in registration order.
///
/// A single reader/writer lock guards the table: registration and reset take
/// it exclusively, lookups and enumeration share it. A lookup issued after a
/// registration returned always observes that registration.
#[derive(Default)]
pub struct Registry {
    inner: RwLock<RegistryInner>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("registered", &self.names())
            .finish()
    }
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a setting from a getter/setter pair.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidName`] for a blank name and
    /// [`RegistryError::Duplicate`] if the name is already registered.
    pub fn register<G, S>(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        get: G,
        set: S,
    ) -> RegistryResult<()>
    where
        G: Fn() -> String + Send + Sync + 'static,
        S: Fn(&str) -> CodecResult<()> + Send + Sync + 'static,
    {
        self.insert(name.into(), description.into(), Arc::new(FnAccess { get, set }))
    }

    /// Registers a setting bound to `cell`, encoded with `codec`.
    ///
    /// `set` parses first and assigns only on success, so a rejected value
    /// never touches the cell.
    ///
    /// # Errors
    ///
    /// See [`Registry::register`].
    pub fn register_typed<C>(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        cell: SettingCell<C::Value>,
        codec: C,
    ) -> RegistryResult<()>
    where
        C: Codec,
    {
        let codec = Arc::new(codec);
        let getter = {
            let cell = cell.clone();
            let codec = Arc::clone(&codec);
            move || cell.with(|value| codec.format(value))
        };
        let setter = move |input: &str| {
            let value = codec.parse(input)?;
            cell.set(value);
            Ok(())
        };
        self.register(name, description, getter, setter)
    }

    /// Registers a setting bound to `cell` using the type's default codec.
    ///
    /// # Errors
    ///
    /// See [`Registry::register`].
    pub fn register_value<T>(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        cell: SettingCell<T>,
    ) -> RegistryResult<()>
    where
        T: SettingValue,
    {
        self.register_typed(name, description, cell, T::default_codec())
    }

    /// Registers an object that manages its own setting.
    ///
    /// # Errors
    ///
    /// See [`Registry::register`].
    pub fn register_source<T>(&self, source: T) -> RegistryResult<()>
    where
        T: SettingSource,
    {
        let source = Arc::new(source);
        let name = source.setting_name().to_owned();
        let description = source.setting_description().to_owned();
        self.insert(name, description, Arc::new(SourceAccess(source)))
    }

    fn insert(
        &self,
        name: String,
        description: String,
        access: Arc<dyn SettingAccess>,
    ) -> RegistryResult<()> {
        if name.trim().is_empty() {
            return Err(RegistryError::InvalidName { name });
        }

        let mut inner = self.inner.write().expect("settings registry poisoned");
        if inner.index.contains_key(&name) {
            return Err(RegistryError::Duplicate { name });
        }

        let position = inner.settings.len();
        inner.index.insert(name.clone(), position);
        inner
            .settings
            .push(Setting::new(name.clone(), description, access));
        drop(inner);

        debug!(setting = %name, "setting registered");
        Ok(())
    }

    /// Returns the setting registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no such setting exists.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    pub fn lookup(&self, name: &str) -> RegistryResult<Setting> {
        let inner = self.inner.read().expect("settings registry poisoned");
        inner
            .index
            .get(name)
            .map(|&position| inner.settings[position].clone())
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_owned(),
            })
    }

    /// Returns `true` if `name` is registered.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let inner = self.inner.read().expect("settings registry poisoned");
        inner.index.contains_key(name)
    }

    /// Returns a snapshot of every setting in registration order.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn all(&self) -> Vec<Setting> {
        let inner = self.inner.read().expect("settings registry poisoned");
        inner.settings.clone()
    }

    /// Captures the live value of every setting, in registration order.
    ///
    /// The lock is held for the whole pass so the result is a consistent
    /// snapshot with respect to registration.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn entries(&self) -> Vec<SettingEntry> {
        let inner = self.inner.read().expect("settings registry poisoned");
        inner.settings.iter().map(Setting::entry).collect()
    }

    /// Returns a name to live value map, suitable for interpolating current
    /// values into help text or command-line defaults.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn vars(&self) -> BTreeMap<String, String> {
        let inner = self.inner.read().expect("settings registry poisoned");
        inner
            .settings
            .iter()
            .map(|setting| (setting.name().to_owned(), setting.get()))
            .collect()
    }

    /// Returns the registered names in registration order.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let inner = self.inner.read().expect("settings registry poisoned");
        inner
            .settings
            .iter()
            .map(|setting| setting.name().to_owned())
            .collect()
    }

    /// Returns the number of registered settings.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().expect("settings registry poisoned").settings.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every setting. Intended for tests.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    pub fn reset(&self) {
        let mut inner = self.inner.write().expect("settings registry poisoned");
        inner.settings.clear();
        inner.index.clear();
    }
}

/// Errors produced by registration, lookup, and value application.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Setting name was blank.
    #[error("invalid setting name `{name}`: name cannot be empty")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// Setting name collided with an existing registration.
    #[error("setting `{name}` is already registered")]
    Duplicate {
        /// Name of the offending setting.
        name: String,
    },

    /// Requested setting does not exist.
    #[error("setting `{name}` not found")]
    NotFound {
        /// Name of the missing setting.
        name: String,
    },

    /// A value could not be applied to the named setting.
    #[error("setting `{name}`: {source}")]
    Codec {
        /// Name of the setting being updated.
        name: String,
        /// Decode or validation failure.
        #[source]
        source: CodecError,
    },
}

impl RegistryError {
    /// Returns the name of the setting the error refers to.
    #[must_use]
    pub fn setting_name(&self) -> &str {
        match self {
            Self::InvalidName { name }
            | Self::Duplicate { name }
            | Self::NotFound { name }
            | Self::Codec { name, .. } => name,
        }
    }

    /// Returns the codec failure, if this error wraps one.
    #[must_use]
    pub fn codec_error(&self) -> Option<&CodecError> {
        match self {
            Self::Codec { source, .. } => Some(source),
            _ => None,
        }
    }
}
