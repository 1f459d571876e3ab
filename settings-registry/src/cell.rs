//! Shared handle to the variable a setting is bound to.

use std::fmt;
use std::sync::{Arc, RwLock};

/// Cloneable, thread-safe handle to a setting's backing variable.
///
/// Application code keeps one clone and reads it wherever the value is
/// needed; the registry keeps another to serve `get` and `set`.
pub struct SettingCell<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> SettingCell<T> {
    /// Wraps an initial (compiled-in) value.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Runs `f` against the current value without cloning it.
    ///
    /// # Panics
    ///
    /// Panics if the cell lock is poisoned.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.read().expect("setting cell poisoned");
        f(&guard)
    }

    /// Replaces the value, returning the previous one.
    ///
    /// # Panics
    ///
    /// Panics if the cell lock is poisoned.
    pub fn set(&self, value: T) -> T {
        let mut guard = self.inner.write().expect("setting cell poisoned");
        std::mem::replace(&mut *guard, value)
    }
}

impl<T: Clone> SettingCell<T> {
    /// Returns a copy of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.with(T::clone)
    }
}

impl<T> Clone for SettingCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for SettingCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for SettingCell<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for SettingCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|value| f.debug_tuple("SettingCell").field(value).finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_value() {
        let cell = SettingCell::new(5_u32);
        let other = cell.clone();
        assert_eq!(other.set(9), 5);
        assert_eq!(cell.get(), 9);
        assert_eq!(cell.with(|v| v * 2), 18);
    }
}
