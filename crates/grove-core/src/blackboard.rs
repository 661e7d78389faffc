use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

/// A string key that also fixes the value type stored under it.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BbKey<T: 'static> {
    name: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> BbKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub fn name(self) -> &'static str {
        self.name
    }
}

/// Weak reference to an externally owned object.
///
/// Stored in place of the object itself so the blackboard never extends the
/// lifetime of host data; readers must go through [`Blackboard::get_ref`].
struct ExternalRef<T: Send + Sync + 'static>(Weak<T>);

/// Dynamically typed key/value store shared by the nodes of one tree.
///
/// Typed reads never panic: an absent key and a key holding another type both
/// read as "no value".
#[derive(Default)]
pub struct Blackboard {
    values: BTreeMap<String, Box<dyn Any + Send>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Stores `value`, replacing whatever was under `key` regardless of type.
    pub fn set<T: Any + Send>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Box::new(value));
    }

    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        let value = self.values.get(key)?;
        let typed = value.downcast_ref::<T>();
        if typed.is_none() {
            tracing::debug!(key, requested = type_name::<T>(), "blackboard type mismatch");
        }
        typed
    }

    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.values.get_mut(key)?.downcast_mut::<T>()
    }

    /// Returns a copy of the value under `key`, or `default` when the key is
    /// absent or holds a different type.
    pub fn get_or<T: Any + Clone>(&self, key: &str, default: T) -> T {
        self.get::<T>(key).cloned().unwrap_or(default)
    }

    /// Removes `key`; returns whether anything was stored there.
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    /// Removes and returns the value if it has type `T`. A value of another
    /// type is left in place.
    pub fn take<T: Any>(&mut self, key: &str) -> Option<T> {
        if !self.values.get(key)?.is::<T>() {
            return None;
        }
        let value = self.values.remove(key)?;
        value.downcast::<T>().ok().map(|b| *b)
    }

    /// Every key currently stored, in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    pub fn all_keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    pub fn get_typed<T: Any>(&self, key: BbKey<T>) -> Option<&T> {
        self.get(key.name)
    }

    pub fn set_typed<T: Any + Send>(&mut self, key: BbKey<T>, value: T) {
        self.set(key.name, value);
    }

    /// Stores a non-owning reference to `target`.
    pub fn set_ref<T: Send + Sync + 'static>(&mut self, key: impl Into<String>, target: &Arc<T>) {
        self.set(key, ExternalRef(Arc::downgrade(target)));
    }

    /// Resolves a reference stored with [`Blackboard::set_ref`]. Returns `None`
    /// when the key is absent, holds something else, or the target was dropped.
    pub fn get_ref<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
        self.get::<ExternalRef<T>>(key)?.0.upgrade()
    }
}

impl fmt::Debug for Blackboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}
