use dashmap::DashMap;
use std::hash::Hash;

/// Insert-if-absent helpers for [`DashMap`] based caches.
///
/// The `*_with` variants run the constructor without holding a shard lock, so two callers missing
/// the same key at the same time may both construct a value. Only the first one stored is kept and
/// every caller gets that stored value back.
pub trait DashMapExtension<K: Eq + Hash, V: Clone> {
  /// Returns the existing value for `key`, or stores `value`.
  /// The flag is `true` when the value was already present.
  fn load_or_store(&self, key: K, value: V) -> (V, bool);

  fn load_or_store_with<F>(&self, key: K, f: F) -> (V, bool)
  where
    F: FnOnce() -> V;

  /// Like [`DashMapExtension::load_or_store_with`], but a failing constructor stores nothing.
  fn load_or_try_store_with<F, E>(&self, key: K, f: F) -> Result<(V, bool), E>
  where
    F: FnOnce() -> Result<V, E>;
}

impl<K: Eq + Hash, V: Clone> DashMapExtension<K, V> for DashMap<K, V> {
  fn load_or_store(&self, key: K, value: V) -> (V, bool) {
    match self.entry(key) {
      dashmap::mapref::entry::Entry::Occupied(entry) => (entry.get().clone(), true),
      dashmap::mapref::entry::Entry::Vacant(entry) => (entry.insert(value).clone(), false),
    }
  }

  fn load_or_store_with<F>(&self, key: K, f: F) -> (V, bool)
  where
    F: FnOnce() -> V, {
    if let Some(existing) = self.get(&key) {
      return (existing.value().clone(), true);
    }
    self.load_or_store(key, f())
  }

  fn load_or_try_store_with<F, E>(&self, key: K, f: F) -> Result<(V, bool), E>
  where
    F: FnOnce() -> Result<V, E>, {
    if let Some(existing) = self.get(&key) {
      return Ok((existing.value().clone(), true));
    }
    let value = f()?;
    Ok(self.load_or_store(key, value))
  }
}
