//! Durable client-side key/value storage.
//!
//! The State Manager persists a small part of the layout state through
//! [`KeyValueStore`]. In the browser this is `window.localStorage`
//! ([`LocalStorage`], WASM only); elsewhere [`MemoryStore`] keeps the values
//! in a map and can be told to fail, which is how the degradation paths are
//! exercised in tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// String key/value storage with fallible access.
pub trait KeyValueStore {
	/// Reads a value. `Ok(None)` means the key is absent.
	fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

	/// Writes a value.
	fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

	/// Removes a key. Removing an absent key is not an error.
	fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Reads a JSON-encoded value.
pub fn read_json<T: DeserializeOwned>(
	store: &dyn KeyValueStore,
	key: &str,
) -> Result<Option<T>, StorageError> {
	match store.get_item(key)? {
		Some(raw) => serde_json::from_str(&raw)
			.map(Some)
			.map_err(|source| StorageError::Decode {
				key: key.to_string(),
				source,
			}),
		None => Ok(None),
	}
}

/// Writes a value as JSON.
pub fn write_json<T: Serialize + ?Sized>(
	store: &dyn KeyValueStore,
	key: &str,
	value: &T,
) -> Result<(), StorageError> {
	let raw = serde_json::to_string(value).map_err(|e| StorageError::Write {
		key: key.to_string(),
		reason: e.to_string(),
	})?;
	store.set_item(key, &raw)
}

/// In-memory [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
	items: RefCell<HashMap<String, String>>,
	fail_reads: Cell<bool>,
	fail_writes: Cell<bool>,
}

impl MemoryStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Makes every subsequent read fail.
	pub fn fail_reads(&self, fail: bool) {
		self.fail_reads.set(fail);
	}

	/// Makes every subsequent write fail.
	pub fn fail_writes(&self, fail: bool) {
		self.fail_writes.set(fail);
	}

	/// Returns the raw stored value, bypassing failure injection.
	pub fn raw(&self, key: &str) -> Option<String> {
		self.items.borrow().get(key).cloned()
	}

	/// Returns the number of stored keys.
	pub fn len(&self) -> usize {
		self.items.borrow().len()
	}

	/// Returns true if nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.items.borrow().is_empty()
	}
}

impl KeyValueStore for MemoryStore {
	fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
		if self.fail_reads.get() {
			return Err(StorageError::Read {
				key: key.to_string(),
				reason: "read failure injected".to_string(),
			});
		}
		Ok(self.items.borrow().get(key).cloned())
	}

	fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
		if self.fail_writes.get() {
			return Err(StorageError::Write {
				key: key.to_string(),
				reason: "write failure injected".to_string(),
			});
		}
		self.items
			.borrow_mut()
			.insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove_item(&self, key: &str) -> Result<(), StorageError> {
		if self.fail_writes.get() {
			return Err(StorageError::Write {
				key: key.to_string(),
				reason: "write failure injected".to_string(),
			});
		}
		self.items.borrow_mut().remove(key);
		Ok(())
	}
}

/// `window.localStorage` backed [`KeyValueStore`].
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
	/// Creates a handle. Access is resolved lazily on every call, so a
	/// storage that becomes unavailable later degrades to errors.
	pub fn new() -> Self {
		Self
	}

	fn storage(&self) -> Result<web_sys::Storage, StorageError> {
		web_sys::window()
			.and_then(|w| w.local_storage().ok().flatten())
			.ok_or(StorageError::Unavailable)
	}
}

#[cfg(target_arch = "wasm32")]
fn js_reason(value: wasm_bindgen::JsValue) -> String {
	value
		.as_string()
		.unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
	fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
		self.storage()?
			.get_item(key)
			.map_err(|e| StorageError::Read {
				key: key.to_string(),
				reason: js_reason(e),
			})
	}

	fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
		self.storage()?
			.set_item(key, value)
			.map_err(|e| StorageError::Write {
				key: key.to_string(),
				reason: js_reason(e),
			})
	}

	fn remove_item(&self, key: &str) -> Result<(), StorageError> {
		self.storage()?
			.remove_item(key)
			.map_err(|e| StorageError::Write {
				key: key.to_string(),
				reason: js_reason(e),
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn store() -> MemoryStore {
		MemoryStore::new()
	}

	#[rstest]
	fn test_absent_key_reads_none(store: MemoryStore) {
		assert_eq!(store.get_item("missing").unwrap(), None);
		assert_eq!(read_json::<bool>(&store, "missing").unwrap(), None);
	}

	#[rstest]
	fn test_json_helpers(store: MemoryStore) {
		write_json(&store, "template:sidebar:state", &false).unwrap();
		assert_eq!(store.raw("template:sidebar:state").as_deref(), Some("false"));
		assert_eq!(
			read_json::<bool>(&store, "template:sidebar:state").unwrap(),
			Some(false)
		);
	}

	#[rstest]
	fn test_decode_error(store: MemoryStore) {
		store.set_item("template:sidebar:state", "not-json").unwrap();
		let result = read_json::<bool>(&store, "template:sidebar:state");
		assert!(matches!(result, Err(StorageError::Decode { .. })));
	}

	#[rstest]
	fn test_injected_failures(store: MemoryStore) {
		store.fail_writes(true);
		assert!(store.set_item("k", "v").is_err());
		assert!(store.is_empty());

		store.fail_writes(false);
		store.set_item("k", "v").unwrap();
		store.fail_reads(true);
		assert!(matches!(store.get_item("k"), Err(StorageError::Read { .. })));
		assert_eq!(store.raw("k").as_deref(), Some("v"));
	}

	#[rstest]
	fn test_remove_item(store: MemoryStore) {
		store.set_item("k", "v").unwrap();
		store.remove_item("k").unwrap();
		store.remove_item("k").unwrap();
		assert_eq!(store.len(), 0);
	}
}
