//! Persistent key-value store: the host-environment storage capability.
//!
//! Values are raw strings; a key may also be present with a null value, which
//! is what settings cleanup looks for. [`ValueDb`] persists to SQLite under the
//! XDG state directory, [`MemoryStore`] keeps everything in-process.

mod db;
mod memory;

pub use db::ValueDb;
pub use memory::MemoryStore;

use crate::error::Result;

/// Storage hooks the flows need from their host.
///
/// `get_value` returns `None` both for absent keys and for keys stored with a
/// null value; `list_keys` includes the latter.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn list_keys(&self) -> Result<Vec<String>>;
    async fn get_value(&self, key: &str) -> Result<Option<String>>;
    async fn set_value(&self, key: &str, value: Option<&str>) -> Result<()>;
    async fn delete_value(&self, key: &str) -> Result<()>;
}
