//! File-backed storage.
//!
//! Each key lives in its own `<key>.json` file inside the storage directory.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rootcraft::storage::{Storage, StorageError};
use tracing::debug;

/// Storage backed by a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();

        fs::create_dir_all(&dir)?;

        debug!(dir = %dir.display(), "opened file storage");

        Ok(Self { dir })
    }

    /// Directory holding the stored files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        if !valid {
            return Err(StorageError::Unavailable(format!("invalid key {key:?}")));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        let staging = path.with_extension("json.tmp");

        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rootcraft::{
        cart::Cart,
        items::CartItem,
        storage::CART_KEY,
        toasts::Toasts,
    };
    use rust_decimal::Decimal;
    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_key_reads_as_none() -> TestResult {
        let dir = tempdir()?;
        let storage = FileStorage::open(dir.path())?;

        assert_eq!(storage.get_item(CART_KEY)?, None);

        Ok(())
    }

    #[test]
    fn values_round_trip_through_files() -> TestResult {
        let dir = tempdir()?;
        let storage = FileStorage::open(dir.path())?;

        storage.set_item(CART_KEY, "[]")?;

        assert_eq!(storage.get_item(CART_KEY)?, Some("[]".to_string()));
        assert!(dir.path().join("rootcraft_cart.json").exists());

        storage.remove_item(CART_KEY)?;
        storage.remove_item(CART_KEY)?;

        assert_eq!(storage.get_item(CART_KEY)?, None);

        Ok(())
    }

    #[test]
    fn open_creates_nested_directories() -> TestResult {
        let dir = tempdir()?;
        let nested = dir.path().join("a").join("b");

        let storage = FileStorage::open(&nested)?;

        assert!(storage.dir().is_dir());

        Ok(())
    }

    #[test]
    fn keys_cannot_escape_the_directory() -> TestResult {
        let dir = tempdir()?;
        let storage = FileStorage::open(dir.path())?;

        let result = storage.set_item("../outside", "x");

        assert!(
            matches!(result, Err(StorageError::Unavailable(_))),
            "expected Unavailable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn cart_survives_a_new_process() -> TestResult {
        let dir = tempdir()?;

        let first = Cart::new(Arc::new(FileStorage::open(dir.path())?), Toasts::new());

        first.add_to_cart(CartItem {
            id: "p1".to_string(),
            name: "Oak Chair".to_string(),
            description: String::new(),
            image: String::new(),
            price: Decimal::from(1_000),
            old_price: None,
            quantity: 1,
            tag: None,
        });
        first.update_quantity("p1", 3);

        let second = Cart::new(Arc::new(FileStorage::open(dir.path())?), Toasts::new());

        assert_eq!(second.items(), first.items());
        assert_eq!(second.total_items(), 3);

        Ok(())
    }
}
