//! File-based implementation of the KeyStore trait.
//!
//! Layout: `{configDir}/{accountId}/NotaryKey` and
//! `{configDir}/{accountId}/NotaryCertificate`. The directory is created
//! with mode 0700 and the files with mode 0600; permissions are verified
//! before every read and after every write. Writes go to a temp sibling,
//! are fsynced, then renamed over the target, so a crash never leaves a
//! half-written key.

use std::path::PathBuf;

use async_trait::async_trait;
use bali_notary_values::Tag;
use zeroize::Zeroizing;

use crate::error::{Result, StoreError};
use crate::traits::{KeyStore, StoredKey};

/// File name of the private key record.
pub const KEY_FILE: &str = "NotaryKey";

/// File name of the certificate document.
pub const CERTIFICATE_FILE: &str = "NotaryCertificate";

/// File-based store for one notary key.
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `{config_dir}/{account_id}/`, creating the
    /// directory with owner-only permissions if needed.
    ///
    /// `config_dir` defaults to `$HOME/.bali/`. On platforms without POSIX
    /// file modes this fails with [`StoreError::UnsupportedPlatform`]
    /// rather than silently weakening the permission guarantee.
    pub fn new(config_dir: Option<PathBuf>, account_id: &Tag) -> Result<Self> {
        let config_dir = match config_dir {
            Some(dir) => dir,
            None => default_config_dir()?,
        };
        let directory = config_dir.join(account_id.to_base32());
        platform::prepare_directory(&directory)?;
        Ok(Self { directory })
    }

    /// The per-account directory holding the key files.
    pub fn directory(&self) -> &std::path::Path {
        &self.directory
    }
}

#[async_trait]
impl KeyStore for FileStore {
    async fn load(&self) -> Result<Option<StoredKey>> {
        let key_path = self.directory.join(KEY_FILE);
        if !key_path.exists() {
            return Ok(None);
        }
        let key = Zeroizing::new(platform::read_private(&key_path)?);
        let certificate = platform::read_private(&self.directory.join(CERTIFICATE_FILE))?;
        Ok(Some(StoredKey { key, certificate }))
    }

    async fn save(&self, key: &str, certificate: &str) -> Result<()> {
        platform::write_atomic(&self.directory, KEY_FILE, key)?;
        platform::write_atomic(&self.directory, CERTIFICATE_FILE, certificate)?;
        tracing::info!(directory = %self.directory.display(), "persisted notary key");
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        for name in [KEY_FILE, CERTIFICATE_FILE] {
            let path = self.directory.join(name);
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }
        tracing::info!(directory = %self.directory.display(), "deleted notary key");
        Ok(())
    }
}

fn default_config_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".bali"))
        .ok_or_else(|| StoreError::NoConfigDir("HOME is not set".into()))
}

#[cfg(unix)]
mod platform {
    use std::fs::{self, OpenOptions};
    use std::io::{Read, Write};
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    use std::path::Path;

    use crate::error::{Result, StoreError};

    /// Create the account directory with mode 0700 and verify nobody else
    /// can reach it.
    pub fn prepare_directory(directory: &Path) -> Result<()> {
        if !directory.exists() {
            fs::create_dir_all(directory)?;
            fs::set_permissions(directory, fs::Permissions::from_mode(0o700))?;
        }
        check_private(directory)?;
        Ok(())
    }

    /// Read a whole file, refusing if its permissions have been widened.
    pub fn read_private(path: &Path) -> Result<String> {
        check_private(path)?;
        let mut content = String::new();
        fs::File::open(path)?.read_to_string(&mut content)?;
        Ok(content)
    }

    /// Write to a temp sibling with mode 0600, fsync, then rename over the
    /// target. A trailing LF is appended if the content lacks one.
    pub fn write_atomic(directory: &Path, name: &str, content: &str) -> Result<()> {
        let path = directory.join(name);
        let temp = directory.join(format!("{name}.tmp"));

        // A leftover temp file from an interrupted write is stale.
        if temp.exists() {
            fs::remove_file(&temp)?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o600)
            .open(&temp)?;
        file.write_all(content.as_bytes())?;
        if !content.ends_with('\n') {
            file.write_all(b"\n")?;
        }
        file.sync_all()?;
        drop(file);

        check_private(&temp)?;
        fs::rename(&temp, &path)?;
        Ok(())
    }

    fn check_private(path: &Path) -> Result<()> {
        let mode = fs::metadata(path)?.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(StoreError::InsecurePermissions {
                path: path.display().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(not(unix))]
mod platform {
    use std::path::Path;

    use crate::error::{Result, StoreError};

    pub fn prepare_directory(_directory: &Path) -> Result<()> {
        Err(StoreError::UnsupportedPlatform)
    }

    pub fn read_private(_path: &Path) -> Result<String> {
        Err(StoreError::UnsupportedPlatform)
    }

    pub fn write_atomic(_directory: &Path, _name: &str, _content: &str) -> Result<()> {
        Err(StoreError::UnsupportedPlatform)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::fs::PermissionsExt;

    use tempfile::TempDir;

    use super::*;

    fn make_store(temp: &TempDir) -> FileStore {
        let account = Tag::from_bytes([0x11; 20]);
        FileStore::new(Some(temp.path().to_path_buf()), &account).unwrap()
    }

    #[tokio::test]
    async fn test_empty_store_loads_none() {
        let temp = TempDir::new().unwrap();
        let store = make_store(&temp);
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = make_store(&temp);
        store.save("key text", "certificate text").await.unwrap();

        let stored = store.load().await.unwrap().unwrap();
        assert_eq!(&*stored.key, "key text\n");
        assert_eq!(stored.certificate, "certificate text\n");
    }

    #[tokio::test]
    async fn test_files_have_owner_only_permissions() {
        let temp = TempDir::new().unwrap();
        let store = make_store(&temp);
        store.save("key", "certificate").await.unwrap();

        for name in [KEY_FILE, CERTIFICATE_FILE] {
            let mode = std::fs::metadata(store.directory().join(name))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o600, "{name} should be 0600");
        }
        let dir_mode = std::fs::metadata(store.directory())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(dir_mode & 0o777, 0o700, "directory should be 0700");
    }

    #[tokio::test]
    async fn test_save_replaces_atomically() {
        let temp = TempDir::new().unwrap();
        let store = make_store(&temp);
        store.save("old key", "old certificate").await.unwrap();
        store.save("new key", "new certificate").await.unwrap();

        let stored = store.load().await.unwrap().unwrap();
        assert_eq!(&*stored.key, "new key\n");

        // No temp siblings left behind.
        let leftovers: Vec<_> = std::fs::read_dir(store.directory())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_files() {
        let temp = TempDir::new().unwrap();
        let store = make_store(&temp);
        store.save("key", "certificate").await.unwrap();
        store.delete().await.unwrap();

        assert!(!store.directory().join(KEY_FILE).exists());
        assert!(!store.directory().join(CERTIFICATE_FILE).exists());
        assert!(store.load().await.unwrap().is_none());

        // Deleting again is a no-op.
        store.delete().await.unwrap();
    }

    #[tokio::test]
    async fn test_widened_permissions_refused_on_load() {
        let temp = TempDir::new().unwrap();
        let store = make_store(&temp);
        store.save("key", "certificate").await.unwrap();

        let key_path = store.directory().join(KEY_FILE);
        std::fs::set_permissions(&key_path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let result = store.load().await;
        assert!(matches!(
            result,
            Err(StoreError::InsecurePermissions { .. })
        ));
    }

    #[test]
    fn test_separate_accounts_use_separate_directories() {
        let temp = TempDir::new().unwrap();
        let first = FileStore::new(
            Some(temp.path().to_path_buf()),
            &Tag::from_bytes([0x11; 20]),
        )
        .unwrap();
        let second = FileStore::new(
            Some(temp.path().to_path_buf()),
            &Tag::from_bytes([0x22; 20]),
        )
        .unwrap();
        assert_ne!(first.directory(), second.directory());
    }
}
