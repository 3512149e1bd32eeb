//! File-backed persistence for the product catalog.
//!
//! The whole [`Catalog`] is the unit of I/O: every load reads the full
//! document and every save rewrites it.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error};

use crate::models::Catalog;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not encode catalog: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("could not write {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// Why a load fell back to the empty catalog.
#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error("file does not exist")]
    Missing,

    #[error("file is unreadable: {0}")]
    Unreadable(io::Error),

    #[error("file is not a valid catalog: {0}")]
    Malformed(serde_json::Error),
}

#[derive(Debug)]
pub struct ProductStore {
    path: PathBuf,
    /// Held by mutating operations across load, mutate and save.
    writer: Mutex<()>,
}

impl ProductStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serializes writers. Readers never take this lock.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().await
    }

    /// Reads the catalog, or an empty one if the file is missing, unreadable
    /// or malformed. The fallback is logged, never returned as an error.
    pub async fn load(&self) -> Catalog {
        match self.read().await {
            Ok(catalog) => catalog,
            Err(reason) => {
                error!(path = %self.path.display(), %reason, "Reading product data failed, using empty catalog");
                Catalog::default()
            }
        }
    }

    async fn read(&self) -> Result<Catalog, LoadError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LoadError::Missing,
            _ => LoadError::Unreadable(e),
        })?;

        serde_json::from_slice(&bytes).map_err(LoadError::Malformed)
    }

    /// Overwrites the file with the pretty-printed catalog.
    ///
    /// The document goes to a sibling `.tmp` file first and is renamed over
    /// the target, so a concurrent `load` sees either the old or new catalog.
    pub async fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(catalog)?;
        let tmp_path = self.tmp_path();

        tokio::fs::write(&tmp_path, &json)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp_path.clone(),
                source,
            })?;

        if let Err(source) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StoreError::Io {
                path: self.path.clone(),
                source,
            });
        }

        debug!(
            path = %self.path.display(),
            products = catalog.products.len(),
            bytes = json.len(),
            "Saved product data"
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("data.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
