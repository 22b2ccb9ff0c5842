//! Named filter presets with XDG file storage.
//!
//! A preset is a saved [`BooleanQuery`] under a user-chosen name. The whole
//! collection ([`PresetBook`]) is stored as JSON at
//! `~/.local/share/crmq/presets.json` on Linux.
//!
//! Both synchronous and asynchronous I/O methods are provided:
//! - `save()`, `load()` - Synchronous methods using `std::fs`
//! - `save_async()`, `load_async()` - Asynchronous methods using `tokio::fs`

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::catalog::find_similar_name;
use crate::model::BooleanQuery;

/// Default presets filename.
const PRESETS_FILENAME: &str = "presets.json";

/// Application qualifier (for XDG paths).
const QUALIFIER: &str = "";

/// Application organization (for XDG paths).
const ORGANIZATION: &str = "";

/// Application name (for XDG paths).
const APPLICATION: &str = "crmq";

/// Errors that can occur during preset storage operations.
#[derive(Debug, Error)]
pub enum PresetStoreError {
    /// Failed to determine XDG data directory.
    #[error("failed to determine data directory: no valid home directory found")]
    NoDataDir,

    /// I/O error during file read.
    #[error("failed to read presets file '{path}': {source}")]
    ReadError {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during file write.
    #[error("failed to write presets file '{path}': {source}")]
    WriteError {
        /// The path that failed to write.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during directory creation.
    #[error("failed to create data directory '{path}': {source}")]
    CreateDirError {
        /// The directory path that failed to create.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during file delete.
    #[error("failed to delete presets file '{path}': {source}")]
    DeleteError {
        /// The path that failed to delete.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for preset store operations.
pub type Result<T> = std::result::Result<T, PresetStoreError>;

/// A saved query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPreset {
    /// Unique preset name.
    pub name: String,

    /// The saved query.
    pub query: BooleanQuery,

    /// When the preset was last written.
    pub saved_at: DateTime<Utc>,
}

impl FilterPreset {
    /// Creates a preset stamped with the current time.
    pub fn new(name: impl Into<String>, query: BooleanQuery) -> Self {
        Self {
            name: name.into(),
            query,
            saved_at: Utc::now(),
        }
    }
}

/// The full collection of presets, kept sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PresetBookFile")]
pub struct PresetBook {
    presets: Vec<FilterPreset>,
}

/// On-disk shape of a [`PresetBook`]; hand-edited files may be out of order.
#[derive(Deserialize)]
struct PresetBookFile {
    #[serde(default)]
    presets: Vec<FilterPreset>,
}

impl From<PresetBookFile> for PresetBook {
    fn from(file: PresetBookFile) -> Self {
        let mut book = Self {
            presets: file.presets,
        };
        book.normalize();
        book
    }
}

impl PresetBook {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all presets sorted by name.
    pub fn presets(&self) -> &[FilterPreset] {
        &self.presets
    }

    /// Inserts or replaces a preset by name. Returns the replaced preset.
    pub fn upsert(&mut self, preset: FilterPreset) -> Option<FilterPreset> {
        match self.presets.binary_search_by(|p| p.name.cmp(&preset.name)) {
            Ok(pos) => Some(std::mem::replace(&mut self.presets[pos], preset)),
            Err(pos) => {
                self.presets.insert(pos, preset);
                None
            }
        }
    }

    /// Finds a preset by exact name.
    pub fn get(&self, name: &str) -> Option<&FilterPreset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Removes a preset by name.
    pub fn remove(&mut self, name: &str) -> Option<FilterPreset> {
        let pos = self.presets.iter().position(|p| p.name == name)?;
        Some(self.presets.remove(pos))
    }

    /// Returns preset names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name.as_str())
    }

    /// Suggests an existing preset name close to `name`.
    pub fn suggest(&self, name: &str) -> Option<String> {
        find_similar_name(name, self.names())
    }

    /// Returns the number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Returns true if there are no presets.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    fn normalize(&mut self) {
        self.presets.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

/// Persistent storage for filter presets.
///
/// # Example
///
/// ```no_run
/// use crm_filter_rs::{BooleanQuery, FilterPreset, PresetStore};
///
/// let store = PresetStore::new()?;
/// let mut book = store.load_or_default()?;
/// book.upsert(FilterPreset::new("open deals", BooleanQuery::with_default_group("g1")));
/// store.save(&book)?;
/// # Ok::<(), crm_filter_rs::PresetStoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PresetStore {
    /// Path to the presets file.
    path: PathBuf,
}

impl PresetStore {
    /// Creates a store at the default XDG data path.
    ///
    /// # Errors
    ///
    /// Returns `PresetStoreError::NoDataDir` if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let path = Self::default_path()?;
        Ok(Self { path })
    }

    /// Creates a store with a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the default XDG data path for the presets file.
    ///
    /// # Errors
    ///
    /// Returns `PresetStoreError::NoDataDir` if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(PresetStoreError::NoDataDir)?;

        Ok(project_dirs.data_dir().join(PRESETS_FILENAME))
    }

    /// Returns the path to the presets file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads presets from disk.
    ///
    /// # Errors
    ///
    /// - Returns `PresetStoreError::ReadError` if the file cannot be read.
    /// - Returns `PresetStoreError::Json` if the file contains invalid JSON.
    pub fn load(&self) -> Result<PresetBook> {
        let contents = fs::read_to_string(&self.path).map_err(|e| PresetStoreError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        parse_book(&contents)
    }

    /// Loads presets, returning an empty book if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// - Returns `PresetStoreError::ReadError` for I/O errors other than "file not found".
    /// - Returns `PresetStoreError::Json` if the file contains invalid JSON.
    pub fn load_or_default(&self) -> Result<PresetBook> {
        match self.load() {
            Ok(book) => Ok(book),
            Err(PresetStoreError::ReadError { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                debug!(path = %self.path.display(), "no presets file, starting empty");
                Ok(PresetBook::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Saves presets to disk (tempfile + rename).
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// - Returns `PresetStoreError::CreateDirError` if the directory cannot be created.
    /// - Returns `PresetStoreError::WriteError` if the file cannot be written.
    /// - Returns `PresetStoreError::Json` if serialization fails.
    pub fn save(&self, book: &PresetBook) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| PresetStoreError::CreateDirError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(book)?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &json).map_err(|e| PresetStoreError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| PresetStoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;

        debug!(path = %self.path.display(), count = book.len(), "presets saved");
        Ok(())
    }

    /// Returns true if the presets file exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Deletes the presets file. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `PresetStoreError::DeleteError` if the file cannot be deleted.
    pub fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PresetStoreError::DeleteError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    // =========================================================================
    // Async I/O Methods
    // =========================================================================

    /// Async equivalent of [`load()`](Self::load).
    pub async fn load_async(&self) -> Result<PresetBook> {
        let contents =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| PresetStoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                })?;
        parse_book(&contents)
    }

    /// Async equivalent of [`load_or_default()`](Self::load_or_default).
    pub async fn load_or_default_async(&self) -> Result<PresetBook> {
        match self.load_async().await {
            Ok(book) => Ok(book),
            Err(PresetStoreError::ReadError { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                Ok(PresetBook::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Async equivalent of [`save()`](Self::save).
    pub async fn save_async(&self, book: &PresetBook) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PresetStoreError::CreateDirError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let json = serde_json::to_string_pretty(book)?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &json)
            .await
            .map_err(|e| PresetStoreError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| PresetStoreError::WriteError {
                path: self.path.clone(),
                source: e,
            })?;

        Ok(())
    }
}

fn parse_book(contents: &str) -> Result<PresetBook> {
    Ok(serde_json::from_str(contents)?)
}
