//! Document model for templates and level files
//!
//! Every template and level is handled in memory as a [`Document`], an
//! insertion-ordered table of named values. Where documents come from is
//! hidden behind [`DocumentStore`] so the world and factory can be exercised
//! without touching the filesystem.
//!
//! On disk a document is TOML or RON, chosen by file extension.

pub mod fields;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::world::{Result, WorldError};

/// An ordered table of named values (keys keep document order)
pub type Document = toml::Table;

/// A single value inside a [`Document`]
pub use toml::Value;

/// Source and sink for template and level documents
pub trait DocumentStore {
    /// Read and decode the document stored at `path`
    fn read(&self, path: &Path) -> Result<Document>;

    /// Encode and store `document` at `path`, replacing what was there
    fn write(&mut self, path: &Path, document: &Document) -> Result<()>;
}

/// On-disk encodings understood by [`FileStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// TOML (`.toml`)
    Toml,
    /// Rusty Object Notation (`.ron`)
    Ron,
}

impl DocumentFormat {
    /// Pick the format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(WorldError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Decode `text` read from `path`
    pub fn decode(self, text: &str, path: &Path) -> Result<Document> {
        let parsed = match self {
            Self::Toml => toml::from_str::<Document>(text).map_err(|e| e.to_string()),
            Self::Ron => ron::from_str::<Document>(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| WorldError::Parse { path: path.to_path_buf(), message })
    }

    /// Encode `document` for writing to `path`
    pub fn encode(self, document: &Document, path: &Path) -> Result<String> {
        let encoded = match self {
            Self::Toml => toml::to_string_pretty(document).map_err(|e| e.to_string()),
            Self::Ron => ron::ser::to_string_pretty(document, ron::ser::PrettyConfig::default())
                .map_err(|e| e.to_string()),
        };
        encoded.map_err(|message| WorldError::Serialize { path: path.to_path_buf(), message })
    }
}

/// Filesystem-backed document store
///
/// Relative paths resolve against `root`; absolute paths are used as-is.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory for relative paths
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a document path against the root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl DocumentStore for FileStore {
    fn read(&self, path: &Path) -> Result<Document> {
        let format = DocumentFormat::from_path(path)?;
        let full_path = self.resolve(path);
        let text = fs::read_to_string(&full_path)
            .map_err(|source| WorldError::Io { path: full_path.clone(), source })?;
        format.decode(&text, &full_path)
    }

    fn write(&mut self, path: &Path, document: &Document) -> Result<()> {
        let format = DocumentFormat::from_path(path)?;
        let full_path = self.resolve(path);
        // Encode before touching the file so a failed encode leaves it intact
        let text = format.encode(document, &full_path)?;

        if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|source| WorldError::Io { path: parent.to_path_buf(), source })?;
        }
        fs::write(&full_path, text)
            .map_err(|source| WorldError::Io { path: full_path.clone(), source })?;

        log::debug!("Wrote document {}", full_path.display());
        Ok(())
    }
}

/// In-memory document store for tests and tools
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: HashMap<PathBuf, Document>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document under `path`
    pub fn insert(&mut self, path: impl Into<PathBuf>, document: Document) {
        self.documents.insert(path.into(), document);
    }

    /// Parse TOML text and store it under `path`
    pub fn insert_toml(&mut self, path: impl Into<PathBuf>, text: &str) -> Result<()> {
        let path = path.into();
        let document = DocumentFormat::Toml.decode(text, &path)?;
        self.documents.insert(path, document);
        Ok(())
    }

    /// Builder form of [`insert_toml`](Self::insert_toml)
    pub fn with_toml(mut self, path: impl Into<PathBuf>, text: &str) -> Result<Self> {
        self.insert_toml(path, text)?;
        Ok(self)
    }

    /// Look up a stored document
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Document> {
        self.documents.get(path.as_ref())
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn read(&self, path: &Path) -> Result<Document> {
        self.documents.get(path).cloned().ok_or_else(|| WorldError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such document"),
        })
    }

    fn write(&mut self, path: &Path, document: &Document) -> Result<()> {
        self.documents.insert(path.to_path_buf(), document.clone());
        Ok(())
    }
}
