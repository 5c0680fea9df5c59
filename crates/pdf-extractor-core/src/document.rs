use std::path::{Path, PathBuf};

use crate::error::ExtractError;

/// A PDF on the local file system that is known to exist.
///
/// Existence is checked once, in [`DocumentRef::open`], before any backend
/// sees the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    path: PathBuf,
}

impl DocumentRef {
    /// Reference the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::DocumentNotFound`] if nothing exists at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ExtractError::DocumentNotFound(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without its extension.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The document path with its extension replaced by `txt`.
    pub fn default_text_path(&self) -> PathBuf {
        self.path.with_extension("txt")
    }

    /// The directory containing the document, `.` for a bare file name.
    pub fn default_tables_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// `{dir}/{stem}_table_{index}.{extension}`.
    pub fn table_path(&self, dir: &Path, index: usize, extension: &str) -> PathBuf {
        dir.join(format!("{}_table_{index}.{extension}", self.stem()))
    }
}
