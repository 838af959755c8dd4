//! Source documents and discovery

use crate::error::ExtractorError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A markdown document handed to the pipeline
///
/// Read failures are captured rather than raised so that one bad file does
/// not stop a run; the pipeline logs and skips it.
#[derive(Debug)]
pub struct SourceDocument {
    /// Path relative to the provenance root, `/`-separated
    pub relative_path: String,

    /// File stem, used as the topic fallback in whole-document mode
    pub name: String,

    /// File contents, or the reason they are unavailable
    pub contents: Result<String, ExtractorError>,
}

impl SourceDocument {
    /// Create a document from text already in memory
    pub fn from_text(relative_path: impl Into<String>, text: impl Into<String>) -> Self {
        let relative_path = relative_path.into().replace('\\', "/");
        let name = stem_of(Path::new(&relative_path));
        Self {
            relative_path,
            name,
            contents: Ok(text.into()),
        }
    }

    /// Create a document whose contents could not be obtained
    pub fn from_error(relative_path: impl Into<String>, error: ExtractorError) -> Self {
        let relative_path = relative_path.into().replace('\\', "/");
        let name = stem_of(Path::new(&relative_path));
        Self {
            relative_path,
            name,
            contents: Err(error),
        }
    }

    /// Read a document from disk
    ///
    /// `relative_path` is computed against `root`; a path outside `root` keeps
    /// its full form. Missing files and invalid UTF-8 end up in `contents`.
    pub fn load(path: &Path, root: &Path) -> Self {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let relative_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ExtractorError::Io(format!("{}: {}", path.display(), e)));

        Self {
            name: stem_of(path),
            relative_path,
            contents,
        }
    }

    /// Whether the contents are available
    pub fn is_readable(&self) -> bool {
        self.contents.is_ok()
    }
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

/// List the `*.md` files in `dir`, sorted by path
///
/// Only the top level is scanned unless `recursive` is set.
pub fn discover_documents(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, ExtractorError> {
    if !dir.is_dir() {
        return Err(ExtractorError::Io(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(max_depth) {
        let entry = entry.map_err(|e| ExtractorError::Io(e.to_string()))?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            paths.push(entry.into_path());
        }
    }

    paths.sort();
    Ok(paths)
}

/// Discover and load every document under `dir`
pub fn load_documents(
    dir: &Path,
    root: &Path,
    recursive: bool,
) -> Result<Vec<SourceDocument>, ExtractorError> {
    Ok(discover_documents(dir, recursive)?
        .iter()
        .map(|path| SourceDocument::load(path, root))
        .collect())
}
