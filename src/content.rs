//! Where catalog and level text come from.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::AssetError;

/// Supplies the tile catalog and numbered level files.
pub trait ContentSource {
    fn catalog_text(&mut self) -> Result<String, AssetError>;

    /// Text of level `number` (1-based). Numbers past the last level wrap back to 1.
    fn level_text(&mut self, number: u32) -> Result<String, AssetError>;
}

/// Maps a 1-based level number onto `count` available levels.
pub fn wrap_level(number: u32, count: u32) -> u32 {
    if count == 0 {
        return number;
    }
    (number.max(1) - 1) % count + 1
}

/// Reads `crossref.txt` and `levels/<n>.txt` from a content directory.
#[derive(Debug, Clone)]
pub struct DirectoryContent {
    root: PathBuf,
    level_count: u32,
}

impl DirectoryContent {
    /// Opens a content directory and counts its consecutive level files.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let level_count = (1..)
            .take_while(|n| root.join("levels").join(format!("{n}.txt")).is_file())
            .count() as u32;
        debug!(root = %root.display(), level_count, "Content directory opened");
        Self { root, level_count }
    }

    pub fn level_count(&self) -> u32 {
        self.level_count
    }
}

impl ContentSource for DirectoryContent {
    fn catalog_text(&mut self) -> Result<String, AssetError> {
        let path = self.root.join("crossref.txt");
        fs::read_to_string(&path).map_err(|error| AssetError::LoadFailed {
            path: path.display().to_string(),
            reason: error.to_string(),
        })
    }

    fn level_text(&mut self, number: u32) -> Result<String, AssetError> {
        let wrapped = wrap_level(number, self.level_count);
        let path = self.root.join("levels").join(format!("{wrapped}.txt"));
        trace!(number, wrapped, path = %path.display(), "Reading level");
        fs::read_to_string(&path).map_err(|error| AssetError::LoadFailed {
            path: path.display().to_string(),
            reason: error.to_string(),
        })
    }
}

/// Catalog and levels held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticContent {
    catalog: String,
    levels: BTreeMap<u32, String>,
}

impl StaticContent {
    pub fn new(catalog: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            levels: BTreeMap::new(),
        }
    }

    /// Adds the next level, numbered after the ones already present.
    pub fn with_level(mut self, text: impl Into<String>) -> Self {
        let number = self.levels.len() as u32 + 1;
        self.levels.insert(number, text.into());
        self
    }
}

impl ContentSource for StaticContent {
    fn catalog_text(&mut self) -> Result<String, AssetError> {
        Ok(self.catalog.clone())
    }

    fn level_text(&mut self, number: u32) -> Result<String, AssetError> {
        let wrapped = wrap_level(number, self.levels.len() as u32);
        self.levels
            .get(&wrapped)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(format!("level {number}")))
    }
}

/// Non-send resource wrapper for the content source.
pub struct ContentResource(pub Box<dyn ContentSource>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_wrap_around() {
        assert_eq!(wrap_level(1, 3), 1);
        assert_eq!(wrap_level(3, 3), 3);
        assert_eq!(wrap_level(4, 3), 1);
        assert_eq!(wrap_level(8, 3), 2);
    }

    #[test]
    fn static_content_wraps_and_reports_missing() {
        let mut content = StaticContent::new("").with_level("one").with_level("two");
        assert_eq!(content.level_text(3).unwrap(), "one");
        assert!(StaticContent::new("").level_text(1).is_err());
    }
}
