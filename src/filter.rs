//! File-chooser extension filter.
//!
//! A pure predicate over paths for the file-picker collaborator; the codec
//! never consults it.

use std::path::Path;

/// Accepts directories and files whose name ends in a configured
/// extension, case-insensitively.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    extension: String,
    description: String,
}

impl ExtensionFilter {
    /// Creates a filter for one extension, e.g. `".txt"`.
    pub fn new(extension: impl Into<String>, description: impl Into<String>) -> Self {
        ExtensionFilter {
            extension: extension.into().to_lowercase(),
            description: description.into(),
        }
    }

    /// Returns `true` if the path should be shown: every directory, plus
    /// any file name with a matching extension.
    pub fn accept(&self, path: &Path) -> bool {
        if path.is_dir() {
            return true;
        }
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.to_lowercase().ends_with(&self.extension))
    }

    /// Display string for the chooser, e.g. `"Text files (*.txt)"`.
    pub fn description(&self) -> String {
        format!("{} (*{})", self.description, self.extension)
    }
}
