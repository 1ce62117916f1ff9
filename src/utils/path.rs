//! Path helpers used to derive extensions and quote paths inside commands

use std::path::Path;

/// Path utilities for media handles and command strings
pub struct PathUtils;

impl PathUtils {
    /// Get the lowercase file extension, if the path has a usable one
    pub fn get_extension(path: &str) -> Option<String> {
        if path.trim().is_empty() {
            return None;
        }

        Path::new(path)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    /// Wrap a path in double quotes for a command string.
    ///
    /// Characters that stay special inside POSIX double quotes are escaped so
    /// that `shell_words::split` gives back the original path.
    pub fn quote(path: &str) -> String {
        let mut quoted = String::with_capacity(path.len() + 2);
        quoted.push('"');
        for ch in path.chars() {
            if matches!(ch, '"' | '\\' | '$' | '`') {
                quoted.push('\\');
            }
            quoted.push(ch);
        }
        quoted.push('"');
        quoted
    }
}
