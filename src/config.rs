//! Store configuration and backing-file resolution.

use crate::error::{Error, Result};
use crate::flush::FlushPolicy;
use std::path::{Path, PathBuf};

/// Base file name used when none is configured.
pub const DEFAULT_NAME: &str = "database";

/// Everything needed to locate and open a store.
///
/// The backing file ends up at `<directory>/<name><extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding the file. `None` means the current working
    /// directory; relative paths are resolved against it too.
    pub directory: Option<PathBuf>,
    /// Base file name, without extension.
    pub name: String,
    /// Extension override. `None` uses the codec's own extension.
    pub extension: Option<String>,
    /// When mutations are written.
    pub policy: FlushPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: None,
            name: DEFAULT_NAME.to_string(),
            extension: None,
            policy: FlushPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Default config rooted at `directory`.
    pub fn in_dir(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
            ..Self::default()
        }
    }

    /// Resolve the absolute backing-file path and the normalized extension.
    ///
    /// `codec_extension` is used when no override is configured. The
    /// extension is appended only if the name does not already end with it,
    /// so `name = "settings.json"` stays `settings.json`.
    pub fn resolve(&self, codec_extension: &str) -> Result<(PathBuf, String)> {
        check_name(&self.name)?;
        let extension =
            normalize_extension(self.extension.as_deref().unwrap_or(codec_extension))?;

        let cwd = std::env::current_dir().map_err(|e| Error::Io(e.to_string()))?;
        let directory = match &self.directory {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => cwd,
        };

        let mut path = directory.join(&self.name).into_os_string();
        if !path.to_string_lossy().ends_with(&extension) {
            path.push(&extension);
        }
        Ok((PathBuf::from(path), extension))
    }
}

/// A name must be a single, non-empty file name: no separators, no
/// absolute paths, no `.`/`..`.
fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Config("store name is empty".to_string()));
    }
    let has_separator = name.contains(['/', '\\']);
    if name == "." || name == ".." || has_separator || Path::new(name).is_absolute() {
        return Err(Error::Config(format!(
            "store name '{name}' must be a plain file name"
        )));
    }
    Ok(())
}

/// Give `extension` a leading `.` if it lacks one.
pub fn normalize_extension(extension: &str) -> Result<String> {
    let trimmed = extension.trim();
    if trimmed.is_empty() || trimmed == "." {
        return Err(Error::Config(format!("invalid extension '{extension}'")));
    }
    if trimmed.starts_with('.') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!(".{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_gets_leading_dot() {
        assert_eq!(normalize_extension("json").unwrap(), ".json");
        assert_eq!(normalize_extension(".json").unwrap(), ".json");
        assert!(matches!(normalize_extension(""), Err(Error::Config(_))));
        assert!(matches!(normalize_extension("."), Err(Error::Config(_))));
    }

    #[test]
    fn resolve_composes_dir_name_extension() {
        let cfg = StoreConfig {
            name: "settings".into(),
            ..StoreConfig::in_dir("/var/app")
        };
        let (path, ext) = cfg.resolve("json").unwrap();
        assert_eq!(path, PathBuf::from("/var/app/settings.json"));
        assert_eq!(ext, ".json");
    }

    #[test]
    fn resolve_does_not_double_extension() {
        let cfg = StoreConfig {
            name: "settings.json".into(),
            ..StoreConfig::in_dir("/var/app")
        };
        let (path, _) = cfg.resolve(".json").unwrap();
        assert_eq!(path, PathBuf::from("/var/app/settings.json"));
    }

    #[test]
    fn resolve_prefers_override() {
        let cfg = StoreConfig {
            extension: Some("cfg".into()),
            ..StoreConfig::in_dir("/tmp")
        };
        let (path, ext) = cfg.resolve(".json").unwrap();
        assert_eq!(ext, ".cfg");
        assert_eq!(path, PathBuf::from("/tmp/database.cfg"));
    }

    #[test]
    fn resolve_relative_directory_against_cwd() {
        let cfg = StoreConfig::in_dir("data");
        let (path, _) = cfg.resolve(".json").unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("data/database.json"));
    }

    #[test]
    fn resolve_rejects_empty_name() {
        let cfg = StoreConfig {
            name: String::new(),
            ..StoreConfig::default()
        };
        assert!(matches!(cfg.resolve(".json"), Err(Error::Config(_))));
    }

    #[test]
    fn resolve_rejects_names_with_separators() {
        for bad in ["/etc/x", "a/b", "..", ".", "dir\\file"] {
            let cfg = StoreConfig {
                name: bad.into(),
                ..StoreConfig::in_dir("/tmp/x")
            };
            assert!(
                matches!(cfg.resolve(".json"), Err(Error::Config(_))),
                "{bad} was accepted"
            );
        }
    }
}
