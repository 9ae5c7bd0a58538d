//! Persisted user preferences.
//!
//! Values are opaque: the session passes them through and never validates
//! them beyond requiring a string.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use dexcat_model::Locale;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Active display locale. Drives localized names and name matching.
    pub locale: Locale,
    pub theme: String,
}

impl Preferences {
    /// Read preferences from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e),
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))
    }

    /// Write preferences to `path`, replacing any previous file.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, self)
                .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;
        tracing::debug!(path = %path.display(), "preferences saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let prefs = Preferences::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.locale.as_str(), "en");
    }

    #[test]
    fn values_survive_a_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        let prefs = Preferences {
            locale: Locale::new("x-klingon"),
            theme: "solarized".to_string(),
        };
        prefs.save(&path).unwrap();
        assert_eq!(Preferences::load(&path).unwrap(), prefs);
    }

    #[test]
    fn garbage_is_invalid_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, b"not json").unwrap();
        let err = Preferences::load(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
