use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const FONT_KEY: &str = "font";
pub const FONTS: [&str; 3] = ["Arial", "Wingdings 3", "Comic Sans MS"];

pub fn default_store_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("syspanel").join("settings.json"))
}

/// Flat string key/value file, stored as a JSON object.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl PreferenceStore {
    /// Load `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(Error::PreferenceIo { path, source }),
        };
        Ok(PreferenceStore { path, values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Write through a sibling temp file so a crash never leaves half a file.
    pub fn save(&self) -> Result<()> {
        let io_err = |source| Error::PreferenceIo {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        tracing::debug!(path = %self.path.display(), "saved preferences");
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontPreference {
    font: String,
}

impl Default for FontPreference {
    fn default() -> Self {
        FontPreference {
            font: FONTS[0].to_string(),
        }
    }
}

impl FontPreference {
    pub fn load(store: &PreferenceStore) -> Self {
        store
            .get(FONT_KEY)
            .map(|font| FontPreference {
                font: font.to_string(),
            })
            .unwrap_or_default()
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    /// The next entry of [`FONTS`], wrapping around. A stored font that is
    /// not in the list moves to the first entry.
    pub fn next(&self) -> Self {
        let next = FONTS
            .iter()
            .position(|f| *f == self.font)
            .map_or(0, |i| (i + 1) % FONTS.len());
        FontPreference {
            font: FONTS[next].to_string(),
        }
    }

    pub fn store(&self, store: &mut PreferenceStore) -> Result<()> {
        store.set(FONT_KEY, self.font.clone());
        store.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("syspanel_test_{}_{name}", std::process::id()))
            .join("settings.json")
    }

    #[test]
    fn unset_font_defaults_to_first_entry() {
        let store = PreferenceStore::open(temp_path("unset")).unwrap();
        assert_eq!(FontPreference::load(&store).font(), "Arial");
    }

    #[test]
    fn font_survives_reload() {
        let path = temp_path("reload");
        let mut store = PreferenceStore::open(&path).unwrap();
        let font = FontPreference::default().next();
        font.store(&mut store).unwrap();

        let reloaded = PreferenceStore::open(&path).unwrap();
        assert_eq!(FontPreference::load(&reloaded).font(), "Wingdings 3");
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn next_wraps_around() {
        let last = FontPreference {
            font: "Comic Sans MS".to_string(),
        };
        assert_eq!(last.next().font(), "Arial");
        let unknown = FontPreference {
            font: "Papyrus".to_string(),
        };
        assert_eq!(unknown.next().font(), "Arial");
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json {{").unwrap();
        assert!(matches!(
            PreferenceStore::open(&path),
            Err(Error::PreferenceParse(_))
        ));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
