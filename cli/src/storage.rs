use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

const APP_DIR: &str = "winmine";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Format {
    Json,
    Toml,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Location {
    /// User preferences, under the platform config directory.
    Config,
    /// Game records, under the platform local data directory.
    Data,
}

/// A value persisted as one file in the user's directories.
pub(crate) trait StorageKey: Sized {
    const KEY: &'static str;
    const FORMAT: Format;
    const LOCATION: Location;

    /// Recovers what is still usable from a file that failed to decode as a whole.
    fn salvage(_text: &str) -> Option<Self> {
        None
    }
}

#[derive(Error, Debug)]
pub(crate) enum StorageError {
    #[error("could not access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not encode JSON")]
    Json(#[from] serde_json::Error),
    #[error("could not encode TOML")]
    Toml(#[from] toml::ser::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Storage {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl Storage {
    /// Platform directories for the current user, `None` when the platform has none.
    pub(crate) fn locate() -> Option<Self> {
        Some(Self {
            config_dir: dirs::config_dir()?.join(APP_DIR),
            data_dir: dirs::data_local_dir()?.join(APP_DIR),
        })
    }

    /// Keeps every file directly under `dir`.
    pub(crate) fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            config_dir: dir.clone(),
            data_dir: dir,
        }
    }

    pub(crate) fn path_of<T: StorageKey>(&self) -> PathBuf {
        let dir = match T::LOCATION {
            Location::Config => &self.config_dir,
            Location::Data => &self.data_dir,
        };
        dir.join(T::KEY)
    }

    /// Stored value, or the default when the file is missing or unreadable.
    pub(crate) fn load_or_default<T>(&self) -> T
    where
        T: StorageKey + DeserializeOwned + Default,
    {
        let path = self.path_of::<T>();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("{} not found, using defaults", path.display());
                return T::default();
            }
            Err(err) => {
                log::warn!("could not read {}: {}", path.display(), err);
                return T::default();
            }
        };
        let decoded = match T::FORMAT {
            Format::Json => serde_json::from_str(&text).map_err(|err| err.to_string()),
            Format::Toml => toml::from_str(&text).map_err(|err| err.to_string()),
        };
        decoded.unwrap_or_else(|err| {
            log::warn!("corrupted {}: {}", path.display(), err);
            T::salvage(&text).unwrap_or_default()
        })
    }

    pub(crate) fn save<T>(&self, value: &T) -> Result<(), StorageError>
    where
        T: StorageKey + Serialize,
    {
        let text = match T::FORMAT {
            Format::Json => serde_json::to_string_pretty(value)?,
            Format::Toml => toml::to_string(value)?,
        };
        let path = self.path_of::<T>();
        write_file(&path, &text).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        log::debug!("saved {}", path.display());
        Ok(())
    }
}

fn write_file(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)
}
