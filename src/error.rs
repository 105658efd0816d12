use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("metrics collector unavailable: {0}")]
    CollectorUnavailable(String),

    #[error("operating system name must not be empty")]
    EmptyOperatingSystem,

    #[error("preference store I/O failed at {path}: {source}")]
    PreferenceIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("preference store is not valid JSON: {0}")]
    PreferenceParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
