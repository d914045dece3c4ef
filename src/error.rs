use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unable to parse dictionary json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dictionary {0:?} contains no usable names")]
    EmptyDictionary(String),

    #[error("Builtin dictionary {0} is missing from the binary")]
    MissingBuiltin(String),

    #[error("Builtin dictionary {0} is not valid utf-8")]
    InvalidBuiltin(String),

    #[error("Unable to read dictionary {path}: {source}")]
    DictionaryFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stdin must be a tty")]
    NotATty,
}

pub type Result<T> = std::result::Result<T, DexError>;
