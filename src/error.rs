use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Snippet command may not be empty")]
    EmptyCommand,

    #[error("No value provided for required parameter: {}", .0)]
    MissingParameter(String),

    #[error("Invalid parameter name `{}`: use letters, digits and underscores only", .0)]
    InvalidParameterName(String),

    #[error("Invalid parameter value `{}`: use name=value", .0)]
    InvalidParameterValue(String),

    #[error("Invalid alias `{}`: not usable as a shell alias name", .0)]
    InvalidAlias(String),

    #[error("Alias `{}` is already used by snippet {}", .alias, .id)]
    AliasInUse { alias: String, id: String },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path.display(), .original)]
    Io {
        file_description: String,
        path: PathBuf,
        original: std::io::Error,
    },

    #[error("Error serializing snippets for `{}`: {}", .path.display(), .original)]
    Serialize {
        path: PathBuf,
        original: toml::ser::Error,
    },
}

impl Error {
    pub fn io_error(file_description: &str, path: PathBuf, original: std::io::Error) -> Self {
        Self::Io {
            file_description: file_description.to_string(),
            path,
            original,
        }
    }
}
