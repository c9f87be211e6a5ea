use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read themes file '{path}': {source}")]
    ThemesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse themes file: {0}")]
    ThemesFileParse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
