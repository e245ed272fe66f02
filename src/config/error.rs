use thiserror::Error;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("config file is not valid toml: {0}")]
    TomlDeError(#[from] toml::de::Error),
    #[error("could not serialize config: {0}")]
    TomlSeError(#[from] toml::ser::Error),
    #[error("no config file found")]
    ConfigNotFound,
}
