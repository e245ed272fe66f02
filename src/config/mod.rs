//! Process-wide configuration, loaded once from a toml file.

use serde::Deserialize;
use tokio::sync::OnceCell;

mod config_dir;
pub use config_dir::{find_config_file, read_config};

mod error;
pub use error::{ConfigError, ConfigResult};

static CONFIG: OnceCell<Config> = OnceCell::const_new();

#[derive(Debug, Deserialize)]
pub struct Config {
    host: Host,
    app: App,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    bindto: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    jwt: String,
    database_uri: String,
    /// Serve the swagger UI when true. Off unless the config opts in.
    #[serde(default)]
    docs: bool,
}

impl Config {
    /// Loads the config on first call; later calls return the cached value.
    /// A missing or unparsable config is fatal, the process cannot run
    /// without a database uri and a jwt secret.
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                match Self::load(use_local) {
                    Ok(c) => c,
                    Err(e) => {
                        crate::error::log_error(&e);
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    fn load(use_local: bool) -> ConfigResult<Self> {
        let bytes = read_config(use_local)?;
        Ok(toml::from_slice(&bytes)?)
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    #[inline]
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }

    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn local_config_is_read() {
        let config = Config::get_or_init(true).await;
        assert_eq!(config.host().bindto(), "127.0.0.1:5000");
        assert!(!config.app().jwt().is_empty());
    }
}
