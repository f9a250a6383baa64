use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

use crate::error::CourierError;

/// Keys read from the process environment (case-insensitive).
const ENV_KEYS: &[&str] = &[
    "db_host",
    "db_port",
    "db_user",
    "db_password",
    "db_name",
    "database_url",
    "cohere_api_key",
    "cohere_model",
    "cohere_base_url",
    "listen_addr",
    "loglevel",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    /// Full connection URL; takes precedence over the `db_*` fields.
    pub database_url: Option<String>,
    pub cohere_api_key: String,
    pub cohere_model: String,
    pub cohere_base_url: Url,
    pub temperature: f32,
    pub listen_addr: String,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_host: "localhost".to_string(),
            db_port: 3306,
            db_user: "root".to_string(),
            db_password: String::new(),
            db_name: String::new(),
            database_url: None,
            cohere_api_key: String::new(),
            cohere_model: "command-r-plus".to_string(),
            cohere_base_url: Url::parse("https://api.cohere.com")
                .expect("static Cohere base url is valid"),
            temperature: 0.0,
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults overlaid with the environment.
    pub fn from_env() -> Result<Self, CourierError> {
        let cfg = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(ENV_KEYS))
            .extract()?;
        Ok(cfg)
    }

    /// Connection URL for the target database.
    ///
    /// `DATABASE_URL` wins when set; otherwise a `mysql://` URL is assembled
    /// from the `DB_*` values with credentials percent-encoded.
    pub fn database_url(&self) -> Result<String, CourierError> {
        if let Some(url) = self.database_url.as_ref().filter(|u| !u.trim().is_empty()) {
            return Ok(url.clone());
        }

        let mut url = Url::parse(&format!("mysql://{}", self.db_host))?;
        let bad_part = |part: &str| CourierError::InvalidDatabaseUrl(format!("cannot set {part}"));
        url.set_username(&self.db_user)
            .map_err(|_| bad_part("user"))?;
        if !self.db_password.is_empty() {
            url.set_password(Some(&self.db_password))
                .map_err(|_| bad_part("password"))?;
        }
        url.set_port(Some(self.db_port))
            .map_err(|_| bad_part("port"))?;
        url.set_path(&self.db_name);
        Ok(url.into())
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().unwrap_or_else(|e| panic!("FATAL: invalid configuration: {e}"))
});
