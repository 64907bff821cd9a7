use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listen: String,
    pub database_path: String,
    pub jwt_secret: Option<String>,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub allowed_origins: Vec<String>,
    pub max_upload_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
            database_path: "./filebin.sqlite3".to_string(),
            jwt_secret: None,
            jwt_issuer: "filebin".to_string(),
            jwt_audience: "filebin".to_string(),
            allowed_origins: vec![],
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

impl Config {
    fn read_or_create() -> Self {
        let config_path = Path::new("config.toml");
        if config_path.exists() {
            let mut file = std::fs::File::open(config_path).expect("failed to open config.toml");
            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .expect("failed to read config.toml");
            toml::from_str(&contents).expect("failed to parse config.toml")
        } else {
            let default_config = Config::default();
            let toml_string = toml::to_string_pretty(&default_config)
                .expect("failed to serialize default config");
            let mut file =
                std::fs::File::create(config_path).expect("failed to create config.toml");
            file.write_all(toml_string.as_bytes())
                .expect("failed to write config.toml");
            default_config
        }
    }

    /// Load the startup configuration. The signing key, issuer and audience are
    /// fixed for the lifetime of the process; nothing mutates the config after
    /// this returns.
    pub fn load() -> Self {
        let mut cfg = Self::read_or_create();
        if cfg.jwt_secret.is_none() {
            log::warn!("no jwt_secret configured, generating an ephemeral one");
            cfg.jwt_secret = Some(uuid::Uuid::new_v4().to_string());
        }
        cfg
    }

    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret
            .as_ref()
            .expect("jwt_secret must be set")
            .as_bytes()
    }
}
