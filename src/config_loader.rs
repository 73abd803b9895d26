use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by the CORS layer; an empty list permits any origin,
    /// the development posture of the intake frontend.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AtlasConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        AtlasConfig {
            engine: EngineConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Layered configuration: serialized defaults, then `atlas.toml`, then
/// `ATLAS_`-prefixed environment variables.
pub fn load_config() -> Result<AtlasConfig, figment::Error> {
    let figment = Figment::from(Serialized::defaults(AtlasConfig::default()))
        .merge(Toml::file("atlas.toml"))
        .merge(Env::prefixed("ATLAS_"));

    let config: AtlasConfig = figment.extract()?;

    if config.engine.max_free_text_len == 0 {
        return Err(figment::Error::from(
            "engine.max_free_text_len must be positive".to_string(),
        ));
    }

    Ok(config)
}
