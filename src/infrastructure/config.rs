use crate::domain::equipment::AliasTable;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
    pub log: LogSettings,
    #[serde(default)]
    pub upstream: Option<UpstreamSettings>,
    #[serde(default)]
    pub aliases: AliasTable,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub persist: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub required: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub filter: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Defaults, then `config/app.*` if present, then `APP_*` environment variables
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = base_builder()?
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

fn base_builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("storage.data_dir", "data")?
        .set_default("storage.persist", true)?
        .set_default("auth.required", true)?
        .set_default("log.filter", "info,tower_http=debug")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> AppConfig {
        base_builder()
            .unwrap()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_toml("");
        assert_eq!(config.server.port, 8000);
        assert!(config.storage.persist);
        assert!(config.auth.required);
        assert!(config.upstream.is_none());
        assert_eq!(config.aliases, AliasTable::default());
        assert_eq!(config.server.socket_addr().unwrap().port(), 8000);
    }

    #[test]
    fn test_overrides() {
        let config = from_toml(
            r#"
            [server]
            port = 9090

            [auth]
            required = false

            [upstream]
            base_url = "http://localhost:8001/api/"

            [aliases]
            name = ["Tag", "Equipment Name"]
            "#,
        );

        assert_eq!(config.server.port, 9090);
        assert!(!config.auth.required);
        assert_eq!(config.upstream.unwrap().base_url, "http://localhost:8001/api/");
        assert_eq!(config.aliases.name, vec!["Tag", "Equipment Name"]);
        assert_eq!(config.aliases.pressure, AliasTable::default().pressure);
    }
}
