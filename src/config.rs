use eyre::{Error, WrapErr};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "gradebook.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub address: SocketAddr,
    pub client_dir: PathBuf,
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(([127, 0, 0, 1], 4000)),
            client_dir: PathBuf::from("client"),
            cors_origin: Some("http://localhost:3000".to_owned()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://students.db?mode=rwc".to_owned(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub server_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:4000".to_owned(),
        }
    }
}

impl Config {
    pub fn load(file_name: &Path) -> Result<Config, Error> {
        let content = std::fs::read_to_string(file_name)
            .wrap_err_with(|| format!("cannot load configuration file {}", file_name.display()))?;
        Self::parse(&content)
            .wrap_err_with(|| format!("cannot parse configuration file {}", file_name.display()))
    }

    pub fn parse(content: &str) -> Result<Config, Error> {
        Ok(toml::from_str(content)?)
    }

    /// Load the explicitly requested file, or the default one when it exists.
    pub fn discover(file_name: Option<&Path>) -> Result<Config, Error> {
        match file_name {
            Some(file_name) => Self::load(file_name),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Config::default()),
        }
    }
}

#[test]
fn test_partial_config() {
    let config = Config::parse(
        r#"
        [server]
        address = "0.0.0.0:8080"

        [database]
        url = "mysql://solver@localhost/grades"
        "#,
    )
    .unwrap();
    assert_eq!(config.server.address.port(), 8080);
    assert_eq!(config.server.client_dir, PathBuf::from("client"));
    assert_eq!(config.database.url, "mysql://solver@localhost/grades");
    assert_eq!(config.database.max_connections, 5);
    assert_eq!(config.client.server_url, "http://localhost:4000");
}

#[test]
fn test_unknown_key() {
    assert!(Config::parse("[server]\nport = 4000\n").is_err());
}
