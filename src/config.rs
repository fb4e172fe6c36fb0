use serde::Deserialize;
use crate::models::TestCaseSpec;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub harness: HarnessConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5001,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HarnessConfig {
    pub selected: String,
    pub step_delay_ms: u64,
    pub request_timeout_ms: u64,
    pub delete_target_id: u32,
    pub delete_target_marker: String,
    pub backends: Vec<BackendConfig>,
    // Replaces the built-in suite when present
    pub cases: Option<Vec<TestCaseSpec>>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            selected: "typescript".into(),
            step_delay_ms: 100,
            request_timeout_ms: 5000,
            delete_target_id: 12,
            delete_target_marker: "User 9".into(),
            backends: vec![
                BackendConfig::new("typescript", "localhost", Some(5001)),
                BackendConfig::new("python", "localhost", Some(5002)),
                BackendConfig::new("endpoint3", "localhost", None),
                BackendConfig::new("endpoint4", "localhost", None),
            ],
            cases: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BackendConfig {
    pub name: String,
    #[serde(default = "default_backend_host")]
    pub host: String,
    pub port: Option<u16>,  // unset means the slot is not configured
}

impl BackendConfig {
    pub fn new(name: &str, host: &str, port: Option<u16>) -> Self {
        Self {
            name: name.to_string(),
            host: host.to_string(),
            port,
        }
    }

    pub fn base_url(&self) -> Option<String> {
        self.port.map(|port| format!("http://{}:{}", self.host, port))
    }
}

fn default_backend_host() -> String {
    "localhost".into()
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config/default", false)
    }

    pub fn load_from(path: &str, required: bool) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(required))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}
