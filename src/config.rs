//! Configuration manager for snipshare.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::FromRef;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::AppState;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_IDENTITY_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/";
const DEFAULT_CREDENTIALS_PATH: &str = "service_account.json";
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Instance name.
    pub name: String,
    /// Listening port, overridden by the `PORT` environment variable.
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    version: String,
    #[serde(skip)]
    path: PathBuf,
    /// Related to PostgreSQL configuration.
    #[serde(skip_serializing)]
    pub postgres: Option<Postgres>,
    /// Related to the identity provider.
    #[serde(skip_serializing, default)]
    pub identity: Identity,
    /// Related to OTLP export.
    #[serde(skip_serializing, default)]
    pub telemetry: Telemetry,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").into(),
            port: DEFAULT_PORT,
            version: VERSION.into(),
            path: PathBuf::default(),
            postgres: None,
            identity: Identity::default(),
            telemetry: Telemetry::default(),
        }
    }
}

/// PostgreSQL configuration.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Postgres {
    /// Hostname:(?port) for PostgreSQL instance.
    pub address: String,
    /// Database name.
    pub database: Option<String>,
    /// Username credential to connect.
    pub username: Option<String>,
    /// Password credential to connect.
    pub password: Option<String>,
    /// Maximum pool connections.
    pub pool_size: Option<u32>,
}

/// Identity Toolkit configuration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Base URL of the Identity Toolkit REST API.
    pub endpoint: String,
    pub project_id: String,
    /// Web API key used for token lookups.
    pub api_key: String,
    /// Service account JSON key allowed to manage accounts.
    pub credentials_file: PathBuf,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_IDENTITY_ENDPOINT.into(),
            project_id: String::default(),
            api_key: String::default(),
            credentials_file: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
        }
    }
}

/// OpenTelemetry configuration.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Telemetry {
    /// gRPC endpoint of the OTLP collector. No export when missing.
    pub otlp_endpoint: Option<String>,
}

impl FromRef<AppState> for Arc<Configuration> {
    fn from_ref(state: &AppState) -> Arc<Configuration> {
        Arc::clone(&state.config)
    }
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Normalizes a URL string by ensuring it starts with a valid scheme
    /// (`http` or `https`) and ends with a slash, so relative paths join
    /// under it.
    fn normalize_url(&self, url: &str) -> Result<String, url::ParseError> {
        let url_with_scheme =
            if url.starts_with("http://") || url.starts_with("https://") {
                url.to_string()
            } else {
                format!("https://{url}")
            };

        let mut parsed_url = Url::parse(&url_with_scheme)?;
        if !parsed_url.path().ends_with('/') {
            let path = format!("{}/", parsed_url.path());
            parsed_url.set_path(&path);
        }
        Ok(parsed_url.to_string())
    }

    /// Reads the `config.yaml` file from the specified path or the default
    /// location.
    pub fn read(self) -> Result<Arc<Self>, url::ParseError> {
        let file_path = if self.path.is_file() {
            self.path.clone()
        } else {
            Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        };

        let mut config = match File::open(&file_path) {
            Ok(file) => match serde_yaml::from_reader::<_, Configuration>(file) {
                Ok(config) => config,
                Err(err) => self.error(err),
            },
            Err(err) => self.error(err),
        };

        // set app version.
        config.version = VERSION.to_owned();

        if let Some(port) =
            std::env::var("PORT").ok().and_then(|port| port.parse().ok())
        {
            config.port = port;
        }

        // normalize URLs.
        config.identity.endpoint =
            self.normalize_url(&config.identity.endpoint)?;

        Ok(Arc::new(config))
    }

    /// Return a default configuration as fallback.
    fn error(&self, err: impl std::error::Error) -> Self {
        tracing::error!(error = %err, "cannot read `config.yaml` file");
        Self::default()
    }

    /// Version of the running binary.
    pub fn version(&self) -> &str {
        &self.version
    }
}
