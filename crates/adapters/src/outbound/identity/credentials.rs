//! OAuth 2.0 access tokens minted from a service account key.
//!
//! The key signs a short-lived RS256 assertion which the token endpoint
//! exchanges for a bearer token. Tokens are cached and minted again shortly
//! before they expire.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{IdentityError, decode};

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_EXPIRATION: u64 = 3600; // 1 hour, the longest accepted.
/// Cached tokens closer than this to their expiry are minted again.
const REFRESH_MARGIN: Duration = Duration::from_secs(300);
const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/identitytoolkit",
    "https://www.googleapis.com/auth/cloud-platform",
];

/// Errors raised while loading a service account key.
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("cannot read service account key")]
    Read(#[from] std::io::Error),
    #[error("malformed service account key")]
    Parse(#[from] serde_json::Error),
    #[error("invalid service account private key")]
    PrivateKey(#[from] jsonwebtoken::errors::Error),
}

#[derive(Deserialize)]
struct KeyFile {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.into()
}

/// Service account key, as downloaded from the cloud console.
#[derive(Clone)]
pub struct ServiceAccountKey {
    client_email: String,
    token_uri: String,
    encoding_key: EncodingKey,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Load a JSON key file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CredentialsError> {
        Self::from_json(&std::fs::read(path)?)
    }

    /// Parse a JSON key and its PEM private key.
    pub fn from_json(raw: &[u8]) -> Result<Self, CredentialsError> {
        let file: KeyFile = serde_json::from_slice(raw)?;

        Ok(Self {
            encoding_key: EncodingKey::from_rsa_pem(file.private_key.as_bytes())?,
            client_email: file.client_email,
            token_uri: file.token_uri,
        })
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    fn assertion(
        &self,
        issued_at: u64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: SCOPES.join(" "),
            aud: self.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_EXPIRATION,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: u64,
    exp: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: SystemTime,
}

impl AccessToken {
    fn is_fresh(&self, now: SystemTime) -> bool {
        now + REFRESH_MARGIN < self.expires_at
    }
}

/// Access tokens of one service account, shared by every clone.
#[derive(Clone)]
pub struct AccessTokenSource {
    client: Client,
    key: ServiceAccountKey,
    cached: Arc<Mutex<Option<AccessToken>>>,
}

impl AccessTokenSource {
    /// Create a new [`AccessTokenSource`].
    pub fn new(client: Client, key: ServiceAccountKey) -> Self {
        Self {
            client,
            key,
            cached: Arc::new(Mutex::new(None)),
        }
    }

    /// Return the cached access token, or mint one when it is missing or
    /// about to expire. Concurrent callers wait for a single exchange.
    pub async fn token(&self) -> Result<String, IdentityError> {
        let mut cached = self.cached.lock().await;
        let now = SystemTime::now();

        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let token = self.mint(now).await?;
        let value = token.value.clone();
        *cached = Some(token);

        Ok(value)
    }

    async fn mint(&self, now: SystemTime) -> Result<AccessToken, IdentityError> {
        let issued_at = now
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        let assertion = self.key.assertion(issued_at)?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await?;
        let body = decode::<TokenResponse>(response).await?;

        tracing::debug!(
            client_email = %self.key.client_email,
            expires_in = body.expires_in,
            "minted identity provider access token"
        );

        Ok(AccessToken {
            value: body.access_token,
            expires_at: now + Duration::from_secs(body.expires_in),
        })
    }
}

/// Test key whose token endpoint is never reachable.
#[cfg(test)]
pub(super) fn unreachable_key() -> ServiceAccountKey {
    ServiceAccountKey {
        token_uri: "http://127.0.0.1:9/token".into(),
        ..ServiceAccountKey::from_file(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/testdata/service_account.json"
        ))
        .unwrap()
    }
}
