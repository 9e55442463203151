//! Reqwest-backed identity provider adapter.
//!
//! Talks to a Firebase-compatible Identity Toolkit REST API. Token
//! verification is delegated to the provider: a token is accepted when the
//! provider can resolve it to an account. Account management calls carry an
//! access token minted from the project's service account.

mod credentials;

use std::time::Duration;

use application::context::Context;
use application::error::{ApplicationError, Result};
use application::ports::outbound::IdentityGateway;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

pub use self::credentials::{
    AccessTokenSource, CredentialsError, ServiceAccountKey,
};

/// Errors raised while talking to the identity provider.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity provider answered {0}")]
    Rejected(StatusCode),
    #[error("identity provider knows no such account")]
    UnknownAccount,
    #[error("invalid identity provider endpoint")]
    Endpoint(#[from] url::ParseError),
    #[error("cannot sign service account assertion")]
    Assertion(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl From<IdentityError> for ApplicationError {
    fn from(err: IdentityError) -> Self {
        let unreachable = matches!(
            &err,
            IdentityError::Transport(inner)
                if inner.is_timeout() || inner.is_connect()
        );

        if unreachable {
            ApplicationError::unavailable(err)
        } else {
            ApplicationError::internal(err)
        }
    }
}

/// Credentials and location of the identity provider.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub endpoint: Url,
    pub project_id: String,
    /// Public web API key, used for token lookups.
    pub api_key: String,
    /// Service account allowed to manage project accounts.
    pub credentials: ServiceAccountKey,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenLookup<'a> {
    id_token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountLookup<'a> {
    local_id: [&'a str; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountDelete<'a> {
    local_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    local_id: String,
    #[serde(default)]
    photo_url: String,
    #[serde(default)]
    disabled: bool,
}

impl LookupResponse {
    fn into_account(self) -> std::result::Result<AccountInfo, IdentityError> {
        self.users
            .into_iter()
            .find(|account| !account.disabled)
            .ok_or(IdentityError::UnknownAccount)
    }
}

/// Identity provider adapter performing HTTP calls against one project.
#[derive(Clone)]
pub struct HttpIdentityGateway {
    client: Client,
    tokens: AccessTokenSource,
    config: IdentityConfig,
}

impl HttpIdentityGateway {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        config: IdentityConfig,
        timeout: Duration,
    ) -> std::result::Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let tokens =
            AccessTokenSource::new(client.clone(), config.credentials.clone());
        Ok(Self {
            client,
            tokens,
            config,
        })
    }

    fn url(&self, path: &str) -> std::result::Result<Url, IdentityError> {
        Ok(self.config.endpoint.join(path)?)
    }

    fn project_url(
        &self,
        action: &str,
    ) -> std::result::Result<Url, IdentityError> {
        self.url(&format!(
            "v1/projects/{}/accounts:{action}",
            self.config.project_id
        ))
    }

    async fn lookup_token(
        &self,
        token: &str,
    ) -> std::result::Result<AccountInfo, IdentityError> {
        let mut url = self.url("v1/accounts:lookup")?;
        url.query_pairs_mut().append_pair("key", &self.config.api_key);

        let response = self
            .client
            .post(url)
            .json(&TokenLookup { id_token: token })
            .send()
            .await?;

        decode::<LookupResponse>(response).await?.into_account()
    }

    async fn lookup_account(
        &self,
        user_id: &str,
    ) -> std::result::Result<AccountInfo, IdentityError> {
        let response = self
            .client
            .post(self.project_url("lookup")?)
            .bearer_auth(self.tokens.token().await?)
            .json(&AccountLookup {
                local_id: [user_id],
            })
            .send()
            .await?;

        decode::<LookupResponse>(response).await?.into_account()
    }

    async fn delete_account(
        &self,
        user_id: &str,
    ) -> std::result::Result<(), IdentityError> {
        let response = self
            .client
            .post(self.project_url("delete")?)
            .bearer_auth(self.tokens.token().await?)
            .json(&AccountDelete { local_id: user_id })
            .send()
            .await?;

        decode::<serde_json::Value>(response).await.map(|_| ())
    }
}

async fn decode<T>(
    response: reqwest::Response,
) -> std::result::Result<T, IdentityError>
where
    T: for<'de> Deserialize<'de>,
{
    let status = response.status();
    if !status.is_success() {
        return Err(IdentityError::Rejected(status));
    }
    Ok(response.json::<T>().await?)
}

/// Icon of a looked up account. Unknown accounts have none.
fn icon(lookup: std::result::Result<AccountInfo, IdentityError>) -> Result<String> {
    match lookup {
        Ok(account) => Ok(account.photo_url),
        Err(IdentityError::UnknownAccount) => Ok(String::default()),
        Err(err) => Err(err.into()),
    }
}

#[async_trait]
impl IdentityGateway for HttpIdentityGateway {
    async fn authenticate(&self, ctx: &Context, token: &str) -> Result<String> {
        ctx.run(async {
            let account = self.lookup_token(token).await?;
            Ok(account.local_id)
        })
        .await
    }

    async fn display_icon(&self, ctx: &Context, user_id: &str) -> Result<String> {
        ctx.run(async { icon(self.lookup_account(user_id).await) })
            .await
    }

    async fn delete_identity(&self, ctx: &Context, user_id: &str) -> Result<()> {
        ctx.run(async {
            self.delete_account(user_id).await?;
            Ok(())
        })
        .await
    }
}
