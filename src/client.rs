//! DynamoDB client construction.
//!
//! Configuration is explicit: a [`ClientConfig`] is built by the caller (or
//! read once from the environment) and turned into an
//! [`aws_sdk_dynamodb::Client`], which is then injected into
//! [`DataAccess`](crate::DataAccess). Nothing here touches process-wide
//! state.
//!
//! Credential sources, in order of priority:
//! 1. Static credentials (access key, secret key, optional session token)
//! 2. A named AWS profile from `~/.aws/credentials`
//! 3. The default chain (environment variables, instance profile, ...)

use std::fmt;

use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::Client;

use crate::errors::{Error, Result};
use crate::helper::DataAccess;

const DEFAULT_REGION: &str = "us-east-1";

/// Settings used to build a DynamoDB client. Every field is optional.
///
/// # Examples
///
/// ```
/// use dynamo_helper::ClientConfig;
///
/// // Local endpoint (DynamoDB Local, LocalStack)
/// let config = ClientConfig::new()
///     .region("us-east-1")
///     .credentials("local", "local")
///     .endpoint_url("http://localhost:8000");
/// assert_eq!(config.region.as_deref(), Some("us-east-1"));
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub session_token: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `AWS_REGION` (or `AWS_DEFAULT_REGION`), `AWS_PROFILE` and
    /// `AWS_ENDPOINT_URL`. Credentials are left to the default chain.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            region: non_empty("AWS_REGION").or_else(|| non_empty("AWS_DEFAULT_REGION")),
            profile: non_empty("AWS_PROFILE"),
            endpoint_url: non_empty("AWS_ENDPOINT_URL"),
            ..Self::default()
        }
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    fn validate(&self) -> Result<()> {
        match (&self.access_key, &self.secret_key) {
            (Some(_), None) => Err(Error::Config(
                "access_key is set but secret_key is missing".to_string(),
            )),
            (None, Some(_)) => Err(Error::Config(
                "secret_key is set but access_key is missing".to_string(),
            )),
            (None, None) if self.session_token.is_some() => Err(Error::Config(
                "session_token requires access_key and secret_key".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("ClientConfig")
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &redacted(&self.secret_key))
            .field("session_token", &redacted(&self.session_token))
            .field("profile", &self.profile)
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

/// Build the AWS SDK DynamoDB client with the given configuration.
pub async fn build_client(config: &ClientConfig) -> Result<Client> {
    config.validate()?;

    let region_provider = RegionProviderChain::first_try(config.region.clone().map(Region::new))
        .or_default_provider()
        .or_else(DEFAULT_REGION);

    let mut config_loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

    // Credentials priority: static > profile > env/default chain
    if let (Some(ak), Some(sk)) = (&config.access_key, &config.secret_key) {
        let creds = Credentials::new(
            ak,
            sk,
            config.session_token.clone(),
            None,
            "dynamo-helper-static",
        );
        config_loader = config_loader.credentials_provider(creds);
    } else if let Some(profile_name) = &config.profile {
        let profile_provider = ProfileFileCredentialsProvider::builder()
            .profile_name(profile_name)
            .build();
        config_loader = config_loader.credentials_provider(profile_provider);
    }

    let sdk_config = config_loader.load().await;

    let mut dynamo_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
    if let Some(url) = &config.endpoint_url {
        dynamo_config = dynamo_config.endpoint_url(url);
    }

    tracing::debug!(
        region = ?config.region,
        endpoint = ?config.endpoint_url,
        "built DynamoDB client"
    );

    Ok(Client::from_conf(dynamo_config.build()))
}

/// Build a client and wrap it in a [`DataAccess`] helper.
pub async fn connect(config: &ClientConfig) -> Result<DataAccess<Client>> {
    build_client(config).await.map(DataAccess::new)
}
