//! Client for the generation service.
//!
//! `Backend` is the seam between the wizard and the network: the TUI and CLI only
//! ever hold a `dyn Backend`, tests substitute canned responses.

use crate::catalog::{ClientTechnology, FeatureDescriptor, ShellTechnology};
use crate::config::Config;
use crate::errors::BackendError;
use crate::request::GenerationRequest;
use log::{debug, info};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

pub type BackendResult<T> = std::result::Result<T, BackendError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksum {
    pub algorithm: String,
    pub value: String,
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.value)
    }
}

/// A generated file the user can download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub url: String,
    pub checksum: Checksum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub shell: Artifact,
    pub client: Artifact,
}

pub trait Backend: Send + Sync {
    /// `GET web-shell`
    fn shell_technologies(&self) -> BackendResult<Vec<ShellTechnology>>;

    /// `GET client`
    fn client_technologies(&self) -> BackendResult<Vec<ClientTechnology>>;

    /// `GET web-shell/<technology>`
    fn features(&self, technology: &str) -> BackendResult<Vec<FeatureDescriptor>>;

    /// `POST generator`
    fn generate(&self, request: &GenerationRequest) -> BackendResult<GenerationResult>;
}

/// reqwest (blocking) implementation of [`Backend`].
pub struct HttpBackend {
    base: Url,
    client: Client,
}

impl HttpBackend {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Self::with_base(config.api_base.clone(), config.timeout_secs)
    }

    pub fn with_base(base: Url, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("shellgen/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { base, client })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> BackendResult<Url> {
        Ok(self.base.join(path)?)
    }

    fn features_endpoint(&self, technology: &str) -> BackendResult<Url> {
        let mut url = self.endpoint("web-shell/")?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(technology);
        }
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> BackendResult<T> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|source| BackendError::Request {
                url: url.to_string(),
                source,
            })?;
        decode(&url, response)
    }
}

fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> BackendResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.json::<T>().map_err(|source| BackendError::Decode {
        url: url.to_string(),
        source,
    })
}

impl Backend for HttpBackend {
    fn shell_technologies(&self) -> BackendResult<Vec<ShellTechnology>> {
        self.get_json(self.endpoint("web-shell")?)
    }

    fn client_technologies(&self) -> BackendResult<Vec<ClientTechnology>> {
        self.get_json(self.endpoint("client")?)
    }

    fn features(&self, technology: &str) -> BackendResult<Vec<FeatureDescriptor>> {
        self.get_json(self.features_endpoint(technology)?)
    }

    fn generate(&self, request: &GenerationRequest) -> BackendResult<GenerationResult> {
        let url = self.endpoint("generator")?;
        info!(
            "Submitting generation request (shell={}, client={}, features={})",
            request.shell(),
            request.client(),
            request.features().len()
        );
        let response = self
            .client
            .post(url.clone())
            .json(request)
            .send()
            .map_err(|source| BackendError::Request {
                url: url.to_string(),
                source,
            })?;
        decode(&url, response)
    }
}
