//! Fetching remote scripts over HTTP

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while downloading a script
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("downloading '{url}' failed with HTTP {status}")]
    Status { url: String, status: u16 },

    /// DNS, connection, TLS or timeout failure
    #[error("downloading '{url}' failed: {message}")]
    Transport { url: String, message: String },

    /// The body could not be read as text
    #[error("reading response from '{url}' failed: {source}")]
    Body {
        url: String,
        #[source]
        source: io::Error,
    },
}

/// Source of remote script content
pub trait Fetcher {
    /// Download `url` and return its body as text
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(crate::script::store::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("qute-script-manager/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Blocking HTTP fetcher backed by `ureq`
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(settings.timeout)
            .user_agent(&settings.user_agent)
            .build();
        Self { agent }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        log::debug!("GET {}", url);

        let response = self.agent.get(url).call().map_err(|err| match err {
            ureq::Error::Status(status, _) => FetchError::Status {
                url: url.to_string(),
                status,
            },
            ureq::Error::Transport(transport) => FetchError::Transport {
                url: url.to_string(),
                message: transport.to_string(),
            },
        })?;

        log::debug!("{} -> {}", url, response.status());

        response.into_string().map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}
