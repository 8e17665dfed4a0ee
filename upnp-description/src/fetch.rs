//! Retrieval of description documents.

use std::fmt;

use url::Url;

use crate::config::LoaderConfig;
use crate::error::{DescriptionError, Result};

/// Something that can produce the text of a description document.
pub trait DescriptionSource: Send + Sync + fmt::Debug {
    /// Fetch the document found at `location`.
    fn fetch(&self, location: &Url) -> Result<String>;
}

/// Fetches descriptions over HTTP, or from disk for `file://` locations.
#[derive(Debug, Clone)]
pub struct HttpSource {
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(config.connect_timeout)
                .timeout_read(config.read_timeout)
                .user_agent(&config.user_agent)
                .build(),
        }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new(&LoaderConfig::default())
    }
}

impl DescriptionSource for HttpSource {
    fn fetch(&self, location: &Url) -> Result<String> {
        match location.scheme() {
            "http" | "https" => {
                let response = self
                    .agent
                    .get(location.as_str())
                    .call()
                    .map_err(|e| DescriptionError::Network(format!("Failed to fetch device description: {}", e)))?;

                response
                    .into_string()
                    .map_err(|e| DescriptionError::Network(format!("Failed to read response body: {}", e)))
            }
            "file" => {
                let path = location.to_file_path().map_err(|_| {
                    DescriptionError::Network(format!("Invalid file location: {}", location))
                })?;
                Ok(std::fs::read_to_string(path)?)
            }
            scheme => Err(DescriptionError::Network(format!(
                "Unsupported location scheme: {}",
                scheme
            ))),
        }
    }
}
