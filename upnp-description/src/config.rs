//! Configuration for loading device descriptions.

use std::time::Duration;

use crate::error::{DescriptionError, Result};

/// Upper bound accepted for [`LoaderConfig::max_depth`]
pub const MAX_DEVICE_DEPTH: usize = 128;

/// Element levels allowed on top of two per device level
/// (`deviceList/device`), covering lists, fields and vendor extensions
const ELEMENT_DEPTH_HEADROOM: usize = 32;

/// Configuration for a [`DescriptionLoader`](crate::DescriptionLoader)
///
/// Controls how descriptions are fetched and how much nesting the builder
/// accepts from a document.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Timeout for establishing the HTTP connection
    /// Default: 5 seconds
    pub connect_timeout: Duration,

    /// Timeout for reading the description body
    /// Default: 10 seconds
    pub read_timeout: Duration,

    /// Maximum nesting of `<device>` elements, the root device counting as 1
    /// Default: 16
    pub max_depth: usize,

    /// User-Agent header sent with description requests
    /// Default: "upnp-sdk/0.2 UPnP/1.0"
    pub user_agent: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(10),
            max_depth: 16,
            user_agent: "upnp-sdk/0.2 UPnP/1.0".to_string(),
        }
    }
}

impl LoaderConfig {
    /// Create a LoaderConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a LoaderConfig for slow or congested networks
    pub fn lenient_network() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            read_timeout: Duration::from_secs(30),
            ..Default::default()
        }
    }

    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Deepest element nesting accepted in a description document.
    pub fn element_depth_limit(&self) -> usize {
        self.max_depth * 2 + ELEMENT_DEPTH_HEADROOM
    }

    /// Check that the configuration can be used
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(DescriptionError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }

        if self.max_depth > MAX_DEVICE_DEPTH {
            return Err(DescriptionError::InvalidConfig(format!(
                "max_depth must be at most {}",
                MAX_DEVICE_DEPTH
            )));
        }

        if self.connect_timeout.is_zero() || self.read_timeout.is_zero() {
            return Err(DescriptionError::InvalidConfig(
                "timeouts must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}
