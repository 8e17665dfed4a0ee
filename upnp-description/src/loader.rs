//! Fetch-and-parse entry point.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::config::LoaderConfig;
use crate::error::Result;
use crate::fetch::{DescriptionSource, HttpSource};
use crate::root::{DiscoveryInfo, RootDevice};

/// Loads device descriptions and builds [`RootDevice`] trees.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use upnp_description::{DescriptionLoader, LoaderConfig};
/// use url::Url;
///
/// let loader = DescriptionLoader::new(LoaderConfig::default())?;
/// let location = Url::parse("http://192.168.1.100:1400/xml/device_description.xml")?;
/// let root = loader.load(&location, Duration::from_secs(1800))?;
/// println!("{}", root.device().friendly_name);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct DescriptionLoader {
    config: LoaderConfig,
    source: Arc<dyn DescriptionSource>,
}

impl DescriptionLoader {
    /// Create a loader fetching over HTTP with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `DescriptionError::InvalidConfig` if the configuration does
    /// not validate.
    pub fn new(config: LoaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source: Arc::new(HttpSource::new(&config)),
            config,
        })
    }

    /// Replace the document source, e.g. with an in-memory one.
    pub fn with_source(mut self, source: Arc<dyn DescriptionSource>) -> Self {
        self.source = source;
        self
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Fetch and parse the description at `location`.
    pub fn load(&self, location: &Url, max_age: Duration) -> Result<RootDevice> {
        self.load_with(location, max_age, DiscoveryInfo::default())
    }

    /// Fetch and parse the description at `location`, attaching discovery
    /// metadata to the resulting root device.
    pub fn load_with(
        &self,
        location: &Url,
        max_age: Duration,
        discovery: DiscoveryInfo,
    ) -> Result<RootDevice> {
        debug!("Fetching device description from {}", location);
        let xml = self.source.fetch(location)?;
        self.parse_with(&xml, location, max_age, discovery)
    }

    /// Parse a description already fetched from `location`.
    pub fn parse(&self, xml: &str, location: &Url, max_age: Duration) -> Result<RootDevice> {
        self.parse_with(xml, location, max_age, DiscoveryInfo::default())
    }

    pub fn parse_with(
        &self,
        xml: &str,
        location: &Url,
        max_age: Duration,
        discovery: DiscoveryInfo,
    ) -> Result<RootDevice> {
        RootDevice::build(
            xml,
            location,
            max_age,
            discovery,
            &self.config,
            Arc::clone(&self.source),
        )
    }
}

impl Default for DescriptionLoader {
    fn default() -> Self {
        let config = LoaderConfig::default();
        Self {
            source: Arc::new(HttpSource::new(&config)),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DescriptionError;

    #[derive(Debug)]
    struct Fixed(&'static str);

    impl DescriptionSource for Fixed {
        fn fetch(&self, _location: &Url) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    const MINIMAL: &str = r#"<root xmlns="urn:schemas-upnp-org:device-1-0">
  <specVersion><major>1</major><minor>0</minor></specVersion>
  <device>
    <deviceType>urn:schemas-upnp-org:device:Basic:1</deviceType>
    <friendlyName>Bridge</friendlyName>
    <modelName>B1</modelName>
    <UDN>uuid:bridge</UDN>
    <serviceList/>
  </device>
</root>"#;

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = DescriptionLoader::new(LoaderConfig::new().with_max_depth(0)).unwrap_err();
        assert!(matches!(err, DescriptionError::InvalidConfig(_)));
    }

    #[test]
    fn test_load_with_custom_source() {
        let loader = DescriptionLoader::default().with_source(Arc::new(Fixed(MINIMAL)));
        let location = Url::parse("http://10.1.1.1:80/desc.xml").unwrap();
        let discovery = DiscoveryInfo {
            vendor_firmware: Some("fw-2.1".to_string()),
            usn: Some("uuid:bridge::upnp:rootdevice".to_string()),
            udn: Some("uuid:bridge".to_string()),
        };

        let root = loader
            .load_with(&location, Duration::from_secs(60), discovery)
            .unwrap();

        assert_eq!(root.device().friendly_name, "Bridge");
        assert_eq!(root.vendor_firmware(), Some("fw-2.1"));
        assert_eq!(root.discovery_usn(), Some("uuid:bridge::upnp:rootdevice"));
        assert_eq!(root.discovery_udn(), Some("uuid:bridge"));
        assert_eq!(root.description_text().as_deref(), Some(MINIMAL));
    }
}
