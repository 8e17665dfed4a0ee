//! Test helpers for fixture-based integration tests

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use upnp_description::RootDevice;
use url::Url;

/// A description document from `tests/fixtures`, served from a device address
#[derive(Debug, Clone)]
pub struct DescriptionFixture {
    pub name: String,
    pub ip: String,
    pub xml_content: String,
}

impl DescriptionFixture {
    /// Load a fixture from the fixtures directory
    pub fn load(filename: &str, ip: &str) -> Self {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("tests/fixtures");
        path.push(filename);

        let xml_content = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e));

        Self {
            name: filename.to_string(),
            ip: ip.to_string(),
            xml_content,
        }
    }

    /// Location the device would advertise for this description
    pub fn location_url(&self) -> Url {
        Url::parse(&format!(
            "http://{}:1400/xml/device_description.xml",
            self.ip
        ))
        .expect("fixture location")
    }

    /// Parse the fixture with the default loader configuration
    pub fn parse(&self, max_age: Duration) -> upnp_description::Result<RootDevice> {
        RootDevice::from_xml(&self.xml_content, &self.location_url(), max_age)
    }

    /// Same document with its declared `specVersion` replaced
    pub fn with_spec_version(&self, major: i64, minor: i64) -> Self {
        let xml_content = self.xml_content.replacen(
            "<major>1</major>\n    <minor>0</minor>",
            &format!("<major>{}</major>\n    <minor>{}</minor>", major, minor),
            1,
        );
        assert_ne!(xml_content, self.xml_content, "fixture has no 1.0 specVersion");

        Self {
            name: format!("{}@{}.{}", self.name, major, minor),
            ip: self.ip.clone(),
            xml_content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_fixture() {
        let fixture = DescriptionFixture::load("media_renderer.xml", "192.168.1.100");
        assert!(fixture.xml_content.contains("<?xml"));
        assert!(fixture.xml_content.contains("MediaRenderer"));
    }

    #[test]
    fn test_location_url() {
        let fixture = DescriptionFixture::load("minimal_device.xml", "192.168.1.100");
        assert_eq!(
            fixture.location_url().as_str(),
            "http://192.168.1.100:1400/xml/device_description.xml"
        );
    }

    #[test]
    fn test_with_spec_version() {
        let fixture = DescriptionFixture::load("minimal_device.xml", "192.168.1.100")
            .with_spec_version(2, 0);
        assert!(fixture.xml_content.contains("<major>2</major>"));
    }
}
