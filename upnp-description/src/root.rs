//! The root device of a description and its validity tracking.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::builder::TreeBuilder;
use crate::config::LoaderConfig;
use crate::device::{Device, DeviceId};
use crate::error::{DescriptionError, Result};
use crate::fetch::DescriptionSource;
use crate::fields::Fields;
use crate::query::{QueryContext, QueryError, XmlDocument};
use crate::resolve::derive_base_url;
use crate::service::Service;

/// UPnP architecture version declared by a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecVersion {
    pub major: i64,
    pub minor: i64,
}

impl SpecVersion {
    /// Versions 1.0 and 1.1 are supported.
    pub fn is_supported(&self) -> bool {
        self.major == 1 && (0..2).contains(&self.minor)
    }
}

/// Metadata from the discovery layer that is not part of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryInfo {
    pub vendor_firmware: Option<String>,
    /// USN of the advertisement that led to this device
    pub usn: Option<String>,
    /// UDN of the advertisement that led to this device
    pub udn: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Validity {
    created: Instant,
    duration: Duration,
}

impl Validity {
    fn start(duration: Duration) -> Self {
        Self {
            created: Instant::now(),
            duration,
        }
    }

    fn remaining_millis(&self) -> i64 {
        let total = i64::try_from(self.duration.as_millis()).unwrap_or(i64::MAX);
        let elapsed = i64::try_from(self.created.elapsed().as_millis()).unwrap_or(i64::MAX);
        total.saturating_sub(elapsed)
    }
}

/// Top of a parsed device description.
///
/// Owns every device of the document. The tree is immutable once built; only
/// the validity timer and the cached document text change afterwards, each
/// behind its own lock.
#[derive(Debug)]
pub struct RootDevice {
    spec_version: SpecVersion,
    url_base: Url,
    location: Url,
    discovery: DiscoveryInfo,
    devices: Vec<Device>,
    validity: Mutex<Validity>,
    source: Arc<dyn DescriptionSource>,
    description_text: Mutex<Option<String>>,
}

impl RootDevice {
    /// Parse a description with the default loader configuration.
    ///
    /// # Arguments
    ///
    /// * `xml` - Device description document
    /// * `location` - URL the document was fetched from
    /// * `max_age` - Advertised validity of the device
    pub fn from_xml(xml: &str, location: &Url, max_age: Duration) -> Result<Self> {
        crate::DescriptionLoader::default().parse(xml, location, max_age)
    }

    pub(crate) fn build(
        xml: &str,
        location: &Url,
        max_age: Duration,
        discovery: DiscoveryInfo,
        config: &LoaderConfig,
        source: Arc<dyn DescriptionSource>,
    ) -> Result<Self> {
        let document = XmlDocument::parse_with_limit(xml, config.element_depth_limit())?;
        let ctx = document.context();
        let root_ctx = ctx.relative_context(required_element(&ctx, "root")?);
        let fields = Fields::new(&root_ctx);

        let spec_version = SpecVersion {
            major: fields.mandatory_number("specVersion/major")?,
            minor: fields.mandatory_number("specVersion/minor")?,
        };
        if !spec_version.is_supported() {
            return Err(DescriptionError::UnsupportedVersion {
                major: spec_version.major,
                minor: spec_version.minor,
            });
        }

        let url_base = url_base(&fields, location)?;
        let device_ctx = root_ctx.relative_context(required_element(&root_ctx, "device")?);
        let devices = TreeBuilder::new(&url_base, config.max_depth).build_root(&device_ctx)?;

        Ok(Self {
            spec_version,
            url_base,
            location: location.clone(),
            discovery,
            devices,
            validity: Mutex::new(Validity::start(max_age)),
            source,
            description_text: Mutex::new(None),
        })
    }

    pub fn spec_version(&self) -> SpecVersion {
        self.spec_version
    }

    /// Base URL every relative URL of the document was resolved against.
    pub fn url_base(&self) -> &Url {
        &self.url_base
    }

    /// URL the description was fetched from.
    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn vendor_firmware(&self) -> Option<&str> {
        self.discovery.vendor_firmware.as_deref()
    }

    pub fn discovery_usn(&self) -> Option<&str> {
        self.discovery.usn.as_deref()
    }

    pub fn discovery_udn(&self) -> Option<&str> {
        self.discovery.udn.as_deref()
    }

    /// The top-level device of the description.
    pub fn device(&self) -> &Device {
        &self.devices[DeviceId::ROOT.0]
    }

    pub fn get(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(id.0)
    }

    pub fn parent(&self, device: &Device) -> Option<&Device> {
        device.parent.and_then(|id| self.get(id))
    }

    /// Direct children of `device` in document order.
    pub fn children<'a>(&'a self, device: &'a Device) -> impl Iterator<Item = &'a Device> + 'a {
        device.child_devices.iter().filter_map(move |id| self.get(*id))
    }

    /// Every device of the tree, root first, depth-first in document order.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    /// Every device except the root device.
    pub fn embedded_devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().skip(1)
    }

    /// First device, the root included, of the given device type.
    pub fn find_device(&self, device_type: &str) -> Option<&Device> {
        self.devices().find(|device| device.device_type == device_type)
    }

    pub fn device_by_udn(&self, udn: &str) -> Option<&Device> {
        self.devices().find(|device| device.udn == udn)
    }

    /// First service of the given type, searching devices depth-first.
    pub fn find_service(&self, service_type: &str) -> Option<(&Device, &Service)> {
        self.devices()
            .find_map(|device| device.service(service_type).map(|service| (device, service)))
    }

    /// Milliseconds left before the advertisement is outdated.
    ///
    /// Negative once the device should have re-advertised itself.
    pub fn validity_time(&self) -> i64 {
        self.validity.lock().remaining_millis()
    }

    /// Restart the validity countdown after a fresh advertisement.
    pub fn reset_validity_time(&self, max_age: Duration) {
        *self.validity.lock() = Validity::start(max_age);
    }

    pub fn is_expired(&self) -> bool {
        self.validity_time() <= 0
    }

    /// Raw text of the description document.
    ///
    /// Fetched from [`location`](Self::location) on first access and cached.
    /// Returns `None` if the fetch fails; the next call tries again.
    pub fn description_text(&self) -> Option<String> {
        let mut cached = self.description_text.lock();
        if cached.is_none() {
            match self.source.fetch(&self.location) {
                Ok(text) => *cached = Some(text),
                Err(e) => {
                    warn!("Failed to fetch description text from {}: {}", self.location, e);
                    return None;
                }
            }
        }
        cached.clone()
    }
}

/// Parse an advertised max-age.
///
/// Accepts a bare number of seconds ("1800") or a Cache-Control value
/// ("max-age = 1800", "no-cache, max-age=1800").
pub fn parse_max_age(value: &str) -> Result<Duration> {
    let invalid = || DescriptionError::InvalidNumber {
        path: "max-age".to_string(),
        value: value.to_string(),
    };

    let seconds = value
        .split(',')
        .map(str::trim)
        .find_map(|directive| {
            let prefix = directive.get(..7)?;
            if !prefix.eq_ignore_ascii_case("max-age") {
                return None;
            }
            directive[7..].trim_start().strip_prefix('=').map(str::trim)
        })
        .unwrap_or_else(|| value.trim());

    seconds
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| invalid())
}

fn required_element<C: QueryContext>(ctx: &C, path: &str) -> Result<C::Pointer> {
    ctx.get_pointer(path).map_err(|e| match e {
        QueryError::PathNotFound(_) => DescriptionError::MissingElement {
            path: path.to_string(),
        },
        other => other.into(),
    })
}

fn url_base<C: QueryContext>(fields: &Fields<'_, C>, location: &Url) -> Result<Url> {
    if let Some(declared) = fields.optional("URLBase") {
        match Url::parse(&declared) {
            Ok(url) => {
                debug!("device URLBase {}", url);
                return Ok(url);
            }
            Err(e) => warn!(
                "Malformed URLBase {:?} ({}), building it from the description location",
                declared, e
            ),
        }
    }
    derive_base_url(location)
}
