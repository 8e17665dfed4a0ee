//! Device records of a parsed description.

use std::fmt;

use url::Url;

use crate::icon::Icon;
use crate::service::Service;

/// Handle to a device inside its [`RootDevice`](crate::RootDevice).
///
/// Parent and child links are stored as handles, so the tree owns its nodes
/// in one place and back-references never keep anything alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub(crate) usize);

impl DeviceId {
    /// Handle of the top-level device of every description.
    pub const ROOT: DeviceId = DeviceId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A device from the description, either the root device or an embedded one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub(crate) id: DeviceId,
    pub(crate) parent: Option<DeviceId>,
    pub(crate) child_devices: Vec<DeviceId>,

    /// Device type URN, e.g. "urn:schemas-upnp-org:device:MediaRenderer:1"
    pub device_type: String,
    /// Unique device name, e.g. "uuid:RINCON_000E58A0123456"
    pub udn: String,
    /// Unique service name: UDN + "::" + device type
    pub usn: String,
    pub friendly_name: String,
    pub manufacturer: Option<String>,
    pub manufacturer_url: Option<Url>,
    pub model_description: Option<String>,
    pub model_name: String,
    pub model_number: Option<String>,
    pub model_url: Option<Url>,
    pub serial_number: Option<String>,
    /// Universal product code; dropped when the device reports non-digits
    pub upc: Option<i64>,
    pub presentation_url: Option<Url>,
    /// Services in document order
    pub services: Vec<Service>,
    /// `None` when the description has no `iconList`, `Some` (possibly empty)
    /// when it does
    pub icons: Option<Vec<Icon>>,
}

impl Device {
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Handle of the containing device, `None` for the root device.
    pub fn parent_id(&self) -> Option<DeviceId> {
        self.parent
    }

    /// Handles of embedded devices in document order.
    pub fn child_ids(&self) -> &[DeviceId] {
        &self.child_devices
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// First service of the given type.
    pub fn service(&self, service_type: &str) -> Option<&Service> {
        self.services
            .iter()
            .find(|service| service.service_type == service_type)
    }

    /// Service with the given service identifier.
    pub fn service_by_id(&self, service_id: &str) -> Option<&Service> {
        self.services
            .iter()
            .find(|service| service.service_id == service_id)
    }

    /// Icons in document order, empty when the device declares none.
    pub fn icons(&self) -> &[Icon] {
        self.icons.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.friendly_name, self.device_type)
    }
}
