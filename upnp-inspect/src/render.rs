//! Text and JSON views of a parsed device tree.

use std::fmt::Write;

use serde::Serialize;
use upnp_description::{Device, Icon, RootDevice, Service};

#[derive(Debug, Serialize)]
pub struct RootView {
    pub location: String,
    pub url_base: String,
    pub spec_version: String,
    pub validity_ms: i64,
    pub device: DeviceView,
}

#[derive(Debug, Serialize)]
pub struct DeviceView {
    pub device_type: String,
    pub udn: String,
    pub usn: String,
    pub friendly_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_description: Option<String>,
    pub model_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upc: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation_url: Option<String>,
    pub services: Vec<ServiceView>,
    /// `null` when the device has no icon list at all
    pub icons: Option<Vec<IconView>>,
    pub devices: Vec<DeviceView>,
}

#[derive(Debug, Serialize)]
pub struct ServiceView {
    pub service_type: String,
    pub service_id: String,
    pub scpd_url: String,
    pub control_url: String,
    pub event_sub_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IconView {
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub url: String,
}

impl RootView {
    pub fn new(root: &RootDevice) -> Self {
        let version = root.spec_version();
        Self {
            location: root.location().to_string(),
            url_base: root.url_base().to_string(),
            spec_version: format!("{}.{}", version.major, version.minor),
            validity_ms: root.validity_time(),
            device: DeviceView::new(root, root.device()),
        }
    }
}

impl DeviceView {
    fn new(root: &RootDevice, device: &Device) -> Self {
        Self {
            device_type: device.device_type.clone(),
            udn: device.udn.clone(),
            usn: device.usn.clone(),
            friendly_name: device.friendly_name.clone(),
            manufacturer: device.manufacturer.clone(),
            manufacturer_url: device.manufacturer_url.as_ref().map(ToString::to_string),
            model_description: device.model_description.clone(),
            model_name: device.model_name.clone(),
            model_number: device.model_number.clone(),
            model_url: device.model_url.as_ref().map(ToString::to_string),
            serial_number: device.serial_number.clone(),
            upc: device.upc,
            presentation_url: device.presentation_url.as_ref().map(ToString::to_string),
            services: device.services.iter().map(ServiceView::from).collect(),
            icons: device
                .icons
                .as_ref()
                .map(|icons| icons.iter().map(IconView::from).collect()),
            devices: root
                .children(device)
                .map(|child| DeviceView::new(root, child))
                .collect(),
        }
    }
}

impl From<&Service> for ServiceView {
    fn from(service: &Service) -> Self {
        Self {
            service_type: service.service_type.clone(),
            service_id: service.service_id.clone(),
            scpd_url: service.scpd_url.to_string(),
            control_url: service.control_url.to_string(),
            event_sub_url: service.event_sub_url.as_ref().map(ToString::to_string),
        }
    }
}

impl From<&Icon> for IconView {
    fn from(icon: &Icon) -> Self {
        Self {
            mime_type: icon.mime_type.clone(),
            width: icon.width,
            height: icon.height,
            depth: icon.depth,
            url: icon.url.to_string(),
        }
    }
}

/// Render the tree as pretty-printed JSON.
pub fn render_json(root: &RootDevice) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&RootView::new(root))
}

/// Render the tree as indented text, one device per block.
pub fn render_text(root: &RootDevice) -> String {
    let mut out = String::new();
    let version = root.spec_version();
    let _ = writeln!(out, "Location:  {}", root.location());
    let _ = writeln!(out, "URLBase:   {}", root.url_base());
    let _ = writeln!(out, "UPnP:      {}.{}", version.major, version.minor);
    let _ = writeln!(out, "Valid for: {}s", root.validity_time().max(0) / 1000);
    write_device(&mut out, root, root.device(), 0);
    out
}

fn write_device(out: &mut String, root: &RootDevice, device: &Device, level: usize) {
    let indent = "  ".repeat(level);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}{}", indent, device);
    let _ = writeln!(out, "{}  UDN:   {}", indent, device.udn);
    let _ = writeln!(
        out,
        "{}  Model: {}{}",
        indent,
        device.model_name,
        device
            .model_number
            .as_deref()
            .map(|number| format!(" ({})", number))
            .unwrap_or_default()
    );
    if let Some(manufacturer) = &device.manufacturer {
        let _ = writeln!(out, "{}  Maker: {}", indent, manufacturer);
    }
    if let Some(url) = &device.presentation_url {
        let _ = writeln!(out, "{}  Page:  {}", indent, url);
    }

    for service in &device.services {
        let _ = writeln!(out, "{}  - {}", indent, service.service_type);
        let _ = writeln!(out, "{}      control: {}", indent, service.control_url);
        if let Some(url) = &service.event_sub_url {
            let _ = writeln!(out, "{}      events:  {}", indent, url);
        }
    }

    for icon in device.icons() {
        let _ = writeln!(
            out,
            "{}  * {} {}x{}x{} {}",
            indent, icon.mime_type, icon.width, icon.height, icon.depth, icon.url
        );
    }

    for child in root.children(device) {
        write_device(out, root, child, level + 1);
    }
}
