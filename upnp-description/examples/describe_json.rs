//! Fetch a device description and print its tree as JSON for scripting
//!
//! Usage: cargo run -p upnp-sdk-description --example describe_json -- <location>

use serde::Serialize;
use std::time::Duration;
use upnp_description::{Device, RootDevice};
use url::Url;

#[derive(Serialize)]
struct DeviceInfo {
    udn: String,
    device_type: String,
    friendly_name: String,
    model_name: String,
    services: Vec<String>,
    devices: Vec<DeviceInfo>,
}

fn describe(root: &RootDevice, device: &Device) -> DeviceInfo {
    DeviceInfo {
        udn: device.udn.clone(),
        device_type: device.device_type.clone(),
        friendly_name: device.friendly_name.clone(),
        model_name: device.model_name.clone(),
        services: device
            .services
            .iter()
            .map(|s| s.control_url.to_string())
            .collect(),
        devices: root
            .children(device)
            .map(|child| describe(root, child))
            .collect(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let location = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://192.168.1.100:1400/xml/device_description.xml".to_string());
    let location = Url::parse(&location)?;

    let root = upnp_description::DescriptionLoader::default()
        .load(&location, Duration::from_secs(1800))?;

    println!("{}", serde_json::to_string_pretty(&describe(&root, root.device()))?);
    Ok(())
}
