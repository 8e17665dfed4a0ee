//! UPnP device description parsing
//!
//! This crate turns a UPnP device description document (the XML found at the
//! `LOCATION` of an SSDP advertisement) into a typed device tree: the root
//! device, its embedded devices, and their services and icons.
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//! use upnp_description::RootDevice;
//! use url::Url;
//!
//! let xml = r#"<root xmlns="urn:schemas-upnp-org:device-1-0">
//!   <specVersion><major>1</major><minor>0</minor></specVersion>
//!   <device>
//!     <deviceType>urn:schemas-upnp-org:device:MediaRenderer:1</deviceType>
//!     <friendlyName>Living Room</friendlyName>
//!     <modelName>Renderer</modelName>
//!     <UDN>uuid:renderer-1</UDN>
//!     <serviceList>
//!       <service>
//!         <serviceType>urn:schemas-upnp-org:service:AVTransport:1</serviceType>
//!         <serviceId>urn:upnp-org:serviceId:AVTransport</serviceId>
//!         <SCPDURL>/avt.xml</SCPDURL>
//!         <controlURL>/avt/control</controlURL>
//!         <eventSubURL>/avt/event</eventSubURL>
//!       </service>
//!     </serviceList>
//!   </device>
//! </root>"#;
//!
//! let location = Url::parse("http://192.168.1.100:1400/xml/device_description.xml")?;
//! let root = RootDevice::from_xml(xml, &location, Duration::from_secs(1800))?;
//!
//! assert_eq!(root.device().friendly_name, "Living Room");
//! let (_, avt) = root
//!     .find_service("urn:schemas-upnp-org:service:AVTransport:1")
//!     .expect("AVTransport service");
//! assert_eq!(avt.control_url.as_str(), "http://192.168.1.100:1400/avt/control");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Failure model
//!
//! Construction either yields a complete tree or a [`DescriptionError`].
//! Missing mandatory fields, unsupported UPnP versions and malformed icon
//! entries abort the parse; absent or non-compliant optional fields are
//! dropped silently.

mod builder;
mod config;
mod device;
mod error;
mod fetch;
mod fields;
mod icon;
mod loader;
pub mod query;
mod resolve;
mod root;
mod service;

pub use config::{LoaderConfig, MAX_DEVICE_DEPTH};
pub use device::{Device, DeviceId};
pub use error::{DescriptionError, Result};
pub use fetch::{DescriptionSource, HttpSource};
pub use fields::Fields;
pub use icon::Icon;
pub use loader::DescriptionLoader;
pub use resolve::{derive_base_url, resolve};
pub use root::{parse_max_age, DiscoveryInfo, RootDevice, SpecVersion};
pub use service::Service;
