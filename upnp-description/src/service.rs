//! Service entries of a device's `serviceList`.

use tracing::debug;
use url::Url;

use crate::error::Result;
use crate::fields::Fields;
use crate::query::QueryContext;

/// Identity and location of a UPnP service.
///
/// Only what is needed to reach the service is extracted; its action and
/// state variable schema lives behind `scpd_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    /// Service type URN, e.g. "urn:schemas-upnp-org:service:AVTransport:1"
    pub service_type: String,
    /// Service identifier, e.g. "urn:upnp-org:serviceId:AVTransport"
    pub service_id: String,
    /// Unique service name: owning device UDN + "::" + service type
    pub usn: String,
    /// Location of the service description (SCPD)
    pub scpd_url: Url,
    /// Endpoint for control (SOAP) requests
    pub control_url: Url,
    /// Endpoint for event subscriptions, absent when the device omits it
    pub event_sub_url: Option<Url>,
}

impl Service {
    /// Build a service from a context scoped to a `<service>` element.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Query context scoped to the `<service>` element
    /// * `base` - Effective base URL of the root device
    /// * `device_udn` - UDN of the device owning this service
    ///
    /// # Errors
    ///
    /// Fails if the type, id, SCPD or control URL is missing, or if one of
    /// the mandatory URLs cannot be resolved.
    pub fn from_context<C: QueryContext>(ctx: &C, base: &Url, device_udn: &str) -> Result<Self> {
        let fields = Fields::new(ctx);

        let service_type = fields.mandatory("serviceType")?;
        let service_id = fields.mandatory("serviceId")?;
        let scpd_url = fields.mandatory_url("SCPDURL", base)?;
        let control_url = fields.mandatory_url("controlURL", base)?;
        let event_sub_url = fields.optional_url("eventSubURL", base);

        debug!("parsed service {} control={}", service_type, control_url);

        Ok(Self {
            usn: format!("{}::{}", device_udn, service_type),
            service_type,
            service_id,
            scpd_url,
            control_url,
            event_sub_url,
        })
    }

    /// Version number at the end of the service type URN.
    ///
    /// Returns 1 when the type carries no parseable version.
    pub fn service_type_version(&self) -> u32 {
        self.service_type
            .rsplit(':')
            .next()
            .and_then(|version| version.parse().ok())
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DescriptionError;
    use crate::query::{XmlContext, XmlDocument};

    fn parse_service(xml: &str) -> Result<Service> {
        let doc = XmlDocument::parse(xml).unwrap();
        let ctx = doc.context();
        let service = ctx.get_pointer("service").unwrap();
        let base = Url::parse("http://192.168.1.100:1400/").unwrap();
        Service::from_context(&XmlContext::new(service), &base, "uuid:RINCON_1")
    }

    #[test]
    fn test_service_from_context() {
        let service = parse_service(
            r#"<service>
  <serviceType>urn:schemas-upnp-org:service:AVTransport:2</serviceType>
  <serviceId>urn:upnp-org:serviceId:AVTransport</serviceId>
  <controlURL>/MediaRenderer/AVTransport/Control</controlURL>
  <eventSubURL>/MediaRenderer/AVTransport/Event</eventSubURL>
  <SCPDURL>xml/AVTransport1.xml</SCPDURL>
</service>"#,
        )
        .unwrap();

        assert_eq!(service.service_id, "urn:upnp-org:serviceId:AVTransport");
        assert_eq!(
            service.usn,
            "uuid:RINCON_1::urn:schemas-upnp-org:service:AVTransport:2"
        );
        assert_eq!(
            service.control_url.as_str(),
            "http://192.168.1.100:1400/MediaRenderer/AVTransport/Control"
        );
        assert_eq!(
            service.scpd_url.as_str(),
            "http://192.168.1.100:1400/xml/AVTransport1.xml"
        );
        assert_eq!(
            service.event_sub_url.as_ref().map(Url::as_str),
            Some("http://192.168.1.100:1400/MediaRenderer/AVTransport/Event")
        );
        assert_eq!(service.service_type_version(), 2);
    }

    #[test]
    fn test_empty_event_url_is_absent() {
        let service = parse_service(
            r#"<service>
  <serviceType>urn:schemas-upnp-org:service:ConnectionManager:1</serviceType>
  <serviceId>urn:upnp-org:serviceId:ConnectionManager</serviceId>
  <controlURL>/cm/control</controlURL>
  <eventSubURL></eventSubURL>
  <SCPDURL>/cm.xml</SCPDURL>
</service>"#,
        )
        .unwrap();

        assert_eq!(service.event_sub_url, None);
        assert_eq!(service.service_type_version(), 1);
    }

    #[test]
    fn test_missing_control_url_fails() {
        let err = parse_service(
            r#"<service>
  <serviceType>urn:schemas-upnp-org:service:ConnectionManager:1</serviceType>
  <serviceId>urn:upnp-org:serviceId:ConnectionManager</serviceId>
  <SCPDURL>/cm.xml</SCPDURL>
</service>"#,
        )
        .unwrap_err();

        assert!(matches!(err, DescriptionError::MissingField { ref path } if path == "controlURL"));
    }
}
