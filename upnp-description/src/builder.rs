//! Recursive construction of the device tree from a `<device>` element.

use tracing::debug;
use url::Url;

use crate::device::{Device, DeviceId};
use crate::error::{DescriptionError, Result};
use crate::fields::Fields;
use crate::icon::Icon;
use crate::query::{QueryContext, QueryError};
use crate::service::Service;

/// Builds devices into an arena, root first, in depth-first document order.
pub(crate) struct TreeBuilder<'b> {
    base: &'b Url,
    max_depth: usize,
    devices: Vec<Device>,
}

impl<'b> TreeBuilder<'b> {
    pub(crate) fn new(base: &'b Url, max_depth: usize) -> Self {
        Self {
            base,
            max_depth,
            devices: Vec::new(),
        }
    }

    /// Build the tree below the top-level `<device>` element.
    ///
    /// The first device of the returned arena is the root device.
    pub(crate) fn build_root<C: QueryContext>(mut self, ctx: &C) -> Result<Vec<Device>> {
        self.build(ctx, None, 1)?;
        Ok(self.devices)
    }

    fn build<C: QueryContext>(
        &mut self,
        ctx: &C,
        parent: Option<DeviceId>,
        depth: usize,
    ) -> Result<DeviceId> {
        if depth > self.max_depth {
            return Err(DescriptionError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        let fields = Fields::new(ctx);
        let device_type = fields.mandatory("deviceType")?;
        debug!("parsing device {}", device_type);
        let friendly_name = fields.mandatory("friendlyName")?;
        let model_name = fields.mandatory("modelName")?;
        let udn = fields.mandatory("UDN")?;

        let id = DeviceId(self.devices.len());
        let device = Device {
            id,
            parent,
            child_devices: Vec::new(),
            usn: format!("{}::{}", udn, device_type),
            manufacturer: fields.optional("manufacturer"),
            manufacturer_url: fields.optional_url("manufacturerURL", self.base),
            model_description: fields.optional("modelDescription"),
            model_number: fields.optional("modelNumber"),
            model_url: fields.optional_url("modelURL", self.base),
            serial_number: fields.optional("serialNumber"),
            upc: fields.optional_long("UPC"),
            presentation_url: fields.optional_url("presentationURL", self.base),
            services: self.build_services(ctx, &udn)?,
            icons: self.build_icons(ctx)?,
            device_type,
            friendly_name,
            model_name,
            udn,
        };
        self.devices.push(device);

        let device_list = match ctx.get_pointer("deviceList") {
            Ok(pointer) => pointer,
            Err(QueryError::PathNotFound(_)) => return Ok(id),
            Err(e) => return Err(e.into()),
        };
        let list_ctx = ctx.relative_context(device_list);
        let count = list_ctx.get_number("count(device)")? as usize;
        debug!("child devices count is {}", count);

        for index in 1..=count {
            let pointer = list_ctx.get_pointer(&format!("device[{index}]"))?;
            let child_ctx = list_ctx.relative_context(pointer);
            let child = self.build(&child_ctx, Some(id), depth + 1)?;
            debug!("adding child device {}", self.devices[child.0].device_type);
            self.devices[id.0].child_devices.push(child);
        }

        Ok(id)
    }

    fn build_services<C: QueryContext>(&self, ctx: &C, udn: &str) -> Result<Vec<Service>> {
        let service_list = ctx.get_pointer("serviceList").map_err(|e| match e {
            QueryError::PathNotFound(_) => DescriptionError::MissingElement {
                path: "serviceList".to_string(),
            },
            other => other.into(),
        })?;
        let list_ctx = ctx.relative_context(service_list);
        let count = list_ctx.get_number("count(service)")? as usize;
        debug!("device services count is {}", count);

        let mut services = Vec::with_capacity(count);
        for index in 1..=count {
            let pointer = list_ctx.get_pointer(&format!("service[{index}]"))?;
            let service_ctx = list_ctx.relative_context(pointer);
            services.push(Service::from_context(&service_ctx, self.base, udn)?);
        }
        Ok(services)
    }

    fn build_icons<C: QueryContext>(&self, ctx: &C) -> Result<Option<Vec<Icon>>> {
        let icon_list = match ctx.get_pointer("iconList") {
            Ok(pointer) => pointer,
            Err(QueryError::PathNotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let list_ctx = ctx.relative_context(icon_list);
        let count = list_ctx.get_number("count(icon)")? as usize;
        debug!("device icons count is {}", count);

        let mut icons = Vec::with_capacity(count);
        for index in 1..=count {
            let pointer = list_ctx.get_pointer(&format!("icon[{index}]"))?;
            let icon = Icon::from_context(&list_ctx.relative_context(pointer), self.base)?;
            debug!("icon URL is {}", icon.url);
            icons.push(icon);
        }
        Ok(Some(icons))
    }
}
