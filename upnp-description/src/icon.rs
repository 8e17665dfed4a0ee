//! Icon entries of a device's `iconList`.

use url::Url;

use crate::error::Result;
use crate::fields::Fields;
use crate::query::QueryContext;

/// An icon advertised by a device.
///
/// Every attribute is mandatory; an icon entry that cannot be fully parsed
/// fails the whole description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub url: Url,
}

impl Icon {
    /// Build an icon from a context scoped to an `<icon>` element.
    pub fn from_context<C: QueryContext>(ctx: &C, base: &Url) -> Result<Self> {
        let fields = Fields::new(ctx);

        Ok(Self {
            mime_type: fields.mandatory("mimetype")?,
            width: fields.mandatory_number("width")?,
            height: fields.mandatory_number("height")?,
            depth: fields.mandatory_number("depth")?,
            url: fields.mandatory_url("url", base)?,
        })
    }
}
