//! Mandatory and optional field extraction on top of a query context.

use std::str::FromStr;

use tracing::debug;
use url::Url;

use crate::error::{DescriptionError, Result};
use crate::query::{QueryContext, QueryError};
use crate::resolve::resolve;

/// Field access with UPnP schema semantics over a scoped [`QueryContext`].
///
/// Mandatory lookups abort the parse when the value is missing or empty.
/// Optional lookups absorb absence and non-compliant content, since devices
/// routinely omit or garble optional elements.
pub struct Fields<'c, C> {
    ctx: &'c C,
}

impl<'c, C: QueryContext> Fields<'c, C> {
    pub fn new(ctx: &'c C) -> Self {
        Self { ctx }
    }

    /// Non-empty text at `path`.
    ///
    /// # Errors
    ///
    /// `MissingField` if the path does not resolve or holds an empty string.
    /// Query syntax errors are passed through.
    pub fn mandatory(&self, path: &str) -> Result<String> {
        match self.ctx.get_string(path) {
            Ok(value) if !value.is_empty() => Ok(value),
            Ok(_) | Err(QueryError::PathNotFound(_)) => Err(DescriptionError::MissingField {
                path: path.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Text at `path`, or `None` when absent or empty. Never fails.
    pub fn optional(&self, path: &str) -> Option<String> {
        self.ctx
            .get_string(path)
            .ok()
            .filter(|value| !value.is_empty())
    }

    /// Optional URL at `path` resolved against `base`; malformed values are
    /// logged and dropped.
    pub fn optional_url(&self, path: &str, base: &Url) -> Option<Url> {
        let raw = self.optional(path)?;
        match resolve(Some(&raw), Some(base)) {
            Ok(url) => url,
            Err(e) => {
                debug!("Ignoring malformed optional URL in {}: {}", path, e);
                None
            }
        }
    }

    /// Optional integer at `path`; non-numeric content yields `None`.
    pub fn optional_long(&self, path: &str) -> Option<i64> {
        let raw = self.optional(path)?;
        match raw.parse::<i64>() {
            Ok(value) => Some(value),
            Err(_) => {
                debug!("Ignoring non-numeric value {:?} in {}", raw, path);
                None
            }
        }
    }

    /// Mandatory number at `path`.
    ///
    /// # Errors
    ///
    /// `MissingField` as for [`Fields::mandatory`], `InvalidNumber` if the
    /// text does not parse as `T`.
    pub fn mandatory_number<T: FromStr>(&self, path: &str) -> Result<T> {
        let raw = self.mandatory(path)?;
        raw.parse::<T>()
            .map_err(|_| DescriptionError::InvalidNumber {
                path: path.to_string(),
                value: raw,
            })
    }

    /// Mandatory URL at `path` resolved against `base`.
    ///
    /// # Errors
    ///
    /// `MissingField` if absent or empty, `MalformedUrl` if it cannot be
    /// resolved.
    pub fn mandatory_url(&self, path: &str, base: &Url) -> Result<Url> {
        let raw = self.mandatory(path)?;
        resolve(Some(&raw), Some(base))?.ok_or_else(|| DescriptionError::MissingField {
            path: path.to_string(),
        })
    }
}
