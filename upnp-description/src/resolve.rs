//! URL resolution against a device's base URL.

use url::Url;

use crate::error::{DescriptionError, Result};

/// Resolve a URL found in a description against `base`.
///
/// - absent or blank input yields `Ok(None)`
/// - an absolute URL (one that can itself serve as a base) is returned as-is
/// - a relative path is appended to the base, one `/` between them
/// - a root-relative path (`/...`) keeps only the base scheme, host and port
///
/// Joining is textual: query strings and percent-escapes are kept verbatim.
///
/// # Errors
///
/// Returns `DescriptionError::MalformedUrl` if the input is relative and no
/// base is available, or if the joined text still does not parse.
pub fn resolve(raw: Option<&str>, base: Option<&Url>) -> Result<Option<Url>> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };

    // "host:port/path" parses with "host" as an opaque scheme; only URLs
    // that can act as a base count as absolute.
    let error = match Url::parse(raw) {
        Ok(url) if !url.cannot_be_a_base() => return Ok(Some(url)),
        Ok(_) => url::ParseError::RelativeUrlWithoutBase,
        Err(error) => error,
    };

    let base = match base {
        Some(base) => base,
        None => return Err(DescriptionError::malformed_url(raw, error)),
    };

    let relative = raw.replace('\\', "/");
    let joined = if relative.starts_with('/') {
        format!("{}{}", url_root(base), relative)
    } else {
        let external = base.as_str();
        if external.ends_with('/') {
            format!("{external}{relative}")
        } else {
            format!("{external}/{relative}")
        }
    };

    Url::parse(&joined)
        .map(Some)
        .map_err(|e| DescriptionError::malformed_url(joined, e))
}

/// Derive a base URL from the location a description was fetched from.
///
/// Keeps scheme, host and port plus the directory part of the path; the file
/// name, query and fragment are dropped.
///
/// # Errors
///
/// Returns `DescriptionError::MalformedUrl` if the result cannot be parsed,
/// e.g. for locations without a host.
pub fn derive_base_url(location: &Url) -> Result<Url> {
    let mut derived = url_root(location);
    let path = location.path();
    if let Some(last_slash) = path.rfind('/') {
        derived.push_str(&path[..last_slash]);
    }

    Url::parse(&derived).map_err(|e| DescriptionError::malformed_url(derived, e))
}

fn url_root(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port_or_known_default() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_absolute_url_is_returned_as_is() {
        let base = url("http://10.0.0.1:8080/x/y");
        let resolved = resolve(Some("http://example.com:49152/desc.xml?a=1"), Some(&base))
            .unwrap()
            .unwrap();
        assert_eq!(resolved.as_str(), "http://example.com:49152/desc.xml?a=1");
    }

    #[test]
    fn test_scheme_like_prefix_is_relative() {
        let base = url("http://10.0.0.1:8080/x");
        let resolved = resolve(Some("localhost:49152/desc"), Some(&base))
            .unwrap()
            .unwrap();
        assert_eq!(resolved.as_str(), "http://10.0.0.1:8080/x/localhost:49152/desc");

        let resolved = resolve(Some("uuid:dev-1/ctl"), Some(&base)).unwrap().unwrap();
        assert_eq!(resolved.host_str(), Some("10.0.0.1"));
        assert_eq!(resolved.path(), "/x/uuid:dev-1/ctl");

        let err = resolve(Some("localhost:49152/desc"), None).unwrap_err();
        assert!(matches!(err, DescriptionError::MalformedUrl { .. }));
    }

    #[test]
    fn test_root_relative_keeps_scheme_host_port() {
        let base = url("http://host:8080/x/y");
        let resolved = resolve(Some("/path"), Some(&base)).unwrap().unwrap();
        assert_eq!(resolved.as_str(), "http://host:8080/path");
    }

    #[test]
    fn test_root_relative_with_default_port() {
        let base = url("http://host:80/x/y");
        let resolved = resolve(Some("/path"), Some(&base)).unwrap().unwrap();
        assert_eq!(resolved, url("http://host:80/path"));
    }

    #[test]
    fn test_relative_inserts_single_separator() {
        let base = url("http://host:8080/x/y");
        let resolved = resolve(Some("rel/path"), Some(&base)).unwrap().unwrap();
        assert_eq!(resolved.as_str(), "http://host:8080/x/y/rel/path");

        let base = url("http://host:8080/x/y/");
        let resolved = resolve(Some("rel"), Some(&base)).unwrap().unwrap();
        assert_eq!(resolved.as_str(), "http://host:8080/x/y/rel");
    }

    #[test]
    fn test_relative_keeps_query_and_escapes() {
        let base = url("http://host:8080/dev");
        let resolved = resolve(Some("ctl?name=a%20b&x=1"), Some(&base))
            .unwrap()
            .unwrap();
        assert_eq!(resolved.as_str(), "http://host:8080/dev/ctl?name=a%20b&x=1");
    }

    #[test]
    fn test_backslashes_are_normalized() {
        let base = url("http://host:8080/dev/");
        let resolved = resolve(Some("icons\\small.png"), Some(&base))
            .unwrap()
            .unwrap();
        assert_eq!(resolved.as_str(), "http://host:8080/dev/icons/small.png");
    }

    #[test]
    fn test_blank_input_is_absent() {
        let base = url("http://host:8080/");
        assert_eq!(resolve(None, Some(&base)).unwrap(), None);
        assert_eq!(resolve(Some(""), Some(&base)).unwrap(), None);
        assert_eq!(resolve(Some("   "), None).unwrap(), None);
    }

    #[test]
    fn test_relative_without_base_fails() {
        let err = resolve(Some("rel/path"), None).unwrap_err();
        assert!(matches!(err, DescriptionError::MalformedUrl { .. }));
    }

    #[test]
    fn test_derive_base_url_drops_file_name() {
        let location = url("http://192.168.1.20:49152/upnp/desc/root.xml?x=1");
        let base = derive_base_url(&location).unwrap();
        assert_eq!(base.as_str(), "http://192.168.1.20:49152/upnp/desc");
    }

    #[test]
    fn test_derive_base_url_at_root() {
        let location = url("http://192.168.1.20:1400/device.xml");
        let base = derive_base_url(&location).unwrap();
        assert_eq!(base.as_str(), "http://192.168.1.20:1400/");
    }
}
