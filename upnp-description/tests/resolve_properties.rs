//! Property tests for URL resolution

use proptest::prelude::*;
use upnp_description::{derive_base_url, resolve};
use url::Url;

fn host() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u8..=254, 0u8..=254, 0u8..=254, 1u8..=254)
            .prop_map(|(a, b, c, d)| format!("{}.{}.{}.{}", a, b, c, d)),
        "[a-z][a-z0-9]{0,10}(\\.[a-z]{2,5})?",
    ]
}

fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.-]{1,12}".prop_filter("dot segments", |s| s != "." && s != "..")
}

fn base_url() -> impl Strategy<Value = Url> {
    (host(), 1024u16..=65535, prop::collection::vec(segment(), 0..4)).prop_map(
        |(host, port, segments)| {
            let path = segments.iter().map(|s| format!("/{}", s)).collect::<String>();
            Url::parse(&format!("http://{}:{}{}", host, port, path)).unwrap()
        },
    )
}

proptest! {
    #[test]
    fn absolute_urls_are_kept(base in base_url(), target in base_url()) {
        let resolved = resolve(Some(target.as_str()), Some(&base)).unwrap();
        prop_assert_eq!(resolved, Some(target));
    }

    #[test]
    fn root_relative_paths_keep_only_the_authority(
        base in base_url(),
        segments in prop::collection::vec(segment(), 1..4),
    ) {
        let path = segments.iter().map(|s| format!("/{}", s)).collect::<String>();
        let resolved = resolve(Some(&path), Some(&base)).unwrap().unwrap();

        prop_assert_eq!(resolved.host_str(), base.host_str());
        prop_assert_eq!(resolved.port_or_known_default(), base.port_or_known_default());
        prop_assert_eq!(resolved.path(), path.as_str());
    }

    #[test]
    fn relative_paths_extend_the_base(
        base in base_url(),
        segments in prop::collection::vec(segment(), 1..4),
    ) {
        let relative = segments.join("/");
        let resolved = resolve(Some(&relative), Some(&base)).unwrap().unwrap();

        prop_assert!(resolved.as_str().starts_with(base.as_str()));
        prop_assert!(resolved.path().ends_with(&relative));
        prop_assert!(!resolved.path().contains("//"));
    }

    #[test]
    fn derived_base_stays_on_the_same_host(location in base_url()) {
        let derived = derive_base_url(&location).unwrap();

        prop_assert_eq!(derived.host_str(), location.host_str());
        prop_assert_eq!(derived.port_or_known_default(), location.port_or_known_default());
        prop_assert!(location.path().starts_with(derived.path()));
    }
}
