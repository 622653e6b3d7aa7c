use super::*;

#[test]
fn codes_are_distinct_per_variant() {
    let errors = [
        Error::StorageUnavailable("denied".into()),
        Error::MediaQueryUnavailable("none".into()),
        Error::Dom("x".into()),
        Error::MissingElement("body".into()),
        Error::Navigation { url: "/a/".into(), reason: "blocked".into() },
        Error::InvalidMode("blue".into()),
    ];
    let mut codes = errors.iter().map(Error::code).collect::<Vec<_>>();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), errors.len());
}

#[test]
fn navigation_error_mentions_url() {
    let err = Error::Navigation { url: "/entry/a/".into(), reason: "blocked".into() };
    assert_eq!(err.to_string(), "navigation to /entry/a/ failed: blocked");
}

#[test]
fn invalid_mode_quotes_value() {
    assert_eq!(Error::InvalidMode("blue".into()).to_string(), "invalid mode: \"blue\"");
}

#[test]
fn json_errors_convert_into_config() {
    let Err(json_err) = serde_json::from_str::<serde_json::Value>("{") else {
        panic!("expected a parse error");
    };
    let err = Error::from(json_err);
    assert_eq!(err.code(), "E_CONFIG");
}
