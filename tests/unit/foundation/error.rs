use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DissolveError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        DissolveError::invalid_surface("x")
            .to_string()
            .contains("invalid surface state:")
    );
    assert!(
        DissolveError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        DissolveError::load_failure("/a.jpg", anyhow::anyhow!("404"))
            .to_string()
            .contains("failed to load image '/a.jpg'")
    );
}

#[test]
fn load_failure_exposes_locator_and_source() {
    let err = DissolveError::load_failure("/images/b.jpg", std::io::Error::other("gone"));
    assert_eq!(err.failed_locator(), Some("/images/b.jpg"));
    assert!(err.to_string().contains("gone"));
    assert!(std::error::Error::source(&err).is_some());

    assert_eq!(DissolveError::validation("x").failed_locator(), None);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DissolveError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
