use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TryOnError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(TryOnError::asset("x").to_string().contains("asset error:"));
    assert!(
        TryOnError::capture("x")
            .to_string()
            .contains("capture error:")
    );
    assert!(TryOnError::device("x").to_string().contains("device error:"));
    assert!(
        TryOnError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TryOnError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
