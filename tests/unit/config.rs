use super::*;

#[test]
fn defaults_validate() {
    TryOnConfig::default().validate().unwrap();
}

#[test]
fn partial_json_keeps_other_defaults() {
    let cfg = TryOnConfig::from_json_str(r#"{"capture":{"step_ms":2000}}"#).unwrap();
    assert_eq!(cfg.capture.step_ms, 2000);
    assert_eq!(cfg.capture.settle_ms, 800);
    assert_eq!(cfg.smoothing, SmoothingConfig::default());
}

#[test]
fn unknown_fields_are_rejected() {
    let err = TryOnConfig::from_json_str(r#"{"smoothing":{"beta":0.5}}"#).unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}

#[test]
fn alpha_of_one_is_rejected() {
    let mut cfg = TryOnConfig::default();
    cfg.smoothing.landmark_alpha = 1.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn out_of_range_ratio_is_rejected() {
    let err = TryOnConfig::from_json_str(r#"{"placement":{"necklace_ratio":9.0}}"#).unwrap_err();
    assert!(err.to_string().contains("placement.necklace_ratio"));
}

#[test]
fn zero_segmentation_interval_is_rejected() {
    let mut cfg = TryOnConfig::default();
    cfg.occlusion.segmentation_interval_ms = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn durations_follow_millisecond_fields() {
    let cfg = TryOnConfig::default();
    assert_eq!(cfg.capture.settle(), Duration::from_millis(800));
    assert_eq!(cfg.capture.step(), Duration::from_millis(1500));
    assert_eq!(
        cfg.occlusion.segmentation_interval(),
        Duration::from_millis(250)
    );
}
