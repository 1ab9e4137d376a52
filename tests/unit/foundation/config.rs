use super::*;

#[test]
fn defaults_match_backend_limits() {
    let cfg = MaskwrightConfig::default();
    assert_eq!(cfg.downscale_threshold_bytes, 5_242_880);
    assert_eq!(cfg.downscale_max_dimension, 1536);
    assert_eq!(cfg.downscale_jpeg_quality, 85);
    assert_eq!(cfg.max_upload_bytes, 26_214_400);
    assert!(!cfg.allow_degenerate_mask);
    assert_eq!(cfg.max_history_entries, 50);
    cfg.validate().unwrap();
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let cfg = MaskwrightConfig::from_json(r#"{ "default_brush_radius": 7 }"#).unwrap();
    assert_eq!(cfg.default_brush_radius, 7);
    assert_eq!(cfg.downscale_max_dimension, 1536);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(MaskwrightConfig::from_json(r#"{ "downscale_jpeg_quality": 0 }"#).is_err());
    assert!(MaskwrightConfig::from_json(r#"{ "downscale_max_dimension": 0 }"#).is_err());
    assert!(MaskwrightConfig::from_json("not json").is_err());
    assert!(MaskwrightConfig::from_json(r#"{ "max_history_entries": 1 }"#).is_err());
}
