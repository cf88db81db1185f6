use std::io::Write;

use posenet::{DecoderConfig, Multiplier, OutputStride, PoseError};

#[test]
fn test_defaults() {
    let config = DecoderConfig::default();
    assert_eq!(config.output_stride, OutputStride::Sixteen);
    assert_eq!(config.image_scale_factor, 0.5);
    assert!(!config.flip_horizontal);
    assert_eq!(config.max_detections, 5);
    assert_eq!(config.score_threshold, 0.5);
    assert_eq!(config.nms_radius, 20.0);
    assert_eq!(config.multiplier, Multiplier::OnePointZeroOne);
}

#[test]
fn test_partial_json_fills_defaults() {
    let config = DecoderConfig::from_json_str(r#"{ "output_stride": 8, "nms_radius": 30.0 }"#).unwrap();

    assert_eq!(config.output_stride, OutputStride::Eight);
    assert_eq!(config.nms_radius, 30.0);
    assert_eq!(config.max_detections, 5);
}

#[test]
fn test_multiplier_from_json() {
    let config = DecoderConfig::from_json_str(r#"{ "multiplier": 0.75 }"#).unwrap();
    assert_eq!(config.multiplier, Multiplier::ThreeQuarters);
}

#[test]
fn test_json_round_trip_keeps_numeric_fields() {
    let config = DecoderConfig {
        output_stride: OutputStride::ThirtyTwo,
        flip_horizontal: true,
        ..Default::default()
    };

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"output_stride\":32"));
    assert_eq!(DecoderConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_invalid_output_stride_is_rejected() {
    let result = DecoderConfig::from_json_str(r#"{ "output_stride": 12 }"#);
    assert!(matches!(result, Err(PoseError::Json(_))));
}

#[test]
fn test_out_of_range_values_are_rejected() {
    assert!(matches!(
        DecoderConfig::from_json_str(r#"{ "image_scale_factor": 1.5 }"#),
        Err(PoseError::InvalidScaleFactor(_))
    ));
    assert!(matches!(
        DecoderConfig::from_json_str(r#"{ "max_detections": 0 }"#),
        Err(PoseError::InvalidConfig(_))
    ));
    assert!(matches!(
        DecoderConfig::from_json_str(r#"{ "score_threshold": 2.0 }"#),
        Err(PoseError::InvalidConfig(_))
    ));
    assert!(matches!(
        DecoderConfig::from_json_str(r#"{ "nms_radius": -1.0 }"#),
        Err(PoseError::InvalidConfig(_))
    ));
}

#[test]
fn test_from_json_file() {
    let path = std::env::temp_dir().join(format!("posenet-config-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(br#"{ "flip_horizontal": true, "max_detections": 2 }"#)
        .unwrap();
    drop(file);

    let config = DecoderConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(config.flip_horizontal);
    assert_eq!(config.max_detections, 2);
}

#[test]
fn test_missing_file_is_io_error() {
    let result = DecoderConfig::from_json_file("/nonexistent/posenet.json");
    assert!(matches!(result, Err(PoseError::Io(_))));
}
