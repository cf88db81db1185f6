use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PoseError;

/// Downsampling factor between the network input and its output grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum OutputStride {
    Eight,
    #[default]
    Sixteen,
    ThirtyTwo,
}

impl OutputStride {
    pub fn value(self) -> u32 {
        match self {
            OutputStride::Eight => 8,
            OutputStride::Sixteen => 16,
            OutputStride::ThirtyTwo => 32,
        }
    }

    pub fn as_f32(self) -> f32 {
        self.value() as f32
    }
}

impl TryFrom<u32> for OutputStride {
    type Error = PoseError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            8 => Ok(OutputStride::Eight),
            16 => Ok(OutputStride::Sixteen),
            32 => Ok(OutputStride::ThirtyTwo),
            other => Err(PoseError::InvalidOutputStride(other)),
        }
    }
}

impl From<OutputStride> for u32 {
    fn from(stride: OutputStride) -> u32 {
        stride.value()
    }
}

/// MobileNet depth multiplier; selects the network checkpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub enum Multiplier {
    Half,
    ThreeQuarters,
    One,
    #[default]
    OnePointZeroOne,
}

impl Multiplier {
    pub fn value(self) -> f32 {
        match self {
            Multiplier::Half => 0.5,
            Multiplier::ThreeQuarters => 0.75,
            Multiplier::One => 1.0,
            Multiplier::OnePointZeroOne => 1.01,
        }
    }

    /// Directory name of the published weights for this multiplier.
    pub fn checkpoint_name(self) -> &'static str {
        match self {
            Multiplier::Half => "mobilenet_v1_050",
            Multiplier::ThreeQuarters => "mobilenet_v1_075",
            Multiplier::One => "mobilenet_v1_100",
            Multiplier::OnePointZeroOne => "mobilenet_v1_101",
        }
    }
}

impl TryFrom<f32> for Multiplier {
    type Error = PoseError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        [
            Multiplier::Half,
            Multiplier::ThreeQuarters,
            Multiplier::One,
            Multiplier::OnePointZeroOne,
        ]
        .into_iter()
        .find(|m| (m.value() - value).abs() < 1e-6)
        .ok_or(PoseError::InvalidMultiplier(value))
    }
}

impl From<Multiplier> for f32 {
    fn from(multiplier: Multiplier) -> f32 {
        multiplier.value()
    }
}

/// Caller-facing knobs for estimating poses from a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    pub output_stride: OutputStride,
    /// Resize factor applied to the frame before inference, in (0, 1].
    pub image_scale_factor: f32,
    /// Mirror the frame before inference (webcam input).
    pub flip_horizontal: bool,
    pub max_detections: usize,
    pub score_threshold: f32,
    /// Minimum distance, in input image pixels, between the same part of two poses.
    pub nms_radius: f32,
    pub multiplier: Multiplier,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            output_stride: OutputStride::default(),
            image_scale_factor: 0.5,
            flip_horizontal: false,
            max_detections: 5,
            score_threshold: 0.5,
            nms_radius: 20.0,
            multiplier: Multiplier::default(),
        }
    }
}

impl DecoderConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PoseError> {
        let config: DecoderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PoseError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), PoseError> {
        if !(self.image_scale_factor > 0.0 && self.image_scale_factor <= 1.0) {
            return Err(PoseError::InvalidScaleFactor(self.image_scale_factor));
        }
        if self.max_detections == 0 {
            return Err(PoseError::InvalidConfig(
                "max_detections must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(PoseError::InvalidConfig(format!(
                "score_threshold {} is outside [0, 1]",
                self.score_threshold
            )));
        }
        if !(self.nms_radius > 0.0) {
            return Err(PoseError::InvalidConfig(format!(
                "nms_radius {} must be positive",
                self.nms_radius
            )));
        }
        Ok(())
    }
}
