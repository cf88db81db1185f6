use posenet_base::Tensor;

use crate::{config::OutputStride, error::PoseError};

/// Network outputs needed by the single-pose decoder.
#[derive(Debug, Clone)]
pub struct SinglePoseOutputs {
    /// `[H, W, K]`, after sigmoid
    pub heatmap_scores: Tensor<f32>,
    /// `[H, W, 2K]`
    pub offsets: Tensor<f32>,
}

/// Network outputs needed by the multi-pose decoder.
#[derive(Debug, Clone)]
pub struct MultiPoseOutputs {
    /// `[H, W, K]`, after sigmoid
    pub heatmap_scores: Tensor<f32>,
    /// `[H, W, 2K]`
    pub offsets: Tensor<f32>,
    /// `[H, W, 2E]`
    pub displacement_fwd: Tensor<f32>,
    /// `[H, W, 2E]`
    pub displacement_bwd: Tensor<f32>,
}

/// A PoseNet forward pass.
///
/// `input` is a `[H, W, 3]` image with values in `[-1, 1]`, where `H` and `W`
/// are valid resolutions for `output_stride`.
pub trait PoseNetwork: Send + Sync {
    fn predict_single_pose(
        &self,
        input: &Tensor<f32>,
        output_stride: OutputStride,
    ) -> Result<SinglePoseOutputs, PoseError>;

    fn predict_multi_pose(
        &self,
        input: &Tensor<f32>,
        output_stride: OutputStride,
    ) -> Result<MultiPoseOutputs, PoseError>;
}
