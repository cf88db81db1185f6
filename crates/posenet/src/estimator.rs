use log::debug;
use posenet_base::Tensor;

use crate::{
    config::DecoderConfig,
    decode::{MultiPoseDecoder, decode_single_pose, scale_pose, scale_poses},
    error::PoseError,
    network::{MultiPoseOutputs, PoseNetwork, SinglePoseOutputs},
    types::Pose,
    util::valid_resolution,
};

/// Pose estimation over whole frames.
///
/// Wraps a [`PoseNetwork`] with the frame preparation it expects and the
/// decoders that turn its outputs into poses in source image pixels.
pub struct PoseNet<N> {
    network: N,
    config: DecoderConfig,
}

impl<N: PoseNetwork> PoseNet<N> {
    pub fn new(network: N, config: DecoderConfig) -> Result<Self, PoseError> {
        config.validate()?;
        Ok(Self { network, config })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    /// Estimate the single most likely pose in `image`.
    ///
    /// `image` is `[H, W, 3]` with values in `[0, 255]`.
    pub fn estimate_single_pose(&self, image: &Tensor<f32>) -> Result<Pose, PoseError> {
        let (input, original_hw, resized_hw) = preprocess(image, &self.config)?;
        let stride = self.config.output_stride;

        let SinglePoseOutputs {
            heatmap_scores,
            offsets,
        } = self.network.predict_single_pose(&input, stride)?;
        let pose = decode_single_pose(&heatmap_scores, &offsets, stride)?;

        let (scale_y, scale_x) = scale_factors(original_hw, resized_hw);
        Ok(scale_pose(&pose, scale_y, scale_x))
    }

    /// Estimate up to `max_detections` poses in `image`, best first.
    ///
    /// `image` is `[H, W, 3]` with values in `[0, 255]`.
    pub fn estimate_multiple_poses(&self, image: &Tensor<f32>) -> Result<Vec<Pose>, PoseError> {
        let (input, original_hw, resized_hw) = preprocess(image, &self.config)?;
        let stride = self.config.output_stride;

        let MultiPoseOutputs {
            heatmap_scores,
            offsets,
            displacement_fwd,
            displacement_bwd,
        } = self.network.predict_multi_pose(&input, stride)?;

        // the decoder measures the NMS radius on the resized input
        let poses = MultiPoseDecoder::new(stride)
            .with_max_detections(self.config.max_detections)
            .with_score_threshold(self.config.score_threshold)
            .with_nms_radius(self.config.nms_radius)
            .decode(&heatmap_scores, &offsets, &displacement_fwd, &displacement_bwd)?;

        let (scale_y, scale_x) = scale_factors(original_hw, resized_hw);
        Ok(scale_poses(&poses, scale_y, scale_x))
    }
}

fn scale_factors(original_hw: (usize, usize), resized_hw: (usize, usize)) -> (f32, f32) {
    (
        original_hw.0 as f32 / resized_hw.0 as f32,
        original_hw.1 as f32 / resized_hw.1 as f32,
    )
}

/// Prepare a frame for the network: HWC `[0, 255]` -> HWC `[-1, 1]` at a
/// valid resolution, mirrored when `flip_horizontal` is set.
///
/// Returns `(input, original_hw, resized_hw)`. Resizing is nearest-neighbour.
pub fn preprocess(
    image: &Tensor<f32>,
    config: &DecoderConfig,
) -> Result<(Tensor<f32>, (usize, usize), (usize, usize)), PoseError> {
    let Some((h, w, c)) = image.hwc() else {
        return Err(PoseError::Shape(format!(
            "expected HWC tensor, got shape {:?}",
            image.shape
        )));
    };
    if h == 0 || w == 0 {
        return Err(PoseError::Shape(format!(
            "image dimensions must be non-zero, got {}x{}",
            h, w
        )));
    }
    if c != 3 {
        return Err(PoseError::Shape(format!(
            "expected 3 channels (RGB), got {}",
            c
        )));
    }

    let resized_h = valid_resolution(config.image_scale_factor, h, config.output_stride);
    let resized_w = valid_resolution(config.image_scale_factor, w, config.output_stride);

    let mut data = Vec::with_capacity(resized_h * resized_w * 3);
    for out_y in 0..resized_h {
        let src_y = (out_y * h / resized_h).min(h - 1);
        for out_x in 0..resized_w {
            let mut src_x = (out_x * w / resized_w).min(w - 1);
            if config.flip_horizontal {
                src_x = w - 1 - src_x;
            }
            for ch in 0..3 {
                data.push(image.at3(src_y, src_x, ch) / 127.5 - 1.0);
            }
        }
    }
    let input = Tensor::new(vec![resized_h, resized_w, 3], data)?;

    debug!(
        "frame {}x{} resized to {}x{} (flip: {})",
        h, w, resized_h, resized_w, config.flip_horizontal
    );
    Ok((input, (h, w), (resized_h, resized_w)))
}
