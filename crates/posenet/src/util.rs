use posenet_base::Vec2;

use crate::{config::OutputStride, keypoints::CONNECTED_PARTS, types::Keypoint};

/// Network input size for one image dimension: the scaled dimension snapped
/// down to `k * output_stride + 1`.
pub fn valid_resolution(image_scale_factor: f32, input_dimension: usize, output_stride: OutputStride) -> usize {
    let stride = output_stride.value() as usize;
    let scaled = (input_dimension as f32 * image_scale_factor).floor() as usize;
    let Some(even_resolution) = scaled.checked_sub(1) else {
        return 1;
    };
    even_resolution - even_resolution % stride + 1
}

/// Limb segments whose two endpoints both reach `min_confidence`.
pub fn adjacent_keypoints(keypoints: &[Keypoint], min_confidence: f32) -> Vec<(Keypoint, Keypoint)> {
    CONNECTED_PARTS
        .iter()
        .filter_map(|&(a, b)| {
            let a = keypoints.get(usize::from(a))?;
            let b = keypoints.get(usize::from(b))?;
            (a.score >= min_confidence && b.score >= min_confidence).then_some((*a, *b))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

/// Axis-aligned box around all keypoint positions, `None` when there are none.
pub fn bounding_box(keypoints: &[Keypoint]) -> Option<BoundingBox> {
    let first = keypoints.first()?.position;
    let init = BoundingBox {
        min_x: first.x,
        min_y: first.y,
        max_x: first.x,
        max_y: first.y,
    };
    Some(keypoints.iter().fold(init, |b, keypoint| {
        let Vec2 { x, y } = keypoint.position;
        BoundingBox {
            min_x: b.min_x.min(x),
            min_y: b.min_y.min(y),
            max_x: b.max_x.max(x),
            max_y: b.max_y.max(y),
        }
    }))
}

/// Corners of [`bounding_box`], clockwise from the top left.
pub fn bounding_box_points(keypoints: &[Keypoint]) -> Option<[Vec2<f32>; 4]> {
    let b = bounding_box(keypoints)?;
    Some([
        Vec2::new(b.min_x, b.min_y),
        Vec2::new(b.max_x, b.min_y),
        Vec2::new(b.max_x, b.max_y),
        Vec2::new(b.min_x, b.max_y),
    ])
}
