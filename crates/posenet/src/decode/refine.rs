use posenet_base::Vec2;

use crate::{config::OutputStride, maps::OffsetMap};

/// Image-space position of grid cell `(y, x)` for `part_id`, corrected by its offset vector.
#[inline]
pub fn refine(
    y: usize,
    x: usize,
    part_id: usize,
    offsets: &OffsetMap<'_>,
    output_stride: OutputStride,
) -> Vec2<f32> {
    Vec2::from_cell(y, x, output_stride.as_f32()) + offsets.offset(y, x, part_id)
}
