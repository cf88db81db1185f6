use posenet_base::{Tensor, Vec2};

use crate::error::PoseError;

fn grid_dims(name: &str, tensor: &Tensor<f32>) -> Result<(usize, usize, usize), PoseError> {
    let (h, w, c) = tensor
        .hwc()
        .ok_or_else(|| PoseError::Shape(format!("{name}: expected [H, W, C], got {:?}", tensor.shape)))?;
    if h == 0 || w == 0 {
        return Err(PoseError::Shape(format!(
            "{name}: grid dimensions must be non-zero, got {h}x{w}"
        )));
    }
    Ok((h, w, c))
}

/// Per-cell keypoint probabilities, `[H, W, K]`.
#[derive(Debug, Clone, Copy)]
pub struct ScoreMap<'a> {
    tensor: &'a Tensor<f32>,
    height: usize,
    width: usize,
    num_parts: usize,
}

impl<'a> ScoreMap<'a> {
    pub fn new(tensor: &'a Tensor<f32>) -> Result<Self, PoseError> {
        let (height, width, num_parts) = grid_dims("heatmap scores", tensor)?;
        Ok(Self {
            tensor,
            height,
            width,
            num_parts,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn num_parts(&self) -> usize {
        self.num_parts
    }

    #[inline]
    pub fn score(&self, y: usize, x: usize, part_id: usize) -> f32 {
        self.tensor.at3(y, x, part_id)
    }

    /// Grid cell nearest to an image-space point, clamped onto the grid.
    pub fn nearest_cell(&self, point: Vec2<f32>, output_stride: u32) -> (usize, usize) {
        let stride = output_stride as f32;
        let y = (point.y / stride).round().clamp(0.0, (self.height - 1) as f32) as usize;
        let x = (point.x / stride).round().clamp(0.0, (self.width - 1) as f32) as usize;
        (y, x)
    }
}

/// Sub-pixel corrections, `[H, W, 2K]`: `dy` in channel `k`, `dx` in channel `K + k`.
#[derive(Debug, Clone, Copy)]
pub struct OffsetMap<'a> {
    tensor: &'a Tensor<f32>,
    num_parts: usize,
}

impl<'a> OffsetMap<'a> {
    pub fn new(tensor: &'a Tensor<f32>, scores: &ScoreMap<'_>) -> Result<Self, PoseError> {
        let (h, w, c) = grid_dims("offsets", tensor)?;
        if h != scores.height() || w != scores.width() || c != 2 * scores.num_parts() {
            return Err(PoseError::Shape(format!(
                "offsets: expected [{}, {}, {}], got {:?}",
                scores.height(),
                scores.width(),
                2 * scores.num_parts(),
                tensor.shape
            )));
        }
        Ok(Self {
            tensor,
            num_parts: scores.num_parts(),
        })
    }

    #[inline]
    pub fn offset(&self, y: usize, x: usize, part_id: usize) -> Vec2<f32> {
        Vec2::new(
            self.tensor.at3(y, x, self.num_parts + part_id),
            self.tensor.at3(y, x, part_id),
        )
    }
}

/// Vectors toward the neighbouring part of each edge, `[H, W, 2E]`:
/// `dy` in channel `e`, `dx` in channel `E + e`.
#[derive(Debug, Clone, Copy)]
pub struct DisplacementMap<'a> {
    tensor: &'a Tensor<f32>,
    num_edges: usize,
}

impl<'a> DisplacementMap<'a> {
    pub fn new(
        tensor: &'a Tensor<f32>,
        scores: &ScoreMap<'_>,
        num_edges: usize,
    ) -> Result<Self, PoseError> {
        let (h, w, c) = grid_dims("displacements", tensor)?;
        if h != scores.height() || w != scores.width() || c != 2 * num_edges {
            return Err(PoseError::Shape(format!(
                "displacements: expected [{}, {}, {}], got {:?}",
                scores.height(),
                scores.width(),
                2 * num_edges,
                tensor.shape
            )));
        }
        Ok(Self { tensor, num_edges })
    }

    #[inline]
    pub fn displacement(&self, y: usize, x: usize, edge_id: usize) -> Vec2<f32> {
        Vec2::new(
            self.tensor.at3(y, x, self.num_edges + edge_id),
            self.tensor.at3(y, x, edge_id),
        )
    }
}
