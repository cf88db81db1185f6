use log::debug;
use posenet_base::Tensor;

use super::refine::refine;
use crate::{
    config::OutputStride,
    error::PoseError,
    maps::{OffsetMap, ScoreMap},
    types::{Keypoint, Pose},
};

/// Grid cell with the highest score for `part_id`. The first cell in
/// row-major order wins ties.
fn argmax2d(scores: &ScoreMap<'_>, part_id: usize) -> (usize, usize) {
    let mut best = (0, 0);
    let mut best_score = f32::NEG_INFINITY;
    for y in 0..scores.height() {
        for x in 0..scores.width() {
            let score = scores.score(y, x, part_id);
            if score > best_score {
                best_score = score;
                best = (y, x);
            }
        }
    }
    best
}

/// Decode exactly one pose: every part sits at its own score maximum.
///
/// The returned pose has one keypoint per score map channel, and its score is
/// the mean keypoint score.
pub fn decode_single_pose(
    heatmap_scores: &Tensor<f32>,
    offsets: &Tensor<f32>,
    output_stride: OutputStride,
) -> Result<Pose, PoseError> {
    let scores = ScoreMap::new(heatmap_scores)?;
    let offsets = OffsetMap::new(offsets, &scores)?;

    let keypoints: Vec<Keypoint> = (0..scores.num_parts())
        .map(|part_id| {
            let (y, x) = argmax2d(&scores, part_id);
            Keypoint::new(
                part_id,
                refine(y, x, part_id, &offsets, output_stride),
                scores.score(y, x, part_id),
            )
        })
        .collect();

    let pose = Pose::from_keypoints(keypoints);
    debug!(
        "single pose decoded on {}x{} grid, score {:.3}",
        scores.height(),
        scores.width(),
        pose.score
    );
    Ok(pose)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_channel(h: usize, w: usize, values: &[f32]) -> Tensor<f32> {
        Tensor::new(vec![h, w, 1], values.to_vec()).unwrap()
    }

    #[test]
    fn test_argmax2d_2x2() {
        let tensor = single_channel(2, 2, &[1.0, 2.0, 0.0, 3.0]);
        assert_eq!(argmax2d(&ScoreMap::new(&tensor).unwrap(), 0), (1, 1));
    }

    #[test]
    fn test_argmax2d_3x3() {
        let tensor = single_channel(3, 3, &[1.0, 2.0, 0.0, 3.0, 4.0, -1.0, 2.0, 9.0, 6.0]);
        assert_eq!(argmax2d(&ScoreMap::new(&tensor).unwrap(), 0), (2, 1));

        let tensor = single_channel(3, 3, &[0.5, 0.2, 0.9, 4.3, 0.2, 0.7, 0.6, -0.11, 1.4]);
        assert_eq!(argmax2d(&ScoreMap::new(&tensor).unwrap(), 0), (1, 0));
    }

    #[test]
    fn test_argmax2d_first_maximum_wins() {
        let tensor = single_channel(2, 3, &[0.1, 0.7, 0.3, 0.7, 0.2, 0.7]);
        assert_eq!(argmax2d(&ScoreMap::new(&tensor).unwrap(), 0), (0, 1));
    }

    #[test]
    fn test_argmax2d_per_channel() {
        let tensor = Tensor::new(
            vec![3, 3, 3],
            vec![
                1.0, 0.5, 4.0, //
                2.0, 0.2, 0.2, //
                0.0, 0.9, 0.8, //
                3.0, 4.3, 0.1, //
                4.0, 0.2, 6.0, //
                -1.0, 0.7, 0.6, //
                2.0, 0.6, 0.3, //
                9.0, -0.11, 11.0, //
                6.0, 1.4, 0.6, //
            ],
        )
        .unwrap();
        let map = ScoreMap::new(&tensor).unwrap();
        assert_eq!(argmax2d(&map, 0), (2, 1));
        assert_eq!(argmax2d(&map, 1), (1, 0));
        assert_eq!(argmax2d(&map, 2), (2, 1));
    }
}
