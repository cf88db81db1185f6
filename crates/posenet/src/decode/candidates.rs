use posenet_base::Tensor;

use crate::{error::PoseError, maps::ScoreMap, types::PartCandidate};

/// Chebyshev radius of the local maximum test and of the edge-following search window.
pub const LOCAL_MAXIMUM_RADIUS: usize = 1;

/// Every cell scoring at least `score_threshold` that no cell within
/// `local_maximum_radius` of it (same channel) beats.
///
/// Candidates come out in row-major scan order `(y, x, part)`.
pub fn build_part_candidates(
    scores: &Tensor<f32>,
    score_threshold: f32,
    local_maximum_radius: usize,
) -> Result<Vec<PartCandidate>, PoseError> {
    let scores = ScoreMap::new(scores)?;
    Ok(part_candidates(&scores, score_threshold, local_maximum_radius))
}

pub(crate) fn part_candidates(
    scores: &ScoreMap<'_>,
    score_threshold: f32,
    local_maximum_radius: usize,
) -> Vec<PartCandidate> {
    let mut candidates = Vec::new();
    for y in 0..scores.height() {
        for x in 0..scores.width() {
            for part_id in 0..scores.num_parts() {
                let score = scores.score(y, x, part_id);
                if score < score_threshold {
                    continue;
                }
                if is_local_maximum(scores, score, y, x, part_id, local_maximum_radius) {
                    candidates.push(PartCandidate {
                        score,
                        part_id,
                        y,
                        x,
                    });
                }
            }
        }
    }
    candidates
}

/// Clamped window `[start, end)` of `radius` around `center` on an axis of length `len`.
fn window(center: usize, radius: usize, len: usize) -> std::ops::Range<usize> {
    center.saturating_sub(radius)..len.min(center + radius + 1)
}

fn is_local_maximum(
    scores: &ScoreMap<'_>,
    score: f32,
    y: usize,
    x: usize,
    part_id: usize,
    radius: usize,
) -> bool {
    for wy in window(y, radius, scores.height()) {
        for wx in window(x, radius, scores.width()) {
            if scores.score(wy, wx, part_id) > score {
                return false;
            }
        }
    }
    true
}

/// Highest scoring cell of `part_id` within `radius` of `(y, x)`; the first in
/// row-major order wins ties.
pub(crate) fn best_in_window(
    scores: &ScoreMap<'_>,
    y: usize,
    x: usize,
    part_id: usize,
    radius: usize,
) -> (usize, usize) {
    let mut best = (y, x);
    let mut best_score = f32::NEG_INFINITY;
    for wy in window(y, radius, scores.height()) {
        for wx in window(x, radius, scores.width()) {
            let score = scores.score(wy, wx, part_id);
            if score > best_score {
                best_score = score;
                best = (wy, wx);
            }
        }
    }
    best
}
