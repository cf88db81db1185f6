use std::{cmp::Ordering, collections::BinaryHeap};

use log::{debug, trace};
use posenet_base::{Tensor, Vec2};

use super::{
    candidates::{LOCAL_MAXIMUM_RADIUS, best_in_window, part_candidates},
    refine::refine,
};
use crate::{
    config::OutputStride,
    error::PoseError,
    maps::{DisplacementMap, OffsetMap, ScoreMap},
    skeleton::{Direction, SkeletonGraph},
    types::{Keypoint, PartCandidate, Pose},
};

/// Max-heap entry: higher score first, then earlier scan order.
struct Queued {
    candidate: PartCandidate,
    order: usize,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        self.candidate
            .score
            .total_cmp(&other.candidate.score)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// The arrays of one multi-pose decode, shape-checked against each other.
struct Maps<'a> {
    scores: ScoreMap<'a>,
    offsets: OffsetMap<'a>,
    forward: DisplacementMap<'a>,
    backward: DisplacementMap<'a>,
}

/// True if some accepted pose already has `part_id` within the NMS radius of `point`.
fn within_nms_radius(poses: &[Pose], part_id: usize, point: Vec2<f32>, squared_nms_radius: f32) -> bool {
    poses.iter().any(|pose| {
        pose.keypoints
            .get(part_id)
            .is_some_and(|keypoint| keypoint.position.distance_squared_to(point) <= squared_nms_radius)
    })
}

/// Greedy multi-person decoder over a skeleton graph.
///
/// Part candidates are taken best-first. A candidate that lands within
/// `nms_radius` of the same part of an accepted pose is dropped; otherwise it
/// seeds a pose whose remaining parts are found by following the displacement
/// fields along the skeleton.
#[derive(Debug, Clone)]
pub struct MultiPoseDecoder {
    skeleton: SkeletonGraph,
    output_stride: OutputStride,
    max_detections: usize,
    score_threshold: f32,
    nms_radius: f32,
    local_maximum_radius: usize,
}

impl MultiPoseDecoder {
    /// Decoder for the PoseNet skeleton with 5 detections, threshold 0.5 and NMS radius 20.
    pub fn new(output_stride: OutputStride) -> Self {
        Self {
            skeleton: SkeletonGraph::posenet(),
            output_stride,
            max_detections: 5,
            score_threshold: 0.5,
            nms_radius: 20.0,
            local_maximum_radius: LOCAL_MAXIMUM_RADIUS,
        }
    }

    pub fn with_skeleton(mut self, skeleton: SkeletonGraph) -> Self {
        self.skeleton = skeleton;
        self
    }

    pub fn with_max_detections(mut self, max_detections: usize) -> Self {
        self.max_detections = max_detections;
        self
    }

    pub fn with_score_threshold(mut self, score_threshold: f32) -> Self {
        self.score_threshold = score_threshold;
        self
    }

    /// Suppression radius in input image pixels. Negative values clamp to 0;
    /// `DecoderConfig::validate` rejects them before they get here.
    pub fn with_nms_radius(mut self, nms_radius: f32) -> Self {
        self.nms_radius = nms_radius.max(0.0);
        self
    }

    pub fn with_local_maximum_radius(mut self, radius: usize) -> Self {
        self.local_maximum_radius = radius;
        self
    }

    pub fn skeleton(&self) -> &SkeletonGraph {
        &self.skeleton
    }

    fn maps<'a>(
        &self,
        scores: &'a Tensor<f32>,
        offsets: &'a Tensor<f32>,
        displacement_fwd: &'a Tensor<f32>,
        displacement_bwd: &'a Tensor<f32>,
    ) -> Result<Maps<'a>, PoseError> {
        let scores = ScoreMap::new(scores)?;
        if scores.num_parts() != self.skeleton.num_parts() {
            return Err(PoseError::Shape(format!(
                "heatmap scores have {} parts, skeleton has {}",
                scores.num_parts(),
                self.skeleton.num_parts()
            )));
        }
        let num_edges = self.skeleton.num_edges();
        Ok(Maps {
            offsets: OffsetMap::new(offsets, &scores)?,
            forward: DisplacementMap::new(displacement_fwd, &scores, num_edges)?,
            backward: DisplacementMap::new(displacement_bwd, &scores, num_edges)?,
            scores,
        })
    }

    /// Decode up to `max_detections` poses, in acceptance order.
    pub fn decode(
        &self,
        heatmap_scores: &Tensor<f32>,
        offsets: &Tensor<f32>,
        displacement_fwd: &Tensor<f32>,
        displacement_bwd: &Tensor<f32>,
    ) -> Result<Vec<Pose>, PoseError> {
        if self.max_detections == 0 {
            return Ok(Vec::new());
        }

        let maps = self.maps(heatmap_scores, offsets, displacement_fwd, displacement_bwd)?;

        // seed the queue with every local maximum above the threshold
        let mut queue: BinaryHeap<Queued> =
            part_candidates(&maps.scores, self.score_threshold, self.local_maximum_radius)
                .into_iter()
                .enumerate()
                .map(|(order, candidate)| Queued { candidate, order })
                .collect();
        debug!(
            "{} part candidates at threshold {:.3}",
            queue.len(),
            self.score_threshold
        );

        let squared_nms_radius = self.nms_radius * self.nms_radius;
        let mut poses: Vec<Pose> = Vec::new();

        while poses.len() < self.max_detections {
            let Some(Queued { candidate: root, .. }) = queue.pop() else {
                break;
            };

            // roots too close to the same part of an accepted pose are skipped
            let root_position = refine(root.y, root.x, root.part_id, &maps.offsets, self.output_stride);
            if within_nms_radius(&poses, root.part_id, root_position, squared_nms_radius) {
                trace!(
                    "part {} at ({}, {}) suppressed by an accepted pose",
                    root.part_id, root.y, root.x
                );
                continue;
            }

            // a rejected pose leaves no trace, so it suppresses nothing
            let pose = self.assemble(&maps, root, root_position);
            if pose.score >= self.score_threshold {
                trace!(
                    "pose {} seeded by part {} at ({}, {}), score {:.3}",
                    poses.len(),
                    root.part_id,
                    root.y,
                    root.x,
                    pose.score
                );
                poses.push(pose);
            } else {
                trace!(
                    "pose seeded by part {} rejected, score {:.3}",
                    root.part_id, pose.score
                );
            }
        }

        debug!("{} poses decoded", poses.len());
        Ok(poses)
    }

    /// Place `root`, then walk the skeleton outward to fill every other slot.
    fn assemble(&self, maps: &Maps<'_>, root: PartCandidate, root_position: Vec2<f32>) -> Pose {
        let mut slots: Vec<Option<Keypoint>> = vec![None; self.skeleton.num_parts()];
        slots[root.part_id] = Some(Keypoint::new(root.part_id, root_position, root.score));

        for step in self.skeleton.traverse_from(root.part_id) {
            let Some(source) = slots[step.source] else {
                continue;
            };
            let displacements = match step.direction {
                Direction::Forward => &maps.forward,
                Direction::Backward => &maps.backward,
            };
            slots[step.target] = Some(self.follow_edge(
                maps,
                displacements,
                step.edge,
                source.position,
                step.target,
            ));
        }

        let keypoints = slots
            .into_iter()
            .enumerate()
            .map(|(part_id, slot)| slot.unwrap_or(Keypoint::new(part_id, Vec2::zero(), 0.0)))
            .collect();
        Pose::from_keypoints(keypoints)
    }

    /// Locate `target_part` from a placed neighbour at `source` across `edge_id`.
    ///
    /// The displacement at the source cell gives a rough target; the best cell
    /// of the target channel in the local window around it is refined and
    /// taken whatever its score.
    fn follow_edge(
        &self,
        maps: &Maps<'_>,
        displacements: &DisplacementMap<'_>,
        edge_id: usize,
        source: Vec2<f32>,
        target_part: usize,
    ) -> Keypoint {
        let stride = self.output_stride.value();

        // jump along the edge displacement read at the source cell
        let (sy, sx) = maps.scores.nearest_cell(source, stride);
        let rough_target = source + displacements.displacement(sy, sx, edge_id);

        // snap to the strongest target cell near where the jump landed
        let (cy, cx) = maps.scores.nearest_cell(rough_target, stride);
        let (y, x) = best_in_window(&maps.scores, cy, cx, target_part, self.local_maximum_radius);

        Keypoint::new(
            target_part,
            refine(y, x, target_part, &maps.offsets, self.output_stride),
            maps.scores.score(y, x, target_part),
        )
    }
}

/// Decode zero or more poses with the PoseNet skeleton.
///
/// `nms_radius` is in input image pixels. See [`MultiPoseDecoder`].
#[allow(clippy::too_many_arguments)]
pub fn decode_multiple_poses(
    heatmap_scores: &Tensor<f32>,
    offsets: &Tensor<f32>,
    displacement_fwd: &Tensor<f32>,
    displacement_bwd: &Tensor<f32>,
    output_stride: OutputStride,
    max_detections: usize,
    score_threshold: f32,
    nms_radius: f32,
) -> Result<Vec<Pose>, PoseError> {
    MultiPoseDecoder::new(output_stride)
        .with_max_detections(max_detections)
        .with_score_threshold(score_threshold)
        .with_nms_radius(nms_radius)
        .decode(heatmap_scores, offsets, displacement_fwd, displacement_bwd)
}
