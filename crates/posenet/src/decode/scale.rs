use posenet_base::Vec2;

use crate::types::{Keypoint, Pose};

/// Map a pose from network input resolution back to source image resolution.
///
/// `scale_y = original_height / resized_height`, likewise for `scale_x`.
pub fn scale_pose(pose: &Pose, scale_y: f32, scale_x: f32) -> Pose {
    let factor = Vec2::new(scale_x, scale_y);
    Pose {
        keypoints: pose
            .keypoints
            .iter()
            .map(|keypoint| Keypoint {
                position: keypoint.position * factor,
                ..*keypoint
            })
            .collect(),
        score: pose.score,
    }
}

pub fn scale_poses(poses: &[Pose], scale_y: f32, scale_x: f32) -> Vec<Pose> {
    poses
        .iter()
        .map(|pose| scale_pose(pose, scale_y, scale_x))
        .collect()
}
